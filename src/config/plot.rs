//! Plot visualization configuration

use eframe::egui::Color32;

/// A horizontal threshold line drawn across the oscillator window.
pub struct LevelLine {
    pub value: f64,
    pub label: &'static str,
    pub color: Color32,
}

pub struct PlotConfig {
    pub positive_channel_color: Color32,
    pub negative_channel_color: Color32,
    pub positive_series_label: &'static str,
    pub negative_series_label: &'static str,
    /// Histogram bar width as a fraction of one bar period
    pub histogram_bar_width: f64,
    pub level_line_width: f32,
    pub levels: &'static [LevelLine],
    /// Bars kept on screen (older ones scroll off to the left)
    pub visible_bars: usize,
    /// Overlay text offset from the plot's top-left corner (pixels)
    pub label_offset: [f32; 2],
    pub label_row_height: f32,
    pub label_font_size: f32,
    pub label_digits: usize,
    pub label_advancing_color: Color32,
    pub label_declining_color: Color32,
}

pub const PLOT_CONFIG: PlotConfig = PlotConfig {
    positive_channel_color: Color32::from_rgb(0, 255, 0), // Lime
    negative_channel_color: Color32::from_rgb(255, 0, 0), // Red
    positive_series_label: "Green Ratio",
    negative_series_label: "Red Ratio",
    histogram_bar_width: 0.8,
    level_line_width: 1.0,
    levels: &[
        LevelLine {
            value: 2.0,
            label: "Upper Strength",
            color: Color32::from_rgb(0, 255, 0),
        },
        LevelLine {
            value: 0.0,
            label: "Midline",
            color: Color32::from_rgb(245, 245, 245), // White smoke
        },
        LevelLine {
            value: -5.0,
            label: "Lower Strength",
            color: Color32::from_rgb(255, 0, 0),
        },
    ],
    visible_bars: 160,
    label_offset: [50.0, 50.0],
    label_row_height: 16.0,
    label_font_size: 10.0,
    label_digits: 2,
    label_advancing_color: Color32::from_rgb(0, 128, 0), // Green
    label_declining_color: Color32::from_rgb(255, 0, 0),
};
