use eframe::egui::Color32;
use egui_plot::{Bar, BarChart, HLine, LineStyle, PlotUi};

use crate::config::plot::PLOT_CONFIG;
use crate::domain::Exchange;
use crate::ui::chart::ChartSink;

/// Context passed to every layer during rendering.
pub struct LayerContext<'a> {
    pub chart: &'a ChartSink,
    /// Which tracked pair this plot shows (0 = primary)
    pub slot: usize,
    pub exchange: Exchange,
    pub show_levels: bool,
}

/// A standardized layer in the plot stack.
pub trait PlotLayer {
    fn render(&self, ui: &mut PlotUi, ctx: &LayerContext);
}

// ============================================================================
// 1. LEVEL LINES (Upper Strength / Midline / Lower Strength)
// ============================================================================
pub struct LevelLineLayer;

impl PlotLayer for LevelLineLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        if !ctx.show_levels {
            return;
        }

        for level in PLOT_CONFIG.levels {
            plot_ui.hline(
                HLine::new(level.label, level.value)
                    .color(level.color)
                    .width(PLOT_CONFIG.level_line_width)
                    .style(LineStyle::dashed_loose()),
            );
        }
    }
}

// ============================================================================
// 2. CHANNEL HISTOGRAMS (Green Ratio / Red Ratio)
// ============================================================================
pub struct ChannelHistogramLayer;

impl PlotLayer for ChannelHistogramLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        let positive = 2 * ctx.slot;
        let negative = positive + 1;

        plot_ui.bar_chart(channel_chart(
            ctx.chart,
            positive,
            &series_name(PLOT_CONFIG.positive_series_label, ctx),
            PLOT_CONFIG.positive_channel_color,
        ));
        plot_ui.bar_chart(channel_chart(
            ctx.chart,
            negative,
            &series_name(PLOT_CONFIG.negative_series_label, ctx),
            PLOT_CONFIG.negative_channel_color,
        ));
    }
}

fn series_name(base: &str, ctx: &LayerContext) -> String {
    // The primary keeps the bare names
    if ctx.slot == 0 {
        base.to_string()
    } else {
        format!("{} {}", ctx.exchange.label(), base)
    }
}

fn channel_chart(chart: &ChartSink, channel: usize, name: &str, color: Color32) -> BarChart {
    let bars = chart
        .channel_points(channel)
        .into_iter()
        // Zero bars add nothing visible but clutter hover labels
        .filter(|&(_, value)| value != 0.0)
        .map(|(x, value)| {
            Bar::new(x, value)
                .width(PLOT_CONFIG.histogram_bar_width)
                .fill(color)
        })
        .collect();

    BarChart::new(name, bars).color(color)
}
