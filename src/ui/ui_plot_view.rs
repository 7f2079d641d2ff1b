use eframe::egui::{self, Align2, Color32, FontId, Painter, Pos2, vec2};
use egui_plot::{AxisHints, Corner, HPlacement, Legend, Plot};

use crate::config::plot::PLOT_CONFIG;
use crate::domain::Exchange;
use crate::engine::{OverlaySink, SnapshotReader};
use crate::ui::chart::ChartSink;
use crate::ui::config::UI_CONFIG;
use crate::utils::time_utils::epoch_ms_to_utc;

use crate::ui::plot_layers::{ChannelHistogramLayer, LayerContext, LevelLineLayer, PlotLayer};

/// Draws overlay labels with an egui painter, relative to a chart corner.
pub struct PainterOverlay<'a> {
    pub painter: &'a Painter,
    pub origin: Pos2,
}

impl OverlaySink for PainterOverlay<'_> {
    fn draw_label(&mut self, text: &str, position: [f32; 2], color: Color32) {
        self.painter.text(
            self.origin + vec2(position[0], position[1]),
            Align2::LEFT_TOP,
            text,
            FontId::monospace(PLOT_CONFIG.label_font_size),
            color,
        );
    }
}

#[derive(Default)]
pub struct PlotView;

impl PlotView {
    pub fn new() -> Self {
        Self
    }

    /// One oscillator per tracked exchange, stacked top to bottom, with the
    /// label overlay painted over the top-left corner of the first one.
    pub fn show_breadth_plots(
        &self,
        ui: &mut egui::Ui,
        chart: &ChartSink,
        exchanges: &[Exchange],
        reader: &SnapshotReader,
        show_levels: bool,
        show_legend: bool,
    ) {
        let origin = ui.max_rect().min;
        let count = exchanges.len().max(1);
        let spacing = ui.spacing().item_spacing.y;
        let height = ((ui.available_height() - spacing * (count - 1) as f32) / count as f32)
            .max(UI_CONFIG.min_plot_height);

        for (slot, &exchange) in exchanges.iter().enumerate() {
            self.show_one(ui, chart, slot, exchange, height, show_levels, show_legend);
        }

        let painter = ui.painter();
        let mut overlay = PainterOverlay { painter, origin };
        reader.paint(&mut overlay);
    }

    #[allow(clippy::too_many_arguments)]
    fn show_one(
        &self,
        ui: &mut egui::Ui,
        chart: &ChartSink,
        slot: usize,
        exchange: Exchange,
        height: f32,
        show_levels: bool,
        show_legend: bool,
    ) {
        let x_max = PLOT_CONFIG.visible_bars.max(chart.len()) as f64;

        let mut plot = Plot::new(format!("breadth_plot_{}", exchange))
            .height(height)
            .custom_x_axes(vec![create_x_axis(chart)])
            .custom_y_axes(vec![create_y_axis(exchange)])
            .allow_scroll(false)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_boxed_zoom(false);
        if show_legend {
            plot = plot.legend(Legend::default().position(Corner::RightTop));
        }

        plot.show(ui, |plot_ui| {
            let (y_min, y_max) = value_bounds(chart, slot);
            plot_ui.set_plot_bounds_y(y_min..=y_max);
            plot_ui.set_plot_bounds_x(-1.0..=x_max);

            let ctx = LayerContext {
                chart,
                slot,
                exchange,
                show_levels,
            };

            // Back to front
            let layers: Vec<Box<dyn PlotLayer>> =
                vec![Box::new(LevelLineLayer), Box::new(ChannelHistogramLayer)];

            for layer in layers {
                layer.render(plot_ui, &ctx);
            }
        });
    }
}

/// Vertical range that always shows every level line plus some headroom.
fn value_bounds(chart: &ChartSink, slot: usize) -> (f64, f64) {
    let (mut lo, mut hi) = PLOT_CONFIG
        .levels
        .iter()
        .fold((0.0_f64, 0.0_f64), |(lo, hi), l| (lo.min(l.value), hi.max(l.value)));

    for channel in [2 * slot, 2 * slot + 1] {
        for (_, value) in chart.channel_points(channel) {
            lo = lo.min(value);
            hi = hi.max(value);
        }
    }

    let pad = (hi - lo).max(1.0) * 0.1;
    (lo - pad, hi + pad)
}

fn create_x_axis(chart: &ChartSink) -> AxisHints<'static> {
    let stamps: Vec<i64> = chart.bars().iter().map(|b| b.timestamp_ms).collect();
    AxisHints::new_x().formatter(move |grid_mark, _range| {
        let idx = grid_mark.value.round();
        if idx < 0.0 || (grid_mark.value - idx).abs() > f64::EPSILON {
            return String::new();
        }
        stamps
            .get(idx as usize)
            .map(|&ts| epoch_ms_to_utc(ts))
            .unwrap_or_default()
    })
}

fn create_y_axis(exchange: Exchange) -> AxisHints<'static> {
    AxisHints::new_y()
        .label(format!("{} breadth", exchange.label()))
        .formatter(|grid_mark, _range| format!("{:.1}", grid_mark.value))
        .placement(HPlacement::Left)
}
