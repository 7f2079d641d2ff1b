use eframe::egui::{CentralPanel, Context, Frame, Margin, SidePanel, TopBottomPanel};

use crate::ui::config::UI_CONFIG;
use crate::ui::styles::UiStyleExt;
use crate::ui::ui_panels::{Panel, ReplayEvent, ReplayPanel};
use crate::utils::time_utils::epoch_ms_to_utc;

use super::app::BreadthApp;

impl BreadthApp {
    pub(super) fn render_side_panel(&mut self, ctx: &Context) {
        let side_panel_frame = Frame::new().fill(UI_CONFIG.colors.side_panel);
        SidePanel::left("left_panel")
            .min_width(UI_CONFIG.side_panel_width)
            .frame(side_panel_frame)
            .show(ctx, |ui| {
                let events = ReplayPanel::new(
                    self.view.paused,
                    self.session.feed.is_finished(),
                    self.view.bars_per_frame,
                    self.view.show_levels,
                    self.view.show_legend,
                )
                .render(ui);

                for event in events {
                    match event {
                        ReplayEvent::TogglePause => self.view.paused = !self.view.paused,
                        ReplayEvent::Step => self.advance(1),
                        ReplayEvent::Restart => self.restart(),
                        ReplayEvent::BarsPerFrame(n) => self.view.bars_per_frame = n.max(1),
                        ReplayEvent::ShowLevels(show) => self.view.show_levels = show,
                        ReplayEvent::ShowLegend(show) => self.view.show_legend = show,
                    }
                }

                ui.add_space(10.0);
                ui.separator();
                for label in self.session.engine.overlay_labels() {
                    ui.breadth_label(&label);
                }
            });
    }

    pub(super) fn render_status_panel(&mut self, ctx: &Context) {
        let status_frame = Frame::new()
            .fill(UI_CONFIG.colors.side_panel)
            .inner_margin(Margin::symmetric(8, 4));
        TopBottomPanel::bottom("status_panel")
            .frame(status_frame)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.metric("Source", self.session.signature, UI_CONFIG.colors.heading);
                    ui.separator();
                    ui.metric(
                        "Bar",
                        &format!(
                            "{}/{}",
                            self.session.feed.position(),
                            self.session.feed.len()
                        ),
                        UI_CONFIG.colors.label,
                    );
                    ui.separator();
                    ui.metric(
                        "State",
                        &self.session.engine.state().to_string(),
                        UI_CONFIG.colors.label,
                    );

                    if let Some(outcome) = &self.last_outcome {
                        ui.separator();
                        ui.label_subdued(epoch_ms_to_utc(outcome.timestamp_ms));
                        let neutral = outcome.published.iter().filter(|p| p.reading.is_neutral());
                        for published in neutral {
                            ui.label_warning(format!(
                                "{} neutral (zero volume)",
                                published.exchange
                            ));
                        }
                        for (exchange, error) in &outcome.missed {
                            ui.label_error(format!("{}: {}", exchange, error));
                        }
                    }

                    if let Some(error) = &self.last_error {
                        ui.separator();
                        ui.label_error(error.to_string());
                    }
                });
            });
    }

    pub(super) fn render_central_panel(&mut self, ctx: &Context) {
        let central_panel_frame = Frame::new().fill(UI_CONFIG.colors.central_panel);
        CentralPanel::default()
            .frame(central_panel_frame)
            .show(ctx, |ui| {
                if self.session.feed.is_empty() {
                    ui.label_header("No bars in the lookback window");
                    return;
                }

                let reader = self.session.engine.reader();
                self.plot_view.show_breadth_plots(
                    ui,
                    &self.chart,
                    self.session.engine.exchanges(),
                    &reader,
                    self.view.show_levels,
                    self.view.show_legend,
                );
            });
    }
}
