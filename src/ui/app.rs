use eframe::{Frame, egui};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::DEMO;
use crate::config::plot::PLOT_CONFIG;
use crate::engine::UpdateOutcome;
use crate::error::BreadthError;
use crate::session::DemoSession;
use crate::ui::chart::ChartSink;
use crate::ui::ui_plot_view::PlotView;
use crate::ui::utils::setup_custom_visuals;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// Viewer settings that survive restarts.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ViewState {
    pub bars_per_frame: usize,
    pub paused: bool,
    pub show_levels: bool,
    pub show_legend: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            bars_per_frame: DEMO.default_bars_per_frame,
            paused: false,
            show_levels: true,
            show_legend: true,
        }
    }
}

pub struct BreadthApp {
    pub(super) view: ViewState,
    pub(super) session: DemoSession,
    pub(super) chart: ChartSink,
    pub(super) plot_view: PlotView,
    pub(super) last_outcome: Option<UpdateOutcome>,
    pub(super) last_error: Option<BreadthError>,
}

impl BreadthApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        session: DemoSession,
        bars_per_frame: Option<usize>,
    ) -> Self {
        let mut view: ViewState = match cc.storage {
            Some(storage) => match eframe::get_value(storage, eframe::APP_KEY) {
                Some(value) => {
                    #[cfg(debug_assertions)]
                    if DEBUG_FLAGS.print_state_serde {
                        log::info!("Successfully loaded persisted view state");
                    }
                    value
                }
                None => ViewState::default(),
            },
            None => ViewState::default(),
        };

        if let Some(n) = bars_per_frame {
            view.bars_per_frame = n;
        }
        view.bars_per_frame = view.bars_per_frame.max(1);

        Self::with_view(session, view)
    }

    pub fn with_view(session: DemoSession, view: ViewState) -> Self {
        let chart = ChartSink::new(session.engine.channel_count(), PLOT_CONFIG.visible_bars);
        Self {
            view,
            session,
            chart,
            plot_view: PlotView::new(),
            last_outcome: None,
            last_error: None,
        }
    }

    /// Feed up to `bars` replayed bars through the engine into the chart.
    pub(super) fn advance(&mut self, bars: usize) {
        for _ in 0..bars {
            let Some(event) = self.session.next_event() else {
                break;
            };
            self.chart.prepare(&event);
            match self.session.apply(&event, &mut self.chart) {
                Ok(outcome) => self.last_outcome = Some(outcome),
                Err(e) => {
                    log::error!("Replay stopped: {}", e);
                    self.last_error = Some(e);
                    self.view.paused = true;
                    break;
                }
            }
        }
    }

    pub(super) fn restart(&mut self) {
        self.chart.clear();
        self.last_outcome = None;
        self.last_error = None;
        if let Err(e) = self.session.restart() {
            log::error!("Restart failed: {}", e);
            self.last_error = Some(e);
            self.view.paused = true;
        }
    }
}

impl eframe::App for BreadthApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.session.finish();

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_shutdown {
            log::info!(
                "Application shutdown complete ({} leases outstanding).",
                self.session.active_leases()
            );
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.view);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        setup_custom_visuals(ctx);

        if !self.view.paused && !self.session.feed.is_finished() {
            self.advance(self.view.bars_per_frame);
            ctx.request_repaint_after(Duration::from_millis(DEMO.frame_interval_ms));
        }

        self.render_side_panel(ctx);
        self.render_status_panel(ctx);
        self.render_central_panel(ctx);
    }
}
