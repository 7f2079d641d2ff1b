use eframe::egui::{Slider, Ui};

use crate::ui::utils::{colored_subsection_heading, section_heading, spaced_separator};

/// Trait for UI panels that can be rendered
pub trait Panel {
    type Event;
    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReplayEvent {
    TogglePause,
    Step,
    Restart,
    BarsPerFrame(usize),
    ShowLevels(bool),
    ShowLegend(bool),
}

/// Replay controls and display toggles
pub struct ReplayPanel {
    paused: bool,
    finished: bool,
    bars_per_frame: usize,
    show_levels: bool,
    show_legend: bool,
}

impl ReplayPanel {
    pub fn new(
        paused: bool,
        finished: bool,
        bars_per_frame: usize,
        show_levels: bool,
        show_legend: bool,
    ) -> Self {
        Self {
            paused,
            finished,
            bars_per_frame,
            show_levels,
            show_legend,
        }
    }
}

impl Panel for ReplayPanel {
    type Event = ReplayEvent;

    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        let mut events = Vec::new();

        section_heading(ui, "Replay");
        ui.horizontal(|ui| {
            let label = if self.paused { "Play" } else { "Pause" };
            if ui.add_enabled(!self.finished, eframe::egui::Button::new(label)).clicked() {
                events.push(ReplayEvent::TogglePause);
            }
            if ui
                .add_enabled(self.paused && !self.finished, eframe::egui::Button::new("Step"))
                .clicked()
            {
                events.push(ReplayEvent::Step);
            }
            if ui.button("Restart").clicked() {
                events.push(ReplayEvent::Restart);
            }
        });

        ui.add_space(5.0);
        ui.label(colored_subsection_heading("Bars per frame"));
        let mut bars = self.bars_per_frame;
        if ui.add(Slider::new(&mut bars, 1..=26)).changed() {
            events.push(ReplayEvent::BarsPerFrame(bars));
        }

        spaced_separator(ui);
        section_heading(ui, "Display");
        if ui.checkbox(&mut self.show_levels, "Level lines").changed() {
            events.push(ReplayEvent::ShowLevels(self.show_levels));
        }
        if ui.checkbox(&mut self.show_legend, "Legend").changed() {
            events.push(ReplayEvent::ShowLegend(self.show_legend));
        }

        events
    }
}
