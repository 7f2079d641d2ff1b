use eframe::egui::{Color32, RichText, Ui};

use crate::config::plot::PLOT_CONFIG;
use crate::models::{LabelTone, OverlayLabel};
use crate::ui::config::UI_CONFIG;
use crate::ui::utils::format_ratio;

/// Extension trait to add semantic styling methods directly to `egui::Ui`.
pub trait UiStyleExt {
    /// Renders small, gray text (status fields like "Bar:").
    fn label_subdued(&mut self, text: impl Into<String>);

    /// Renders a "Label: Value" pair with consistent spacing and styling.
    fn metric(&mut self, label: &str, value: &str, color: Color32);

    /// Renders a section header using the configured global color.
    fn label_header(&mut self, text: impl Into<String>);

    fn label_error(&mut self, text: impl Into<String>);

    fn label_warning(&mut self, text: impl Into<String>);

    /// One exchange's overlay value, colored by the channel it came from.
    fn breadth_label(&mut self, label: &OverlayLabel);
}

impl UiStyleExt for Ui {
    fn label_subdued(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).small().color(UI_CONFIG.colors.label));
    }

    fn metric(&mut self, label: &str, value: &str, color: Color32) {
        self.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 2.0; // Tight spacing
            ui.label_subdued(format!("{}:", label));
            ui.label(RichText::new(value).small().color(color));
        });
    }

    fn label_header(&mut self, text: impl Into<String>) {
        let text = text.into().to_uppercase();
        self.heading(RichText::new(text).color(UI_CONFIG.colors.heading).monospace());
    }

    fn label_error(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).color(UI_CONFIG.colors.miss_marker));
    }

    fn label_warning(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).small().color(UI_CONFIG.colors.neutral_marker));
    }

    fn breadth_label(&mut self, label: &OverlayLabel) {
        let color = match label.tone {
            LabelTone::Advancing => PLOT_CONFIG.label_advancing_color,
            LabelTone::Declining => PLOT_CONFIG.label_declining_color,
        };
        let value = label
            .value
            .map(|v| format_ratio(v, PLOT_CONFIG.label_digits))
            .unwrap_or_else(|| "--".to_string());
        self.metric(label.exchange.label(), &value, color);
    }
}
