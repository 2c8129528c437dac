use crate::records::StatusBadge;
use crate::ui::theme::Theme;
use egui::{self, RichText};

/// Coloured pill for a status, intent or priority
pub fn badge(ui: &mut egui::Ui, status: &dyn StatusBadge, theme: &Theme) -> egui::Response {
    badge_text(ui, status.label(), status, theme)
}

/// Badge with custom text, e.g. "High Priority"
pub fn badge_text(
    ui: &mut egui::Ui,
    text: &str,
    status: &dyn StatusBadge,
    theme: &Theme,
) -> egui::Response {
    let (fill, color) = theme.tone(status.tone());
    egui::Frame::none()
        .fill(fill)
        .rounding(10.0)
        .inner_margin(egui::Margin::symmetric(8.0, 2.0))
        .show(ui, |ui| {
            ui.label(RichText::new(text).size(11.0).color(color));
        })
        .response
}
