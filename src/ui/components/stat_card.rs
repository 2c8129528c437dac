use crate::ui::theme::Theme;
use egui::{self, RichText};

/// Headline number with a short trend line
pub struct StatCard<'a> {
    title: &'a str,
    value: usize,
    trend: &'a str,
    theme: &'a Theme,
}

impl<'a> StatCard<'a> {
    pub fn new(title: &'a str, value: usize, trend: &'a str, theme: &'a Theme) -> Self {
        Self {
            title,
            value,
            trend,
            theme,
        }
    }

    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        self.theme
            .card_frame()
            .show(ui, |ui| {
                ui.set_min_width(160.0);
                ui.label(
                    RichText::new(self.title)
                        .size(13.0)
                        .color(self.theme.muted_foreground),
                );
                ui.label(
                    RichText::new(self.value.to_string())
                        .size(28.0)
                        .strong()
                        .color(self.theme.primary),
                );
                ui.label(
                    RichText::new(self.trend)
                        .size(11.0)
                        .color(self.theme.muted_foreground),
                );
            })
            .response
    }
}
