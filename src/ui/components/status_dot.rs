//! Pulsing connection dot shown in the header

use crate::ui::theme::Theme;
use egui::{self, Color32, RichText, Vec2};

/// "Connected" while a call is live, "Offline" otherwise
pub struct StatusDot<'a> {
    connected: bool,
    theme: &'a Theme,
}

impl<'a> StatusDot<'a> {
    pub fn new(connected: bool, theme: &'a Theme) -> Self {
        Self { connected, theme }
    }

    pub fn label(&self) -> &'static str {
        if self.connected {
            "Connected"
        } else {
            "Offline"
        }
    }

    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        let color = if self.connected {
            let time = ui.ctx().input(|i| i.time);
            let pulse = ((time * 2.0).sin() * 0.5 + 0.5) as f32;
            let base = self.theme.success;
            Color32::from_rgba_unmultiplied(
                base.r(),
                base.g(),
                base.b(),
                ((0.6 + 0.4 * pulse) * 255.0) as u8,
            )
        } else {
            self.theme.inactive
        };

        let response = ui
            .horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(Vec2::splat(10.0), egui::Sense::hover());
                ui.painter().circle_filled(rect.center(), 4.0, color);
                ui.label(
                    RichText::new(self.label())
                        .size(13.0)
                        .color(self.theme.muted_foreground),
                );
            })
            .response;

        if self.connected {
            ui.ctx().request_repaint();
        }

        response
    }
}
