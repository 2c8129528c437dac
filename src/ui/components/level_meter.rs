//! Microphone level bar

use crate::ui::theme::Theme;
use egui::{self, Rect, Vec2};

pub struct LevelMeter<'a> {
    /// 0..=100
    level: f32,
    muted: bool,
    theme: &'a Theme,
    width: f32,
}

impl<'a> LevelMeter<'a> {
    pub fn new(level: f32, muted: bool, theme: &'a Theme) -> Self {
        Self {
            level,
            muted,
            theme,
            width: 128.0,
        }
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Filled fraction of the bar
    pub fn fill_fraction(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.level / 100.0).clamp(0.0, 1.0)
        }
    }

    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        let (rect, response) =
            ui.allocate_exact_size(Vec2::new(self.width, 8.0), egui::Sense::hover());
        let painter = ui.painter();

        painter.rect_filled(rect, 4.0, self.theme.primary_foreground.gamma_multiply(0.2));

        let fraction = self.fill_fraction();
        if fraction > 0.0 {
            let filled = Rect::from_min_size(
                rect.min,
                Vec2::new(rect.width() * fraction, rect.height()),
            );
            painter.rect_filled(filled, 4.0, self.theme.accent);
        }

        response.on_hover_text(format!("Mic level {:.0}%", self.level))
    }
}
