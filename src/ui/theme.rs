//! Heritage theme: warm parchment surfaces, roasted-coffee primary, brass accent

use crate::records::Tone;
use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Vec2, Visuals};

/// Application theme configuration
#[derive(Clone, Debug)]
pub struct Theme {
    pub background: Color32,
    pub foreground: Color32,
    pub card: Color32,

    /// Coffee brown used for the call panel and selected tabs
    pub primary: Color32,
    pub primary_foreground: Color32,
    pub secondary: Color32,
    pub muted: Color32,
    pub muted_foreground: Color32,
    /// Brass
    pub accent: Color32,
    pub destructive: Color32,
    pub input: Color32,
    pub border: Color32,

    /// Connected indicator
    pub success: Color32,
    /// Offline indicator
    pub inactive: Color32,

    pub button_rounding: Rounding,
    pub card_rounding: Rounding,

    pub spacing: f32,
    pub spacing_lg: f32,
    pub spacing_sm: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::heritage()
    }
}

impl Theme {
    pub fn heritage() -> Self {
        Self {
            background: Color32::from_rgb(246, 243, 239),
            foreground: Color32::from_rgb(56, 36, 16),
            card: Color32::from_rgb(241, 236, 229),

            primary: Color32::from_rgb(107, 62, 26),
            primary_foreground: Color32::from_rgb(251, 250, 248),
            secondary: Color32::from_rgb(231, 225, 218),
            muted: Color32::from_rgb(222, 218, 211),
            muted_foreground: Color32::from_rgb(138, 115, 92),
            accent: Color32::from_rgb(170, 128, 24),
            destructive: Color32::from_rgb(239, 67, 67),
            input: Color32::from_rgb(201, 193, 182),
            border: Color32::from_rgb(107, 62, 26),

            success: Color32::from_rgb(34, 197, 94),
            inactive: Color32::from_rgb(156, 163, 175),

            button_rounding: Rounding::same(8.0),
            card_rounding: Rounding::same(8.0),

            spacing: 16.0,
            spacing_lg: 24.0,
            spacing_sm: 8.0,
        }
    }

    /// Badge fill and text colours
    pub fn tone(&self, tone: Tone) -> (Color32, Color32) {
        match tone {
            Tone::Blue => (
                Color32::from_rgb(219, 234, 254),
                Color32::from_rgb(30, 64, 175),
            ),
            Tone::Green => (
                Color32::from_rgb(220, 252, 231),
                Color32::from_rgb(22, 101, 52),
            ),
            Tone::Red => (
                Color32::from_rgb(254, 226, 226),
                Color32::from_rgb(153, 27, 27),
            ),
            Tone::Yellow => (
                Color32::from_rgb(254, 249, 195),
                Color32::from_rgb(133, 77, 14),
            ),
            Tone::Purple => (
                Color32::from_rgb(243, 232, 255),
                Color32::from_rgb(107, 33, 168),
            ),
            Tone::Gray => (
                Color32::from_rgb(243, 244, 246),
                Color32::from_rgb(31, 41, 55),
            ),
        }
    }

    /// Apply this theme to egui
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = Visuals::light();

        visuals.panel_fill = self.background;
        visuals.window_fill = self.card;
        visuals.extreme_bg_color = self.secondary;
        visuals.faint_bg_color = self.muted;
        visuals.override_text_color = Some(self.foreground);

        visuals.widgets.noninteractive.bg_fill = self.card;
        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, self.muted);
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.foreground);

        visuals.widgets.inactive.bg_fill = self.secondary;
        visuals.widgets.inactive.weak_bg_fill = self.secondary;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.foreground);

        visuals.widgets.hovered.bg_fill = self.muted;
        visuals.widgets.hovered.weak_bg_fill = self.muted;
        visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, self.border);

        visuals.widgets.active.bg_fill = self.primary;
        visuals.widgets.active.weak_bg_fill = self.primary;
        visuals.widgets.active.fg_stroke = Stroke::new(1.0, self.primary_foreground);

        visuals.selection.bg_fill = self.primary.gamma_multiply(0.3);
        visuals.selection.stroke = Stroke::new(1.0, self.primary);

        visuals.hyperlink_color = self.accent;

        visuals.window_rounding = self.card_rounding;
        visuals.window_stroke = Stroke::new(1.0, self.border);

        ctx.set_visuals(visuals);

        let mut style = (*ctx.style()).clone();
        style.spacing.item_spacing = Vec2::splat(self.spacing_sm);
        style.spacing.window_margin = egui::Margin::same(self.spacing);
        style.spacing.button_padding = Vec2::new(self.spacing, self.spacing_sm / 2.0);

        style.text_styles.insert(
            egui::TextStyle::Heading,
            FontId::new(22.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Body,
            FontId::new(14.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Monospace,
            FontId::new(13.0, FontFamily::Monospace),
        );
        style.text_styles.insert(
            egui::TextStyle::Button,
            FontId::new(14.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Small,
            FontId::new(12.0, FontFamily::Proportional),
        );

        ctx.set_style(style);
    }

    /// Outlined frame used by stat cards and list panels
    pub fn card_frame(&self) -> egui::Frame {
        egui::Frame::none()
            .fill(self.card)
            .rounding(self.card_rounding)
            .stroke(Stroke::new(1.0, self.muted))
            .inner_margin(self.spacing)
    }
}
