//! Voice call widget: status prompt, call controls and the live transcript

use super::LevelMeter;
use crate::call::{CallCommand, CallSnapshot, CallStatus, Speaker, TranscriptEntry};
use crate::ui::theme::Theme;
use egui::{self, RichText, Vec2};

pub const THINKING_MESSAGE: &str = "Receptionist is thinking...";

pub struct CallPanel<'a> {
    call: &'a CallSnapshot,
    theme: &'a Theme,
}

impl<'a> CallPanel<'a> {
    pub fn new(call: &'a CallSnapshot, theme: &'a Theme) -> Self {
        Self { call, theme }
    }

    /// Render the panel; returns the command for whichever button was clicked
    pub fn show(self, ui: &mut egui::Ui) -> Option<CallCommand> {
        let mut command = None;

        egui::Frame::none()
            .fill(self.theme.primary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing_lg)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.label(
                            RichText::new("Voice Receptionist")
                                .size(20.0)
                                .strong()
                                .color(self.theme.primary_foreground),
                        );
                        ui.label(
                            RichText::new(self.call.status.prompt())
                                .size(13.0)
                                .color(self.theme.primary_foreground.gamma_multiply(0.8)),
                        );
                        if self.call.thinking {
                            ui.label(
                                RichText::new(THINKING_MESSAGE)
                                    .size(12.0)
                                    .italics()
                                    .color(self.theme.accent),
                            );
                        }
                    });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        command = self.show_controls(ui);
                    });
                });

                if !self.call.transcript.is_empty() {
                    ui.add_space(self.theme.spacing);
                    self.show_transcript(ui);
                }
            });

        command
    }

    fn show_controls(&self, ui: &mut egui::Ui) -> Option<CallCommand> {
        let mut command = None;

        if self.call.in_call() {
            let end = egui::Button::new(
                RichText::new("End Call").color(self.theme.primary_foreground),
            )
            .min_size(Vec2::new(96.0, 36.0))
            .rounding(self.theme.button_rounding)
            .fill(self.theme.destructive);
            if ui.add(end).clicked() {
                command = Some(CallCommand::EndCall);
            }

            let (text, hint) = if self.call.is_muted {
                ("Unmute", "Unmute microphone")
            } else {
                ("Mute", "Mute microphone")
            };
            let fill = if self.call.is_muted {
                self.theme.destructive.gamma_multiply(0.6)
            } else {
                self.theme.primary_foreground.gamma_multiply(0.2)
            };
            let mute = egui::Button::new(RichText::new(text).color(self.theme.primary_foreground))
                .min_size(Vec2::new(72.0, 36.0))
                .rounding(self.theme.button_rounding)
                .fill(fill);
            let response = ui.add(mute);
            response.widget_info(|| {
                egui::WidgetInfo::labeled(egui::WidgetType::Button, true, hint)
            });
            if response.on_hover_text(hint).clicked() {
                command = Some(CallCommand::ToggleMute);
            }

            LevelMeter::new(self.call.audio_level, self.call.is_muted, self.theme).show(ui);
        } else {
            let connecting = self.call.status == CallStatus::Connecting;
            let text = if connecting {
                "Connecting..."
            } else {
                "Call Receptionist"
            };
            let start = egui::Button::new(RichText::new(text).strong().color(self.theme.primary))
                .min_size(Vec2::new(160.0, 40.0))
                .rounding(self.theme.button_rounding)
                .fill(self.theme.primary_foreground);
            if ui.add_enabled(!connecting, start).clicked() {
                command = Some(CallCommand::StartCall);
            }
        }

        command
    }

    fn show_transcript(&self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.primary_foreground.gamma_multiply(0.1))
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                ui.label(
                    RichText::new("Live Transcript")
                        .size(13.0)
                        .strong()
                        .color(self.theme.primary_foreground),
                );
                egui::ScrollArea::vertical()
                    .id_salt("live_transcript")
                    .max_height(160.0)
                    .auto_shrink([false, true])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for entry in &self.call.transcript {
                            ui.push_id(entry.id, |ui| self.show_entry(ui, entry));
                        }
                    });
            });
    }

    fn show_entry(&self, ui: &mut egui::Ui, entry: &TranscriptEntry) {
        let speaker_color = match entry.speaker {
            Speaker::You => self.theme.accent,
            Speaker::Receptionist => self.theme.primary_foreground,
            Speaker::System => self.theme.primary_foreground.gamma_multiply(0.6),
        };
        ui.horizontal_wrapped(|ui| {
            ui.label(
                RichText::new(format!("{}:", entry.speaker.label()))
                    .size(13.0)
                    .strong()
                    .color(speaker_color),
            );
            let response = ui.label(
                RichText::new(&entry.text)
                    .size(13.0)
                    .color(self.theme.primary_foreground.gamma_multiply(0.9)),
            );
            let label = format!("{}: {}", entry.speaker.label(), entry.text);
            response.widget_info(|| {
                egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &label)
            });
        });
    }
}
