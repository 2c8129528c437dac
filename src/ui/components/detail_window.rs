//! Modal-style windows showing one full record

use super::{badge, badge_text};
use crate::records::{
    format_duration, format_price, format_timestamp, CallLog, Complaint, Order, Reservation,
    StatusBadge,
};
use crate::ui::state::Selection;
use crate::ui::theme::Theme;
use egui::{self, RichText};

pub struct DetailWindow<'a> {
    selection: &'a Selection,
    theme: &'a Theme,
}

impl<'a> DetailWindow<'a> {
    pub fn new(selection: &'a Selection, theme: &'a Theme) -> Self {
        Self { selection, theme }
    }

    /// Show the window; returns false once the user closed it
    pub fn show(self, ctx: &egui::Context) -> bool {
        let mut open = true;
        let mut close_clicked = false;

        egui::Window::new(self.selection.title())
            .open(&mut open)
            .collapsible(false)
            .resizable(true)
            .default_width(520.0)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                match self.selection {
                    Selection::Call(call) => self.call(ui, call),
                    Selection::Reservation(reservation) => self.reservation(ui, reservation),
                    Selection::Order(order) => self.order(ui, order),
                    Selection::Complaint(complaint) => self.complaint(ui, complaint),
                }
                ui.add_space(self.theme.spacing);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                    if ui.button("Close").clicked() {
                        close_clicked = true;
                    }
                });
            });

        open && !close_clicked
    }

    fn section(&self, ui: &mut egui::Ui, title: &str) {
        ui.add_space(self.theme.spacing_sm);
        ui.label(
            RichText::new(title)
                .size(13.0)
                .strong()
                .color(self.theme.muted_foreground),
        );
    }

    fn call(&self, ui: &mut egui::Ui, call: &CallLog) {
        ui.label(
            RichText::new(format_timestamp(&call.timestamp))
                .color(self.theme.muted_foreground),
        );
        ui.horizontal(|ui| {
            ui.label(format!("Duration: {}", format_duration(call.duration_secs)));
            badge(ui, &call.intent, self.theme);
            badge(ui, &call.status, self.theme);
        });

        self.section(ui, "Summary");
        ui.label(&call.summary);

        self.section(ui, "Transcript");
        egui::Frame::none()
            .fill(self.theme.secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing_sm)
            .show(ui, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("call_transcript")
                    .max_height(240.0)
                    .show(ui, |ui| {
                        for line in call.transcript.lines() {
                            ui.label(RichText::new(line.trim()).size(13.0));
                        }
                    });
            });
    }

    fn reservation(&self, ui: &mut egui::Ui, reservation: &Reservation) {
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.label(RichText::new(&reservation.customer_name).size(16.0).strong());
                ui.label(
                    RichText::new(&reservation.phone).color(self.theme.muted_foreground),
                );
            });
            badge(ui, &reservation.status, self.theme);
        });

        self.section(ui, "Date & Time");
        ui.label(format_timestamp(&reservation.date_time));

        self.section(ui, "Party Size");
        ui.label(format!("{} guests", reservation.party_size));

        if !reservation.notes.is_empty() {
            self.section(ui, "Special Requests");
            ui.label(RichText::new(&reservation.notes).italics());
        }
    }

    fn order(&self, ui: &mut egui::Ui, order: &Order) {
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.label(RichText::new(format!("Customer: {}", order.customer_name)).strong());
                ui.label(RichText::new(&order.phone).color(self.theme.muted_foreground));
            });
            badge(ui, &order.status, self.theme);
        });

        self.section(ui, "Order Time");
        ui.label(format_timestamp(&order.order_time));
        self.section(ui, "Pickup Time");
        ui.label(format_timestamp(&order.pickup_time));

        self.section(ui, "Items");
        egui::Grid::new("order_items")
            .num_columns(2)
            .spacing([self.theme.spacing, 4.0])
            .show(ui, |ui| {
                for item in &order.items {
                    ui.label(format!("{}x {}", item.quantity, item.name));
                    ui.label(format_price(item.price * f64::from(item.quantity)));
                    ui.end_row();
                }
            });

        ui.separator();
        ui.horizontal(|ui| {
            ui.label(RichText::new("Total").strong());
            ui.label(
                RichText::new(format_price(order.total))
                    .strong()
                    .color(self.theme.primary),
            );
        });
    }

    fn complaint(&self, ui: &mut egui::Ui, complaint: &Complaint) {
        ui.label(
            RichText::new(format_timestamp(&complaint.date)).color(self.theme.muted_foreground),
        );
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.label(
                    RichText::new(format!("Customer: {}", complaint.customer_name)).strong(),
                );
                ui.label(RichText::new(&complaint.phone).color(self.theme.muted_foreground));
            });
            badge_text(
                ui,
                &format!("{} Priority", complaint.priority.label()),
                &complaint.priority,
                self.theme,
            );
            badge(ui, &complaint.resolution, self.theme);
        });

        self.section(ui, "Issue Summary");
        ui.label(&complaint.issue_summary);

        self.section(ui, "Full Details");
        ui.label(&complaint.details);
    }
}
