//! Filtered record lists for each dashboard tab

use super::{badge, badge_text};
use crate::records::{format_duration, format_price, format_timestamp, StatusBadge};
use crate::ui::state::{DashboardState, RecordTab, Selection};
use crate::ui::theme::Theme;
use egui::{self, RichText};

pub struct RecordList<'a> {
    state: &'a DashboardState,
    theme: &'a Theme,
}

impl<'a> RecordList<'a> {
    pub fn new(state: &'a DashboardState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    /// Card heading and sub-heading for a tab
    pub fn heading(tab: RecordTab) -> (&'static str, &'static str) {
        match tab {
            RecordTab::Calls => ("Call Logs", "Complete history of customer interactions"),
            RecordTab::Reservations => ("Reservations", "Manage table bookings and party details"),
            RecordTab::Orders => ("Takeout Orders", "Track order status and pickup times"),
            RecordTab::Complaints => ("Customer Complaints", "Track and resolve customer issues"),
        }
    }

    pub fn empty_message(tab: RecordTab) -> &'static str {
        match tab {
            RecordTab::Calls => {
                "No call logs yet. Enable sample data or make a call to get started."
            }
            RecordTab::Reservations => {
                "No reservations found. Enable sample data to see examples."
            }
            RecordTab::Orders => "No orders found. Enable sample data to see examples.",
            RecordTab::Complaints => "No complaints found. Enable sample data to see examples.",
        }
    }

    /// Render the active tab; returns the record the user clicked
    pub fn show(self, ui: &mut egui::Ui) -> Option<Selection> {
        let tab = self.state.active_tab;
        let (title, description) = Self::heading(tab);
        let mut clicked = None;

        self.theme.card_frame().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(RichText::new(title).size(18.0).strong());
            ui.label(
                RichText::new(description)
                    .size(12.0)
                    .color(self.theme.muted_foreground),
            );
            ui.add_space(self.theme.spacing_sm);

            egui::ScrollArea::vertical()
                .id_salt(("records", tab.label()))
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    clicked = match tab {
                        RecordTab::Calls => self.show_calls(ui),
                        RecordTab::Reservations => self.show_reservations(ui),
                        RecordTab::Orders => self.show_orders(ui),
                        RecordTab::Complaints => self.show_complaints(ui),
                    };
                });
        });

        clicked
    }

    fn show_empty(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(self.theme.spacing_lg);
            ui.label(
                RichText::new(Self::empty_message(self.state.active_tab))
                    .color(self.theme.muted_foreground),
            );
            ui.add_space(self.theme.spacing_lg);
        });
    }

    /// Clickable row frame
    fn row(
        &self,
        ui: &mut egui::Ui,
        id: &str,
        add_contents: impl FnOnce(&mut egui::Ui),
    ) -> bool {
        let response = egui::Frame::none()
            .fill(self.theme.background)
            .rounding(self.theme.card_rounding)
            .stroke(egui::Stroke::new(1.0, self.theme.muted))
            .inner_margin(self.theme.spacing_sm + 4.0)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                add_contents(ui);
            })
            .response
            .interact(egui::Sense::click());

        let label = format!("View {}", id);
        response.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::Button, true, label.clone())
        });

        let response = response.on_hover_cursor(egui::CursorIcon::PointingHand);
        ui.add_space(4.0);
        response.clicked()
    }

    fn muted(&self, text: impl Into<String>) -> RichText {
        RichText::new(text.into())
            .size(12.0)
            .color(self.theme.muted_foreground)
    }

    fn show_calls(&self, ui: &mut egui::Ui) -> Option<Selection> {
        let calls = self.state.filter.calls(&self.state.records);
        if calls.is_empty() {
            self.show_empty(ui);
            return None;
        }

        let mut clicked = None;
        for call in calls {
            let hit = self.row(ui, &call.id, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(self.muted(format_timestamp(&call.timestamp)));
                    ui.label(self.muted(format_duration(call.duration_secs)));
                    badge(ui, &call.intent, self.theme);
                    badge(ui, &call.status, self.theme);
                });
                ui.label(&call.summary);
            });
            if hit {
                clicked = Some(Selection::Call(call.clone()));
            }
        }
        clicked
    }

    fn show_reservations(&self, ui: &mut egui::Ui) -> Option<Selection> {
        let reservations = self.state.filter.reservations(&self.state.records);
        if reservations.is_empty() {
            self.show_empty(ui);
            return None;
        }

        let mut clicked = None;
        for reservation in reservations {
            let hit = self.row(ui, &reservation.id, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(self.muted(format_timestamp(&reservation.date_time)));
                    ui.label(self.muted(format!("Party of {}", reservation.party_size)));
                    badge(ui, &reservation.status, self.theme);
                });
                ui.label(RichText::new(&reservation.customer_name).strong());
                ui.label(self.muted(&reservation.phone));
                if !reservation.notes.is_empty() {
                    ui.label(self.muted(&reservation.notes).italics());
                }
            });
            if hit {
                clicked = Some(Selection::Reservation(reservation.clone()));
            }
        }
        clicked
    }

    fn show_orders(&self, ui: &mut egui::Ui) -> Option<Selection> {
        let orders = self.state.filter.orders(&self.state.records);
        if orders.is_empty() {
            self.show_empty(ui);
            return None;
        }

        let mut clicked = None;
        for order in orders {
            let hit = self.row(ui, &order.id, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(RichText::new(&order.customer_name).strong());
                    ui.label(self.muted(format!(
                        "Pickup: {}",
                        format_timestamp(&order.pickup_time)
                    )));
                    badge(ui, &order.status, self.theme);
                });
                ui.horizontal(|ui| {
                    ui.label(self.muted(order.item_count_label()));
                    ui.label(
                        RichText::new(format_price(order.total))
                            .strong()
                            .color(self.theme.primary),
                    );
                });
            });
            if hit {
                clicked = Some(Selection::Order(order.clone()));
            }
        }
        clicked
    }

    fn show_complaints(&self, ui: &mut egui::Ui) -> Option<Selection> {
        let complaints = self.state.filter.complaints(&self.state.records);
        if complaints.is_empty() {
            self.show_empty(ui);
            return None;
        }

        let mut clicked = None;
        for complaint in complaints {
            let hit = self.row(ui, &complaint.id, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(RichText::new(&complaint.customer_name).strong());
                    ui.label(self.muted(format_timestamp(&complaint.date)));
                    badge_text(
                        ui,
                        &format!("{} Priority", complaint.priority.label()),
                        &complaint.priority,
                        self.theme,
                    );
                    badge(ui, &complaint.resolution, self.theme);
                });
                ui.label(&complaint.issue_summary);
            });
            if hit {
                clicked = Some(Selection::Complaint(complaint.clone()));
            }
        }
        clicked
    }
}
