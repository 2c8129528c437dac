//! Main application struct and eframe integration

use crate::audio::AudioBackend;
use crate::call::{CallCommand, CallController, CallStatus};
use crate::config::AppConfig;
use crate::records::{
    format_timestamp, CallOutcome, OrderStatus, Priority, RecordSet, ReservationStatus,
    StatusFilter,
};
use crate::session::HttpNegotiator;
use crate::ui::components::{CallPanel, DetailWindow, RecordList, StatCard, StatusDot};
use crate::ui::state::{DashboardState, RecordTab};
use crate::ui::theme::Theme;
use egui::{self, CentralPanel, RichText, TopBottomPanel};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{info, warn};

/// Heritage Cafe dashboard
pub struct ReceptionistApp {
    state: DashboardState,
    theme: Theme,
    agent_id: String,
    controller: Option<JoinHandle<()>>,
}

impl ReceptionistApp {
    /// Create the app and start the call controller thread
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        audio: Box<dyn AudioBackend>,
    ) -> crate::Result<Self> {
        let theme = Theme::heritage();
        theme.apply(&cc.egui_ctx);

        let negotiator = HttpNegotiator::new(
            config.voice.session_url.clone(),
            config.voice.default_playback_sample_rate,
        );
        let agent_id = config.voice.agent_id.clone();
        let (controller, handle) =
            CallController::new(config.voice, Box::new(negotiator), audio);
        let thread = controller.spawn()?;

        let state = DashboardState::new(config.dashboard.use_sample_data).with_call_handle(handle);

        Ok(Self {
            state,
            theme,
            agent_id,
            controller: Some(thread),
        })
    }

    /// App without a controller; commands are returned from [`Self::show`] only
    pub fn from_state(state: DashboardState, agent_id: impl Into<String>) -> Self {
        Self {
            state,
            theme: Theme::heritage(),
            agent_id: agent_id.into(),
            controller: None,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut DashboardState {
        &mut self.state
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.card)
                    .inner_margin(egui::Margin::symmetric(self.theme.spacing_lg, 12.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.label(
                            RichText::new("Heritage Cafe")
                                .size(22.0)
                                .strong()
                                .color(self.theme.primary),
                        );
                        ui.label(
                            RichText::new("AI Voice Receptionist Dashboard")
                                .size(13.0)
                                .color(self.theme.muted_foreground),
                        );
                    });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let mut sample = self.state.use_sample_data;
                        if ui.checkbox(&mut sample, "Sample Data").changed() {
                            self.state.set_sample_data(sample);
                        }
                        ui.add_space(self.theme.spacing);
                        StatusDot::new(self.state.call.in_call(), &self.theme).show(ui);
                    });
                });
            });
    }

    fn show_agent_info(&self, ctx: &egui::Context) {
        TopBottomPanel::bottom("agent_info")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.secondary)
                    .inner_margin(egui::Margin::symmetric(self.theme.spacing_lg, 8.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_wrapped(|ui| {
                    let muted = |text: String| {
                        RichText::new(text)
                            .size(12.0)
                            .color(self.theme.muted_foreground)
                    };
                    ui.label(muted("Agent: Cafe Receptionist Agent".into()));
                    ui.label(muted(format!(
                        "ID: {} • Type: Voice (WebSocket)",
                        self.agent_id
                    )));
                    ui.label(muted(format!(
                        "Status: {}",
                        self.state.call.status.label()
                    )));
                });
            });
    }

    fn show_stats(&self, ui: &mut egui::Ui) {
        let stats = &self.state.stats;
        let trends = stat_trends(&self.state.records);
        ui.horizontal_wrapped(|ui| {
            StatCard::new("Today's Calls", stats.todays_calls, &trends[0], &self.theme).show(ui);
            StatCard::new(
                "Active Reservations",
                stats.reservations,
                &trends[1],
                &self.theme,
            )
            .show(ui);
            StatCard::new("Pending Orders", stats.orders, &trends[2], &self.theme).show(ui);
            StatCard::new("Open Complaints", stats.complaints, &trends[3], &self.theme).show(ui);
        });
    }

    fn show_filters(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let search = egui::TextEdit::singleline(&mut self.state.filter.search)
                .hint_text("Search by customer name, phone, or details...")
                .desired_width((ui.available_width() - 200.0).max(160.0))
                .id(egui::Id::new("record_search"));
            ui.add(search).widget_info(|| {
                egui::WidgetInfo::labeled(egui::WidgetType::TextEdit, true, "Search records")
            });

            let current = self.state.filter.status;
            egui::ComboBox::from_id_salt("status_filter")
                .selected_text(current.label())
                .width(180.0)
                .show_ui(ui, |ui| {
                    for option in StatusFilter::OPTIONS {
                        ui.selectable_value(&mut self.state.filter.status, option, option.label());
                    }
                })
                .response
                .on_hover_text("Filter by status");
        });
    }

    fn show_tabs(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for tab in RecordTab::ALL {
                let selected = self.state.active_tab == tab;
                if ui.selectable_label(selected, tab.label()).clicked() {
                    self.state.active_tab = tab;
                }
            }
        });
    }

    /// Render one frame; returns the call command issued by the user, if any
    pub fn show(&mut self, ctx: &egui::Context) -> Option<CallCommand> {
        if self.state.poll_call_events() {
            ctx.request_repaint();
        }

        self.show_header(ctx);
        self.show_agent_info(ctx);

        let mut command = None;
        let mut clicked = None;
        CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(self.theme.background)
                    .inner_margin(self.theme.spacing_lg),
            )
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("dashboard")
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        command = CallPanel::new(&self.state.call, &self.theme).show(ui);
                        ui.add_space(self.theme.spacing);
                        self.show_stats(ui);
                        ui.add_space(self.theme.spacing);
                        self.show_filters(ui);
                        self.show_tabs(ui);
                        clicked = RecordList::new(&self.state, &self.theme).show(ui);
                    });
            });

        if let Some(selection) = clicked {
            self.state.select(selection);
        }

        if let Some(selection) = &self.state.selected {
            if !DetailWindow::new(selection, &self.theme).show(ctx) {
                self.state.close_details();
            }
        }

        if let Some(command) = command {
            info!("User requested {:?}", command);
            self.state.dispatch(command);
        }

        command
    }
}

/// Sub-lines under the four stat cards
fn stat_trends(records: &RecordSet) -> [String; 4] {
    let completed = records
        .calls
        .iter()
        .filter(|c| c.status == CallOutcome::Completed)
        .count();

    let next = records
        .reservations
        .iter()
        .filter(|r| r.status == ReservationStatus::Upcoming)
        .map(|r| r.date_time)
        .min();

    let ready = records
        .orders
        .iter()
        .filter(|o| o.status == OrderStatus::Ready)
        .count();

    let high = records
        .complaints
        .iter()
        .filter(|c| c.priority == Priority::High)
        .count();

    [
        format!("{} completed", completed),
        match next {
            Some(at) => format!("Next: {}", format_timestamp(&at)),
            None => "None upcoming".to_string(),
        },
        format!("{} ready for pickup", ready),
        format!("{} high priority", high),
    ]
}

impl eframe::App for ReceptionistApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show(ctx);

        // Call state changes arrive from the controller thread
        let interval = if self.state.call.status == CallStatus::Idle {
            Duration::from_millis(250)
        } else {
            Duration::from_millis(50)
        };
        ctx.request_repaint_after(interval);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Receptionist dashboard shutting down");
        self.state.dispatch(CallCommand::Shutdown);

        if let Some(thread) = self.controller.take() {
            if thread.join().is_err() {
                warn!("Call controller thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_trends_from_sample_data() {
        let trends = stat_trends(&RecordSet::sample());
        assert_eq!(trends[0], "5 completed");
        assert_eq!(trends[1], "Next: Feb 14, 2026, 07:00 PM");
        assert_eq!(trends[2], "1 ready for pickup");
        assert_eq!(trends[3], "1 high priority");
    }

    #[test]
    fn test_stat_trends_when_empty() {
        let trends = stat_trends(&RecordSet::empty());
        assert_eq!(trends[1], "None upcoming");
        assert_eq!(trends[2], "0 ready for pickup");
    }
}
