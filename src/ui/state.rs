//! Dashboard state: record browser selections plus the mirrored call snapshot

use crate::call::{CallCommand, CallEvent, CallHandle, CallSnapshot};
use crate::records::{
    compute_stats, CallLog, Complaint, Order, RecordFilter, RecordSet, Reservation, Stats,
};
use crossbeam_channel::Receiver;
use tracing::{debug, warn};

/// Record browser tabs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecordTab {
    #[default]
    Calls,
    Reservations,
    Orders,
    Complaints,
}

impl RecordTab {
    pub const ALL: [RecordTab; 4] = [
        RecordTab::Calls,
        RecordTab::Reservations,
        RecordTab::Orders,
        RecordTab::Complaints,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RecordTab::Calls => "All Calls",
            RecordTab::Reservations => "Reservations",
            RecordTab::Orders => "Orders",
            RecordTab::Complaints => "Complaints",
        }
    }
}

/// Record opened in a detail window
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Call(CallLog),
    Reservation(Reservation),
    Order(Order),
    Complaint(Complaint),
}

impl Selection {
    pub fn title(&self) -> &'static str {
        match self {
            Selection::Call(_) => "Call Details",
            Selection::Reservation(_) => "Reservation Details",
            Selection::Order(_) => "Order Details",
            Selection::Complaint(_) => "Complaint Details",
        }
    }
}

/// Everything the dashboard renders
pub struct DashboardState {
    pub use_sample_data: bool,
    pub records: RecordSet,
    pub stats: Stats,
    pub filter: RecordFilter,
    pub active_tab: RecordTab,
    pub selected: Option<Selection>,

    /// Last known call state
    pub call: CallSnapshot,

    /// Most recent command that could not be delivered
    pub last_error: Option<String>,

    call_handle: Option<CallHandle>,
    call_events: Option<Receiver<CallEvent>>,
}

impl DashboardState {
    pub fn new(use_sample_data: bool) -> Self {
        let mut state = Self {
            use_sample_data,
            records: RecordSet::empty(),
            stats: Stats::default(),
            filter: RecordFilter::default(),
            active_tab: RecordTab::default(),
            selected: None,
            call: CallSnapshot::default(),
            last_error: None,
            call_handle: None,
            call_events: None,
        };
        state.reload_records();
        state
    }

    /// Attach to a running call controller
    pub fn with_call_handle(mut self, handle: CallHandle) -> Self {
        self.call_events = Some(handle.subscribe());
        self.call = handle.snapshot();
        self.call_handle = Some(handle);
        self
    }

    pub fn call_handle(&self) -> Option<&CallHandle> {
        self.call_handle.as_ref()
    }

    pub fn set_sample_data(&mut self, enabled: bool) {
        if self.use_sample_data != enabled {
            self.use_sample_data = enabled;
            self.reload_records();
        }
    }

    fn reload_records(&mut self) {
        self.records = if self.use_sample_data {
            RecordSet::sample()
        } else {
            RecordSet::empty()
        };
        self.stats = compute_stats(&self.records);
        self.selected = None;
        debug!(
            "Loaded records (sample data: {}, calls: {})",
            self.use_sample_data,
            self.records.calls.len()
        );
    }

    /// Drain pending call events and refresh the snapshot if anything changed
    pub fn poll_call_events(&mut self) -> bool {
        let Some(events) = &self.call_events else {
            return false;
        };

        let changed = events.try_iter().count() > 0;
        if changed {
            if let Some(handle) = &self.call_handle {
                self.call = handle.snapshot();
            }
        }
        changed
    }

    /// Forward a command to the controller
    pub fn dispatch(&mut self, command: CallCommand) {
        let Some(handle) = &self.call_handle else {
            debug!("No call controller attached, dropping {:?}", command);
            return;
        };

        if let Err(e) = handle.send_command(command) {
            warn!("Failed to dispatch {:?}: {}", command, e);
            self.last_error = Some(e.to_string());
        }
    }

    pub fn select(&mut self, selection: Selection) {
        self.selected = Some(selection);
    }

    pub fn close_details(&mut self) {
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::{CallController, CallStatus};
    use crate::config::VoiceConfig;
    use crate::records::StatusFilter;

    #[test]
    fn test_sample_toggle_reloads_records_and_stats() {
        let mut state = DashboardState::new(false);
        assert!(state.records.is_empty());
        assert_eq!(state.stats, Stats::default());

        state.set_sample_data(true);
        assert_eq!(state.records.calls.len(), 5);
        assert_eq!(state.stats.todays_calls, 5);
        assert_eq!(state.stats.reservations, 2);

        state.select(Selection::Call(state.records.calls[0].clone()));
        state.set_sample_data(false);
        assert!(state.records.is_empty());
        assert!(state.selected.is_none());
    }

    #[test]
    fn test_filter_is_kept_across_toggle() {
        let mut state = DashboardState::new(true);
        state.filter = RecordFilter::new("sarah", StatusFilter::Upcoming);
        state.set_sample_data(false);
        state.set_sample_data(true);
        assert_eq!(state.filter.reservations(&state.records).len(), 1);
    }

    #[test]
    fn test_selection_titles() {
        let records = RecordSet::sample();
        assert_eq!(
            Selection::Order(records.orders[0].clone()).title(),
            "Order Details"
        );
        assert_eq!(
            Selection::Complaint(records.complaints[0].clone()).title(),
            "Complaint Details"
        );
    }

    #[test]
    fn test_poll_refreshes_snapshot_from_controller_state() {
        let (_controller, handle) = CallController::new(
            VoiceConfig::default(),
            Box::new(crate::session::HttpNegotiator::new("http://127.0.0.1:9", 24000)),
            Box::new(crate::audio::UnavailableBackend),
        );
        let mut state = DashboardState::new(false).with_call_handle(handle.clone());
        assert!(!state.poll_call_events());

        handle.state().write().begin_connecting();
        assert!(state.poll_call_events());
        assert_eq!(state.call.status, CallStatus::Connecting);
    }

    #[test]
    fn test_dispatch_without_controller_is_ignored() {
        let mut state = DashboardState::new(false);
        state.dispatch(CallCommand::StartCall);
        assert!(state.last_error.is_none());
    }
}
