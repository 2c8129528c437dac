use super::sample::RecordSet;
use super::types::*;

/// Choices offered by the status filter
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    InProgress,
    Upcoming,
    Pending,
    Ready,
}

impl StatusFilter {
    pub const OPTIONS: [StatusFilter; 6] = [
        StatusFilter::All,
        StatusFilter::Completed,
        StatusFilter::InProgress,
        StatusFilter::Upcoming,
        StatusFilter::Pending,
        StatusFilter::Ready,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Completed => "completed",
            StatusFilter::InProgress => "in-progress",
            StatusFilter::Upcoming => "upcoming",
            StatusFilter::Pending => "pending",
            StatusFilter::Ready => "ready",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All Statuses",
            StatusFilter::Completed => "Completed",
            StatusFilter::InProgress => "In Progress",
            StatusFilter::Upcoming => "Upcoming",
            StatusFilter::Pending => "Pending",
            StatusFilter::Ready => "Ready",
        }
    }

    pub fn accepts(&self, status: &dyn StatusBadge) -> bool {
        *self == StatusFilter::All || self.key() == status.key()
    }
}

/// Search text plus status filter, applied to every record list
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordFilter {
    pub search: String,
    pub status: StatusFilter,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl RecordFilter {
    pub fn new(search: impl Into<String>, status: StatusFilter) -> Self {
        Self {
            search: search.into(),
            status,
        }
    }

    pub fn matches_call(&self, call: &CallLog) -> bool {
        self.status.accepts(&call.status)
            && (self.search.is_empty()
                || contains_ci(&call.summary, &self.search)
                || contains_ci(call.intent.key(), &self.search))
    }

    pub fn matches_reservation(&self, reservation: &Reservation) -> bool {
        self.status.accepts(&reservation.status)
            && (self.search.is_empty()
                || contains_ci(&reservation.customer_name, &self.search)
                || reservation.phone.contains(self.search.as_str()))
    }

    pub fn matches_order(&self, order: &Order) -> bool {
        self.status.accepts(&order.status)
            && (self.search.is_empty()
                || contains_ci(&order.customer_name, &self.search)
                || order.phone.contains(self.search.as_str()))
    }

    pub fn matches_complaint(&self, complaint: &Complaint) -> bool {
        self.status.accepts(&complaint.resolution)
            && (self.search.is_empty()
                || contains_ci(&complaint.customer_name, &self.search)
                || contains_ci(&complaint.issue_summary, &self.search))
    }

    pub fn calls<'a>(&self, records: &'a RecordSet) -> Vec<&'a CallLog> {
        records.calls.iter().filter(|c| self.matches_call(c)).collect()
    }

    pub fn reservations<'a>(&self, records: &'a RecordSet) -> Vec<&'a Reservation> {
        records
            .reservations
            .iter()
            .filter(|r| self.matches_reservation(r))
            .collect()
    }

    pub fn orders<'a>(&self, records: &'a RecordSet) -> Vec<&'a Order> {
        records.orders.iter().filter(|o| self.matches_order(o)).collect()
    }

    pub fn complaints<'a>(&self, records: &'a RecordSet) -> Vec<&'a Complaint> {
        records
            .complaints
            .iter()
            .filter(|c| self.matches_complaint(c))
            .collect()
    }
}

/// Stat card counts over the full, unfiltered set
pub fn compute_stats(records: &RecordSet) -> Stats {
    Stats {
        todays_calls: records.calls.len(),
        reservations: records
            .reservations
            .iter()
            .filter(|r| r.status == ReservationStatus::Upcoming)
            .count(),
        orders: records
            .orders
            .iter()
            .filter(|o| o.status != OrderStatus::PickedUp)
            .count(),
        complaints: records
            .complaints
            .iter()
            .filter(|c| c.resolution != Resolution::Resolved)
            .count(),
    }
}
