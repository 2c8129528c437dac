use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Badge colour family
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Blue,
    Green,
    Red,
    Yellow,
    Purple,
    Gray,
}

/// A status shown as a badge and matched by the status filter
pub trait StatusBadge {
    /// Filter key, e.g. `in-progress`
    fn key(&self) -> &'static str;
    fn label(&self) -> &'static str;
    fn tone(&self) -> Tone;
}

macro_rules! status_enum {
    ($name:ident { $($variant:ident => ($key:literal, $label:literal, $tone:ident)),+ $(,)? }) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "kebab-case")]
        pub enum $name {
            $($variant),+
        }

        impl StatusBadge for $name {
            fn key(&self) -> &'static str {
                match self {
                    $($name::$variant => $key),+
                }
            }

            fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            fn tone(&self) -> Tone {
                match self {
                    $($name::$variant => Tone::$tone),+
                }
            }
        }
    };
}

status_enum!(CallIntent {
    Reservation => ("reservation", "Reservation", Blue),
    Order => ("order", "Order", Green),
    Complaint => ("complaint", "Complaint", Red),
    Inquiry => ("inquiry", "Inquiry", Purple),
});

status_enum!(CallOutcome {
    Completed => ("completed", "Completed", Green),
    InProgress => ("in-progress", "In Progress", Yellow),
    Missed => ("missed", "Missed", Red),
});

status_enum!(ReservationStatus {
    Upcoming => ("upcoming", "Upcoming", Blue),
    Past => ("past", "Past", Gray),
    Cancelled => ("cancelled", "Cancelled", Red),
});

status_enum!(OrderStatus {
    Pending => ("pending", "Pending", Yellow),
    Ready => ("ready", "Ready", Blue),
    PickedUp => ("picked-up", "Picked Up", Green),
});

status_enum!(Resolution {
    Unresolved => ("unresolved", "Unresolved", Red),
    InProgress => ("in-progress", "In Progress", Yellow),
    Resolved => ("resolved", "Resolved", Green),
});

status_enum!(Priority {
    Low => ("low", "Low", Blue),
    Medium => ("medium", "Medium", Yellow),
    High => ("high", "High", Red),
});

/// One handled phone call
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CallLog {
    pub id: String,
    pub timestamp: NaiveDateTime,
    pub duration_secs: u32,
    pub intent: CallIntent,
    pub summary: String,
    pub status: CallOutcome,
    pub transcript: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    pub date_time: NaiveDateTime,
    pub party_size: u32,
    pub customer_name: String,
    pub phone: String,
    pub notes: String,
    pub status: ReservationStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
    /// Unit price in dollars
    pub price: f64,
}

/// Takeout order
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub order_time: NaiveDateTime,
    pub pickup_time: NaiveDateTime,
    pub customer_name: String,
    pub phone: String,
    pub items: Vec<OrderItem>,
    pub total: f64,
    pub status: OrderStatus,
}

impl Order {
    /// "1 item", "3 items"
    pub fn item_count_label(&self) -> String {
        let count = self.items.len();
        format!("{} item{}", count, if count == 1 { "" } else { "s" })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    pub id: String,
    pub date: NaiveDateTime,
    pub customer_name: String,
    pub phone: String,
    pub issue_summary: String,
    pub details: String,
    pub resolution: Resolution,
    pub priority: Priority,
}

/// Headline counts for the stat cards
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub todays_calls: usize,
    pub reservations: usize,
    pub orders: usize,
    pub complaints: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_keys_and_labels() {
        assert_eq!(CallOutcome::InProgress.key(), "in-progress");
        assert_eq!(CallOutcome::InProgress.label(), "In Progress");
        assert_eq!(OrderStatus::PickedUp.key(), "picked-up");
        assert_eq!(OrderStatus::PickedUp.label(), "Picked Up");
        assert_eq!(CallIntent::Inquiry.tone(), Tone::Purple);
        assert_eq!(Priority::High.tone(), Tone::Red);
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::PickedUp).unwrap(),
            "\"picked-up\""
        );
        let resolution: Resolution = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(resolution, Resolution::InProgress);
    }
}
