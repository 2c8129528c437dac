//! Call, reservation, order and complaint records shown by the dashboard

pub mod filter;
pub mod format;
pub mod sample;
pub mod types;

pub use filter::{compute_stats, RecordFilter, StatusFilter};
pub use format::{format_duration, format_price, format_timestamp};
pub use sample::RecordSet;
pub use types::{
    CallIntent, CallLog, CallOutcome, Complaint, Order, OrderItem, OrderStatus, Priority,
    Reservation, ReservationStatus, Resolution, Stats, StatusBadge, Tone,
};
