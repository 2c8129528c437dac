//! Dashboard widgets

mod badge;
mod call_panel;
mod detail_window;
mod level_meter;
mod record_list;
mod stat_card;
mod status_dot;

pub use badge::{badge, badge_text};
pub use call_panel::{CallPanel, THINKING_MESSAGE};
pub use detail_window::DetailWindow;
pub use level_meter::LevelMeter;
pub use record_list::RecordList;
pub use stat_card::StatCard;
pub use status_dot::StatusDot;
