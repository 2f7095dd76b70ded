//! Calendar busy-time adapters

pub mod google;

pub use google::GoogleCalendarBusyTime;
