//! Google Calendar remote for veenzo.

mod calendar;
mod google_event;
pub mod remote_config;
pub mod session;

pub use calendar::GoogleCalendar;
pub use remote_config::GoogleRemoteConfig;
pub use session::Session;
