//! Core library for veenzo: recurring project events, the local event
//! store, and reconciliation against a remote calendar.

pub mod error;
pub mod event_spec;
pub mod ics;
pub mod occurrence;
pub mod persisted;
pub mod project;
pub mod recurrence;
pub mod remote;
pub mod store;
pub mod sync;
pub mod veenzo;
pub mod veenzo_config;

pub use error::{VeenzoError, VeenzoResult};
pub use event_spec::{EventForm, EventSpec, RecurrenceKind, ValidationError};
pub use occurrence::{DedupKey, Occurrence};
pub use persisted::{PersistedEvent, RecurrenceMeta};
pub use project::Project;
pub use recurrence::{RecurrenceRule, expand};
pub use remote::{RemoteCalendar, RemoteEvent, RemoteEventDraft, RemoteQuery, RemoteStart};
pub use store::EventStore;
pub use sync::{Reconciler, SyncOutcome, SyncSummary, removal_targets};
pub use veenzo::Veenzo;
pub use veenzo_config::VeenzoConfig;
