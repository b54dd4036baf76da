//! Calendar sync reconciliation.

mod outcome;
mod reconciler;

pub use outcome::{SyncOutcome, SyncSummary};
pub use reconciler::{Reconciler, removal_targets};
