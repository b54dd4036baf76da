use std::fmt;

/// Result of pushing one event to the remote calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Created { remote_id: String },
    /// A matching event already existed remotely.
    Skipped { remote_id: String },
    Failed { reason: String },
}

impl SyncOutcome {
    /// Whether the remote calendar now holds the event.
    pub fn success(&self) -> bool {
        !matches!(self, SyncOutcome::Failed { .. })
    }

    pub fn skipped(&self) -> bool {
        matches!(self, SyncOutcome::Skipped { .. })
    }

    pub fn remote_id(&self) -> Option<&str> {
        match self {
            SyncOutcome::Created { remote_id } | SyncOutcome::Skipped { remote_id } => {
                Some(remote_id)
            }
            SyncOutcome::Failed { .. } => None,
        }
    }
}

/// Aggregate counts for a batch sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub created: usize,
    pub skipped: usize,
    pub errored: usize,
}

impl SyncSummary {
    pub fn record(&mut self, outcome: &SyncOutcome) {
        match outcome {
            SyncOutcome::Created { .. } => self.created += 1,
            SyncOutcome::Skipped { .. } => self.skipped += 1,
            SyncOutcome::Failed { .. } => self.errored += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.created + self.skipped + self.errored
    }

    pub fn has_errors(&self) -> bool {
        self.errored > 0
    }
}

impl fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} synced, {} skipped, {} errors",
            self.created, self.skipped, self.errored
        )
    }
}
