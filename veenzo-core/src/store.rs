//! The project datastore seam.

use crate::error::VeenzoResult;
use crate::persisted::PersistedEvent;

/// Insert and delete-by-id access to a project's stored events.
pub trait EventStore {
    fn insert(&self, event: &PersistedEvent) -> VeenzoResult<()>;

    /// All stored events, ascending by start.
    fn list(&self) -> VeenzoResult<Vec<PersistedEvent>>;

    /// Delete one event. Returns the removed row, or `None` if no row had
    /// that id.
    fn delete(&self, id: &str) -> VeenzoResult<Option<PersistedEvent>>;

    fn get(&self, id: &str) -> VeenzoResult<Option<PersistedEvent>> {
        Ok(self.list()?.into_iter().find(|e| e.id == id))
    }

    /// Delete every listed id that exists. Returns the removed rows.
    fn delete_many(&self, ids: &[String]) -> VeenzoResult<Vec<PersistedEvent>> {
        let mut removed = Vec::new();
        for id in ids {
            if let Some(event) = self.delete(id)? {
                removed.push(event);
            }
        }
        Ok(removed)
    }
}
