//! User entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskdb_store::{Document, DocumentId};

/// A user document.
///
/// `pending_tasks` is a set of task ids: duplicates are suppressed and
/// order carries no meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-assigned identifier.
    pub id: DocumentId,
    /// Display name.
    pub name: String,
    /// Globally unique email address.
    pub email: String,
    /// Ids of tasks assigned to this user and not yet completed.
    #[serde(default)]
    pub pending_tasks: Vec<DocumentId>,
    /// Set once at creation; never changed by updates.
    pub date_created: DateTime<Utc>,
}

impl User {
    /// Adds a task id with set-union semantics (no duplicates).
    pub fn add_pending(&mut self, task: DocumentId) {
        if !self.pending_tasks.contains(&task) {
            self.pending_tasks.push(task);
        }
    }

    /// Removes a task id; absent ids are a no-op.
    pub fn remove_pending(&mut self, task: DocumentId) {
        self.pending_tasks.retain(|t| *t != task);
    }

    /// Returns true if the task id is in the pending set.
    #[must_use]
    pub fn has_pending(&self, task: DocumentId) -> bool {
        self.pending_tasks.contains(&task)
    }
}

impl Document for User {
    const COLLECTION: &'static str = "users";

    fn id(&self) -> DocumentId {
        self.id
    }

    fn set_id(&mut self, id: DocumentId) {
        self.id = id;
    }
}
