//! Task entity.

use super::UNASSIGNED;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskdb_store::{Document, DocumentId};

/// A task document.
///
/// `assigned_user` / `assigned_user_name` are a denormalized reference
/// to the owning user: the id is authoritative, the name is a display
/// cache re-derived from the referenced user on every write path that
/// touches the reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Store-assigned identifier.
    pub id: DocumentId,
    /// Task name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// When the task is due.
    pub deadline: DateTime<Utc>,
    /// Whether the task is completed.
    #[serde(default)]
    pub completed: bool,
    /// Id of the assigned user, if any.
    #[serde(default, with = "super::id_as_empty_string")]
    pub assigned_user: Option<DocumentId>,
    /// Cached name of the assigned user, or `"unassigned"`.
    #[serde(default = "super::unassigned_name")]
    pub assigned_user_name: String,
    /// Set once at creation; never changed by updates.
    pub date_created: DateTime<Utc>,
}

impl Task {
    /// Returns true if this task should appear in `user`'s pending set.
    #[must_use]
    pub fn is_pending_for(&self, user: DocumentId) -> bool {
        self.assigned_user == Some(user) && !self.completed
    }

    /// Drops the user reference and resets the cached name.
    pub fn clear_assignment(&mut self) {
        self.assigned_user = None;
        self.assigned_user_name = UNASSIGNED.to_string();
    }
}

impl Document for Task {
    const COLLECTION: &'static str = "tasks";

    fn id(&self) -> DocumentId {
        self.id
    }

    fn set_id(&mut self, id: DocumentId) {
        self.id = id;
    }
}
