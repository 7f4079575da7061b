//! Incoming mutation payloads.
//!
//! Payloads are distinct from the stored entities so that absent fields
//! are distinguishable from present-but-empty ones; the validator turns
//! a payload into a normalized draft or a validation failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskdb_store::DocumentId;

/// A requested task create or full update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskPayload {
    /// Task name; required.
    pub name: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Deadline; required.
    pub deadline: Option<DateTime<Utc>>,
    /// Completion flag; defaults to false.
    pub completed: bool,
    /// Requested assigned user; empty string means unassigned.
    #[serde(with = "super::id_as_empty_string")]
    pub assigned_user: Option<DocumentId>,
    /// Client-supplied display name; never trusted when a live
    /// reference is given.
    pub assigned_user_name: Option<String>,
}

/// A requested user create or full update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPayload {
    /// Display name; required.
    pub name: Option<String>,
    /// Email address; required, globally unique.
    pub email: Option<String>,
    /// Task ids to assign to this user; duplicates are dropped.
    pub pending_tasks: Vec<DocumentId>,
}
