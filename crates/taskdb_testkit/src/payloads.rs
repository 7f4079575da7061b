//! Payload builders for concise test setup.

use chrono::{DateTime, TimeZone, Utc};
use taskdb_core::model::{TaskPayload, UserPayload};
use taskdb_store::DocumentId;

/// A fixed deadline far enough in the future for any test.
#[must_use]
pub fn deadline() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()
}

/// A minimal valid task payload.
#[must_use]
pub fn task_named(name: &str) -> TaskPayload {
    TaskPayload {
        name: Some(name.to_string()),
        deadline: Some(deadline()),
        ..TaskPayload::default()
    }
}

/// A valid task payload assigned to `user`.
#[must_use]
pub fn task_assigned(name: &str, user: DocumentId) -> TaskPayload {
    TaskPayload {
        assigned_user: Some(user),
        ..task_named(name)
    }
}

/// A valid, already-completed task payload assigned to `user`.
#[must_use]
pub fn task_completed(name: &str, user: DocumentId) -> TaskPayload {
    TaskPayload {
        completed: true,
        ..task_assigned(name, user)
    }
}

/// A minimal valid user payload.
#[must_use]
pub fn user_named(name: &str, email: &str) -> UserPayload {
    UserPayload {
        name: Some(name.to_string()),
        email: Some(email.to_string()),
        pending_tasks: Vec::new(),
    }
}

/// A valid user payload listing pending task ids.
#[must_use]
pub fn user_with_pending(name: &str, email: &str, pending: Vec<DocumentId>) -> UserPayload {
    UserPayload {
        pending_tasks: pending,
        ..user_named(name, email)
    }
}
