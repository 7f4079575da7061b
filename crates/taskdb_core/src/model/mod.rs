//! Data model: tasks, users, and incoming payloads.
//!
//! Wire names are camelCase (`assignedUser`, `pendingTasks`, ...) and
//! timestamps are RFC 3339, matching the public API. An unassigned task
//! serializes its `assignedUser` as the empty string and its
//! `assignedUserName` as the literal `"unassigned"`.

mod payload;
mod task;
mod user;

pub use payload::{TaskPayload, UserPayload};
pub use task::Task;
pub use user::User;

/// Display name cached on a task that has no assigned user.
pub const UNASSIGNED: &str = "unassigned";

pub(crate) fn unassigned_name() -> String {
    UNASSIGNED.to_string()
}

/// Serde adapter mapping `Option<DocumentId>` to the wire convention
/// where the empty string means "no reference".
pub(crate) mod id_as_empty_string {
    use serde::{Deserialize, Deserializer, Serializer};
    use taskdb_store::DocumentId;

    pub fn serialize<S>(value: &Option<DocumentId>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(id) => serializer.collect_str(id),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DocumentId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Accept null as well as the empty string; both mean unassigned.
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref() {
            None | Some("") => Ok(None),
            Some(s) => DocumentId::parse_str(s)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use taskdb_store::DocumentId;

    #[test]
    fn unassigned_task_wire_format() {
        let task = Task {
            id: DocumentId::new(),
            name: "write report".into(),
            description: String::new(),
            deadline: Utc::now(),
            completed: false,
            assigned_user: None,
            assigned_user_name: UNASSIGNED.into(),
            date_created: Utc::now(),
        };

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["assignedUser"], "");
        assert_eq!(json["assignedUserName"], "unassigned");
        assert!(json["dateCreated"].is_string());
    }

    #[test]
    fn assigned_user_roundtrips_as_string() {
        let user_id = DocumentId::new();
        let task = Task {
            id: DocumentId::new(),
            name: "review".into(),
            description: String::new(),
            deadline: Utc::now(),
            completed: false,
            assigned_user: Some(user_id),
            assigned_user_name: "Ada".into(),
            date_created: Utc::now(),
        };

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["assignedUser"], user_id.to_string());

        let back: Task = serde_json::from_value(json).unwrap();
        assert_eq!(back.assigned_user, Some(user_id));
    }

    #[test]
    fn payload_defaults_apply() {
        let payload: TaskPayload = serde_json::from_str(
            r#"{"name": "n", "deadline": "2026-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(!payload.completed);
        assert_eq!(payload.assigned_user, None);
        assert_eq!(payload.description, None);

        let payload: UserPayload = serde_json::from_str(r#"{"name": "n"}"#).unwrap();
        assert!(payload.pending_tasks.is_empty());
        assert_eq!(payload.email, None);
    }

    #[test]
    fn null_assigned_user_means_unassigned() {
        let payload: TaskPayload = serde_json::from_str(
            r#"{"name": "n", "deadline": "2026-01-01T00:00:00Z", "assignedUser": null}"#,
        )
        .unwrap();
        assert_eq!(payload.assigned_user, None);
    }

    #[test]
    fn malformed_pending_task_id_is_rejected() {
        let result: Result<UserPayload, _> = serde_json::from_str(
            r#"{"name": "n", "email": "n@x.io", "pendingTasks": ["not-an-id"]}"#,
        );
        assert!(result.is_err());
    }
}
