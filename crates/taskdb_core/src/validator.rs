//! Entity validation and payload normalization.

use crate::error::{EngineResult, ValidationError};
use crate::model::{Task, TaskPayload, User, UserPayload, UNASSIGNED};
use chrono::{DateTime, Utc};
use taskdb_store::{Collection, DocumentId};

/// A task payload that passed validation, with every field finalized.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    /// Validated task name.
    pub name: String,
    /// Description, defaulted to empty.
    pub description: String,
    /// Validated deadline.
    pub deadline: DateTime<Utc>,
    /// Completion flag.
    pub completed: bool,
    /// Resolved user reference.
    pub assigned_user: Option<DocumentId>,
    /// Display name re-derived from the referenced user, or
    /// `"unassigned"`.
    pub assigned_user_name: String,
}

impl TaskDraft {
    /// Builds a new task from this draft.
    pub(crate) fn into_task(self) -> Task {
        Task {
            id: DocumentId::new(),
            name: self.name,
            description: self.description,
            deadline: self.deadline,
            completed: self.completed,
            assigned_user: self.assigned_user,
            assigned_user_name: self.assigned_user_name,
            date_created: Utc::now(),
        }
    }

    /// Overwrites every replaceable field of an existing task.
    ///
    /// `id` and `date_created` are immutable and left untouched.
    pub(crate) fn apply_to(self, task: &mut Task) {
        task.name = self.name;
        task.description = self.description;
        task.deadline = self.deadline;
        task.completed = self.completed;
        task.assigned_user = self.assigned_user;
        task.assigned_user_name = self.assigned_user_name;
    }
}

/// A user payload that passed validation.
#[derive(Debug, Clone)]
pub struct UserDraft {
    /// Validated display name.
    pub name: String,
    /// Validated unique email.
    pub email: String,
    /// Deduplicated pending task ids.
    pub pending_tasks: Vec<DocumentId>,
}

impl UserDraft {
    /// Builds a new user from this draft.
    pub(crate) fn into_user(self) -> User {
        User {
            id: DocumentId::new(),
            name: self.name,
            email: self.email,
            pending_tasks: self.pending_tasks,
            date_created: Utc::now(),
        }
    }

    /// Overwrites every replaceable field of an existing user.
    ///
    /// `id` and `date_created` are immutable and left untouched.
    pub(crate) fn apply_to(self, user: &mut User) {
        user.name = self.name;
        user.email = self.email;
        user.pending_tasks = self.pending_tasks;
    }
}

/// Check-and-normalize for incoming payloads.
///
/// The validator reads the store (reference existence, email
/// uniqueness) but never writes. A payload that fails validation
/// causes no store mutation anywhere in a flow.
pub struct Validator {
    users: Collection<User>,
}

impl Validator {
    /// Creates a validator over the user collection.
    pub fn new(users: Collection<User>) -> Self {
        Self { users }
    }

    /// Validates and normalizes a task payload.
    ///
    /// A non-empty `assignedUser` must reference an existing user at
    /// validation time; when it does, the referenced user's current
    /// name overwrites any client-supplied `assignedUserName`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for missing required fields or a
    /// dangling user reference.
    pub fn normalize_task(&self, payload: TaskPayload) -> EngineResult<TaskDraft> {
        let name = payload
            .name
            .filter(|n| !n.is_empty())
            .ok_or(ValidationError::TaskRequiredFields)?;
        let deadline = payload
            .deadline
            .ok_or(ValidationError::TaskRequiredFields)?;

        let (assigned_user, assigned_user_name) = match payload.assigned_user {
            Some(user_id) => {
                let user = self
                    .users
                    .get(user_id)?
                    .ok_or(ValidationError::AssignedUserNotFound)?;
                (Some(user_id), user.name)
            }
            None => (None, UNASSIGNED.to_string()),
        };

        Ok(TaskDraft {
            name,
            description: payload.description.unwrap_or_default(),
            deadline,
            completed: payload.completed,
            assigned_user,
            assigned_user_name,
        })
    }

    /// Validates and normalizes a user payload.
    ///
    /// `exclude` carries the id of the user being updated so its own
    /// email doesn't count as a collision.
    ///
    /// # Errors
    ///
    /// Returns a validation error for missing required fields or a
    /// duplicate email.
    pub fn normalize_user(
        &self,
        payload: UserPayload,
        exclude: Option<DocumentId>,
    ) -> EngineResult<UserDraft> {
        let name = payload
            .name
            .filter(|n| !n.is_empty())
            .ok_or(ValidationError::UserRequiredFields)?;
        let email = payload
            .email
            .filter(|e| !e.is_empty())
            .ok_or(ValidationError::UserRequiredFields)?;

        let taken = self
            .users
            .count(|u| u.email == email && Some(u.id) != exclude)?;
        if taken > 0 {
            return Err(ValidationError::EmailNotUnique.into());
        }

        Ok(UserDraft {
            name,
            email,
            pending_tasks: dedupe(payload.pending_tasks),
        })
    }
}

/// Drops duplicate ids, keeping first occurrences.
fn dedupe(ids: Vec<DocumentId>) -> Vec<DocumentId> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use taskdb_store::Store;

    fn setup() -> (Validator, Collection<User>) {
        let store = Store::in_memory();
        let users = store.collection::<User>();
        (Validator::new(users.clone()), users)
    }

    fn task_payload(name: &str) -> TaskPayload {
        TaskPayload {
            name: Some(name.into()),
            deadline: Some(Utc::now()),
            ..TaskPayload::default()
        }
    }

    fn user_payload(name: &str, email: &str) -> UserPayload {
        UserPayload {
            name: Some(name.into()),
            email: Some(email.into()),
            pending_tasks: Vec::new(),
        }
    }

    fn seed_user(users: &Collection<User>, name: &str, email: &str) -> User {
        users
            .insert(User {
                id: DocumentId::new(),
                name: name.into(),
                email: email.into(),
                pending_tasks: Vec::new(),
                date_created: Utc::now(),
            })
            .unwrap()
    }

    #[test]
    fn task_requires_name_and_deadline() {
        let (validator, _) = setup();

        let missing_name = TaskPayload {
            deadline: Some(Utc::now()),
            ..TaskPayload::default()
        };
        assert!(matches!(
            validator.normalize_task(missing_name),
            Err(EngineError::Validation(ValidationError::TaskRequiredFields))
        ));

        let missing_deadline = TaskPayload {
            name: Some("n".into()),
            ..TaskPayload::default()
        };
        assert!(matches!(
            validator.normalize_task(missing_deadline),
            Err(EngineError::Validation(ValidationError::TaskRequiredFields))
        ));

        let empty_name = TaskPayload {
            name: Some(String::new()),
            deadline: Some(Utc::now()),
            ..TaskPayload::default()
        };
        assert!(validator.normalize_task(empty_name).is_err());
    }

    #[test]
    fn dangling_reference_is_rejected() {
        let (validator, _) = setup();
        let mut payload = task_payload("t");
        payload.assigned_user = Some(DocumentId::new());

        assert!(matches!(
            validator.normalize_task(payload),
            Err(EngineError::Validation(
                ValidationError::AssignedUserNotFound
            ))
        ));
    }

    #[test]
    fn client_supplied_name_is_overwritten() {
        let (validator, users) = setup();
        let ada = seed_user(&users, "Ada", "ada@example.com");

        let mut payload = task_payload("t");
        payload.assigned_user = Some(ada.id);
        payload.assigned_user_name = Some("Impostor".into());

        let draft = validator.normalize_task(payload).unwrap();
        assert_eq!(draft.assigned_user, Some(ada.id));
        assert_eq!(draft.assigned_user_name, "Ada");
    }

    #[test]
    fn unassigned_gets_placeholder_name() {
        let (validator, _) = setup();
        let mut payload = task_payload("t");
        payload.assigned_user_name = Some("whoever".into());

        let draft = validator.normalize_task(payload).unwrap();
        assert_eq!(draft.assigned_user, None);
        assert_eq!(draft.assigned_user_name, UNASSIGNED);
    }

    #[test]
    fn user_requires_name_and_email() {
        let (validator, _) = setup();
        let payload = UserPayload {
            name: Some("n".into()),
            ..UserPayload::default()
        };
        assert!(matches!(
            validator.normalize_user(payload, None),
            Err(EngineError::Validation(ValidationError::UserRequiredFields))
        ));
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let (validator, users) = setup();
        seed_user(&users, "Ada", "ada@example.com");

        let result = validator.normalize_user(user_payload("Eve", "ada@example.com"), None);
        assert!(matches!(
            result,
            Err(EngineError::Validation(ValidationError::EmailNotUnique))
        ));
    }

    #[test]
    fn own_email_is_not_a_collision() {
        let (validator, users) = setup();
        let ada = seed_user(&users, "Ada", "ada@example.com");

        let draft = validator
            .normalize_user(user_payload("Ada Lovelace", "ada@example.com"), Some(ada.id))
            .unwrap();
        assert_eq!(draft.email, "ada@example.com");
    }

    #[test]
    fn pending_tasks_are_deduplicated() {
        let (validator, _) = setup();
        let t1 = DocumentId::new();
        let t2 = DocumentId::new();

        let mut payload = user_payload("Ada", "ada@example.com");
        payload.pending_tasks = vec![t1, t2, t1, t1];

        let draft = validator.normalize_user(payload, None).unwrap();
        assert_eq!(draft.pending_tasks, vec![t1, t2]);
    }
}
