//! The consistency-synchronization engine.
//!
//! Each mutation flow is a short ordered sequence of independent store
//! calls. No lock is held across calls and no call is wrapped in a
//! transaction: every step commits on its own and is immediately
//! visible to concurrent flows. A step that fails aborts the remaining
//! sequence; steps already committed stay committed, and because every
//! cross-entity step is an idempotent set-add, set-pull, or sweep, a
//! caller re-issuing the mutation converges the store.

use crate::error::{EngineError, EngineResult, EntityKind};
use crate::model::{Task, TaskPayload, User, UserPayload};
use crate::validator::Validator;
use taskdb_store::{Collection, DocumentId, Store};
use tracing::{debug, info};

/// The sync engine over the task and user collections.
///
/// Keeps the bidirectional reference between `Task.assignedUser` /
/// `assignedUserName` and `User.pendingTasks` mutually correct across
/// create, full update, and delete on either side.
///
/// # Consistency
///
/// After every successful mutation:
///
/// 1. Every open task with an owner appears in that owner's
///    `pendingTasks`.
/// 2. A completed or unassigned task appears in nobody's
///    `pendingTasks`.
/// 3. `assignedUserName` mirrors the referenced user's current name,
///    or is `"unassigned"`.
/// 4. `assignedUser` never references a missing user at write time.
///
/// Concurrent flows may interleave between steps; the engine
/// deliberately adds no locking, so corrective re-issues rather than
/// isolation are the recovery mechanism.
pub struct SyncEngine {
    tasks: Collection<Task>,
    users: Collection<User>,
    validator: Validator,
}

impl SyncEngine {
    /// Creates an engine over the store's task and user collections.
    #[must_use]
    pub fn new(store: &Store) -> Self {
        let tasks = store.collection::<Task>();
        let users = store.collection::<User>();
        let validator = Validator::new(users.clone());
        Self {
            tasks,
            users,
            validator,
        }
    }

    /// Returns the task collection handle.
    #[must_use]
    pub fn tasks(&self) -> &Collection<Task> {
        &self.tasks
    }

    /// Returns the user collection handle.
    #[must_use]
    pub fn users(&self) -> &Collection<User> {
        &self.users
    }

    /// Creates a task.
    ///
    /// Writes the task first; if it is assigned and open, adds its id to
    /// the owner's `pendingTasks` (set-union, safe to retry). A task
    /// created already-completed issues no pending write.
    ///
    /// # Errors
    ///
    /// Validation failures precede any write.
    pub fn create_task(&self, payload: TaskPayload) -> EngineResult<Task> {
        let draft = self.validator.normalize_task(payload)?;
        let task = self.tasks.insert(draft.into_task())?;

        if let Some(owner) = task.assigned_user {
            if !task.completed {
                let task_id = task.id;
                self.users.update(owner, |u| u.add_pending(task_id))?;
                debug!(task = %task_id, user = %owner, "added task to pending set");
            }
        }

        info!(task = %task.id, "task created");
        Ok(task)
    }

    /// Fully replaces a task.
    ///
    /// After saving the new field values, reconciles in order: pull the
    /// id from the previous owner's pending set, add it to the new
    /// owner's if the task is open, and if the task is now completed
    /// sweep the id out of every user's pending set. The steps are
    /// independent store calls; a failure leaves earlier steps
    /// committed.
    ///
    /// # Errors
    ///
    /// Returns not-found if the id doesn't resolve; validation failures
    /// precede any write.
    pub fn update_task(&self, id: DocumentId, payload: TaskPayload) -> EngineResult<Task> {
        let existing = self
            .tasks
            .get(id)?
            .ok_or_else(|| EngineError::not_found(EntityKind::Task, id))?;
        let draft = self.validator.normalize_task(payload)?;
        let previous_owner = existing.assigned_user;

        let mut task = existing;
        draft.apply_to(&mut task);
        self.tasks.save(&task)?;

        if let Some(old) = previous_owner {
            self.users.update(old, |u| u.remove_pending(id))?;
            debug!(task = %id, user = %old, "removed task from previous owner");
        }
        if let Some(new) = task.assigned_user {
            if !task.completed {
                self.users.update(new, |u| u.add_pending(id))?;
                debug!(task = %id, user = %new, "added task to new owner");
            }
        }
        if task.completed {
            let swept = self
                .users
                .update_many(|u| u.has_pending(id), |u| u.remove_pending(id))?;
            debug!(task = %id, swept, "swept completed task from pending sets");
        }

        info!(task = %id, "task updated");
        Ok(task)
    }

    /// Deletes a task.
    ///
    /// The owner's pending set is cleaned up **before** the delete: if
    /// the cleanup fails, the task still exists and the inconsistency
    /// stays visible and retryable.
    ///
    /// # Errors
    ///
    /// Returns not-found if the id doesn't resolve.
    pub fn delete_task(&self, id: DocumentId) -> EngineResult<()> {
        let task = self
            .tasks
            .get(id)?
            .ok_or_else(|| EngineError::not_found(EntityKind::Task, id))?;

        if let Some(owner) = task.assigned_user {
            self.users.update(owner, |u| u.remove_pending(id))?;
            debug!(task = %id, user = %owner, "removed task from owner before delete");
        }
        self.tasks.delete(id)?;

        info!(task = %id, "task deleted");
        Ok(())
    }

    /// Creates a user.
    ///
    /// Writes the user first, then backfills: every task listed in
    /// `pendingTasks` is forced to point at the new user and reopened
    /// (`completed = false`), even if it was previously completed or
    /// assigned elsewhere. Listed ids naming no task match nothing.
    ///
    /// # Errors
    ///
    /// Validation failures (including a taken email) precede any write.
    pub fn create_user(&self, payload: UserPayload) -> EngineResult<User> {
        let draft = self.validator.normalize_user(payload, None)?;
        let user = self.users.insert(draft.into_user())?;

        self.backfill_pending(&user)?;

        info!(user = %user.id, "user created");
        Ok(user)
    }

    /// Fully replaces a user.
    ///
    /// Clears the reference on every task currently pointing at this
    /// user **before** saving the new field values, so a task that
    /// stays listed in the new `pendingTasks` is re-assigned by the
    /// backfill rather than left cleared. The new list is authoritative
    /// for both the old and new task sets.
    ///
    /// # Errors
    ///
    /// Returns not-found if the id doesn't resolve; validation failures
    /// precede any write.
    pub fn update_user(&self, id: DocumentId, payload: UserPayload) -> EngineResult<User> {
        let existing = self
            .users
            .get(id)?
            .ok_or_else(|| EngineError::not_found(EntityKind::User, id))?;
        let draft = self.validator.normalize_user(payload, Some(id))?;

        let cleared = self
            .tasks
            .update_many(|t| t.assigned_user == Some(id), |t| t.clear_assignment())?;
        debug!(user = %id, cleared, "cleared tasks before replace");

        let mut user = existing;
        draft.apply_to(&mut user);
        self.users.save(&user)?;

        self.backfill_pending(&user)?;

        info!(user = %id, "user updated");
        Ok(user)
    }

    /// Deletes a user.
    ///
    /// Clears the reference on every task pointing at this user, then
    /// deletes the user document. The tasks themselves survive.
    ///
    /// # Errors
    ///
    /// Returns not-found if the id doesn't resolve.
    pub fn delete_user(&self, id: DocumentId) -> EngineResult<()> {
        let user = self
            .users
            .get(id)?
            .ok_or_else(|| EngineError::not_found(EntityKind::User, id))?;

        let cleared = self
            .tasks
            .update_many(|t| t.assigned_user == Some(id), |t| t.clear_assignment())?;
        debug!(user = %id, cleared, "cleared tasks before delete");
        self.users.delete(user.id)?;

        info!(user = %id, "user deleted");
        Ok(())
    }

    /// Forces every task in the user's pending list to point at the
    /// user and be open. Unconditional by design: listing a task at
    /// user create/update time always reopens and (re)assigns it.
    fn backfill_pending(&self, user: &User) -> EngineResult<()> {
        if user.pending_tasks.is_empty() {
            return Ok(());
        }

        let owner = user.id;
        let owner_name = user.name.clone();
        let pending = user.pending_tasks.clone();
        let backfilled = self.tasks.update_many(
            |t| pending.contains(&t.id),
            |t| {
                t.assigned_user = Some(owner);
                t.assigned_user_name = owner_name.clone();
                t.completed = false;
            },
        )?;
        debug!(user = %owner, backfilled, "backfilled pending tasks");
        Ok(())
    }
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("tasks", &self.tasks.len())
            .field("users", &self.users.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::model::UNASSIGNED;
    use chrono::Utc;

    fn engine() -> SyncEngine {
        SyncEngine::new(&Store::in_memory())
    }

    fn task_payload(name: &str) -> TaskPayload {
        TaskPayload {
            name: Some(name.into()),
            deadline: Some(Utc::now()),
            ..TaskPayload::default()
        }
    }

    fn assigned_payload(name: &str, user: DocumentId, completed: bool) -> TaskPayload {
        TaskPayload {
            name: Some(name.into()),
            deadline: Some(Utc::now()),
            completed,
            assigned_user: Some(user),
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

    #[test]
    fn create_assigned_task_updates_pending_set() {
        let engine = engine();
        let ada = engine.create_user(user_payload("Ada", "ada@example.com")).unwrap();

        let task = engine
            .create_task(assigned_payload("t", ada.id, false))
            .unwrap();

        assert_eq!(task.assigned_user_name, "Ada");
        let ada = engine.users().get(ada.id).unwrap().unwrap();
        assert!(ada.has_pending(task.id));
    }

    #[test]
    fn create_completed_task_skips_pending_write() {
        let engine = engine();
        let ada = engine.create_user(user_payload("Ada", "ada@example.com")).unwrap();

        let task = engine
            .create_task(assigned_payload("t", ada.id, true))
            .unwrap();

        assert!(task.completed);
        assert_eq!(task.assigned_user, Some(ada.id));
        let ada = engine.users().get(ada.id).unwrap().unwrap();
        assert!(!ada.has_pending(task.id));
    }

    #[test]
    fn create_task_with_dangling_user_writes_nothing() {
        let engine = engine();
        let result = engine.create_task(assigned_payload("t", DocumentId::new(), false));

        assert!(matches!(
            result,
            Err(EngineError::Validation(
                ValidationError::AssignedUserNotFound
            ))
        ));
        assert!(engine.tasks().is_empty());
    }

    #[test]
    fn update_task_transfers_ownership() {
        let engine = engine();
        let ada = engine.create_user(user_payload("Ada", "ada@example.com")).unwrap();
        let bob = engine.create_user(user_payload("Bob", "bob@example.com")).unwrap();
        let task = engine
            .create_task(assigned_payload("t", ada.id, false))
            .unwrap();

        let task = engine
            .update_task(task.id, assigned_payload("t", bob.id, false))
            .unwrap();

        assert_eq!(task.assigned_user, Some(bob.id));
        assert_eq!(task.assigned_user_name, "Bob");
        let ada = engine.users().get(ada.id).unwrap().unwrap();
        let bob = engine.users().get(bob.id).unwrap().unwrap();
        assert!(!ada.has_pending(task.id));
        assert!(bob.has_pending(task.id));
    }

    #[test]
    fn completing_a_task_keeps_owner_but_clears_pending() {
        let engine = engine();
        let ada = engine.create_user(user_payload("Ada", "ada@example.com")).unwrap();
        let task = engine
            .create_task(assigned_payload("t", ada.id, false))
            .unwrap();

        let task = engine
            .update_task(task.id, assigned_payload("t", ada.id, true))
            .unwrap();

        // Completed-but-assigned is a valid terminal state.
        assert!(task.completed);
        assert_eq!(task.assigned_user, Some(ada.id));
        assert_eq!(task.assigned_user_name, "Ada");
        let ada = engine.users().get(ada.id).unwrap().unwrap();
        assert!(!ada.has_pending(task.id));
    }

    #[test]
    fn completion_sweep_covers_stale_holders() {
        let engine = engine();
        let ada = engine.create_user(user_payload("Ada", "ada@example.com")).unwrap();
        let task = engine.create_task(task_payload("t")).unwrap();

        // Manufacture a stale reference the targeted pull would miss.
        engine
            .users()
            .update(ada.id, |u| u.add_pending(task.id))
            .unwrap();

        let mut payload = task_payload("t");
        payload.completed = true;
        engine.update_task(task.id, payload).unwrap();

        let ada = engine.users().get(ada.id).unwrap().unwrap();
        assert!(!ada.has_pending(task.id));
    }

    #[test]
    fn update_task_not_found() {
        let engine = engine();
        let result = engine.update_task(DocumentId::new(), task_payload("t"));
        assert!(matches!(
            result,
            Err(EngineError::NotFound {
                kind: EntityKind::Task,
                ..
            })
        ));
    }

    #[test]
    fn delete_task_cleans_owner_pending_set() {
        let engine = engine();
        let ada = engine.create_user(user_payload("Ada", "ada@example.com")).unwrap();
        let task = engine
            .create_task(assigned_payload("t", ada.id, false))
            .unwrap();

        engine.delete_task(task.id).unwrap();

        assert!(engine.tasks().get(task.id).unwrap().is_none());
        let ada = engine.users().get(ada.id).unwrap().unwrap();
        assert!(!ada.has_pending(task.id));
    }

    #[test]
    fn create_user_backfill_reopens_and_reassigns() {
        let engine = engine();
        let ada = engine.create_user(user_payload("Ada", "ada@example.com")).unwrap();
        let done = engine
            .create_task(assigned_payload("done", ada.id, true))
            .unwrap();
        let open = engine.create_task(task_payload("open")).unwrap();

        let mut payload = user_payload("Bob", "bob@example.com");
        payload.pending_tasks = vec![done.id, open.id];
        let bob = engine.create_user(payload).unwrap();

        for id in [done.id, open.id] {
            let task = engine.tasks().get(id).unwrap().unwrap();
            assert_eq!(task.assigned_user, Some(bob.id));
            assert_eq!(task.assigned_user_name, "Bob");
            assert!(!task.completed);
        }
    }

    #[test]
    fn create_user_tolerates_unknown_pending_ids() {
        let engine = engine();
        let mut payload = user_payload("Ada", "ada@example.com");
        payload.pending_tasks = vec![DocumentId::new()];

        let ada = engine.create_user(payload).unwrap();
        assert_eq!(ada.pending_tasks.len(), 1);
        assert!(engine.tasks().is_empty());
    }

    #[test]
    fn update_user_new_list_is_authoritative() {
        let engine = engine();
        let ada = engine.create_user(user_payload("Ada", "ada@example.com")).unwrap();
        let kept = engine
            .create_task(assigned_payload("kept", ada.id, false))
            .unwrap();
        let dropped = engine
            .create_task(assigned_payload("dropped", ada.id, false))
            .unwrap();

        let mut payload = user_payload("Ada Lovelace", "ada@example.com");
        payload.pending_tasks = vec![kept.id];
        let ada = engine.update_user(ada.id, payload).unwrap();

        assert_eq!(ada.name, "Ada Lovelace");
        assert_eq!(ada.pending_tasks, vec![kept.id]);

        // A task that stayed listed is re-assigned, with the new name.
        let kept = engine.tasks().get(kept.id).unwrap().unwrap();
        assert_eq!(kept.assigned_user, Some(ada.id));
        assert_eq!(kept.assigned_user_name, "Ada Lovelace");
        assert!(!kept.completed);

        // A task that fell off the list is cleared.
        let dropped = engine.tasks().get(dropped.id).unwrap().unwrap();
        assert_eq!(dropped.assigned_user, None);
        assert_eq!(dropped.assigned_user_name, UNASSIGNED);
    }

    #[test]
    fn delete_user_clears_tasks_but_keeps_them() {
        let engine = engine();
        let ada = engine.create_user(user_payload("Ada", "ada@example.com")).unwrap();
        let task = engine
            .create_task(assigned_payload("t", ada.id, false))
            .unwrap();

        engine.delete_user(ada.id).unwrap();

        assert!(engine.users().get(ada.id).unwrap().is_none());
        let task = engine.tasks().get(task.id).unwrap().unwrap();
        assert_eq!(task.assigned_user, None);
        assert_eq!(task.assigned_user_name, UNASSIGNED);
    }

    #[test]
    fn delete_user_not_found() {
        let engine = engine();
        let result = engine.delete_user(DocumentId::new());
        assert!(matches!(
            result,
            Err(EngineError::NotFound {
                kind: EntityKind::User,
                ..
            })
        ));
    }
}
