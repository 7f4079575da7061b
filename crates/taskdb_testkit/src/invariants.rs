//! Referential-invariant checks over a whole store.

use taskdb_core::model::UNASSIGNED;
use taskdb_core::SyncEngine;

/// Asserts the four referential invariants over every document.
///
/// 1. Every open task with an owner appears in that owner's
///    `pendingTasks`.
/// 2. A completed or unassigned task appears in nobody's
///    `pendingTasks`.
/// 3. `assignedUserName` mirrors the referenced user's current name,
///    or is `"unassigned"` when there is no reference.
/// 4. Every non-empty `assignedUser` resolves to an existing user.
///
/// Also asserts that no pending set carries duplicate ids. Note that a
/// *stale* pending entry for an open task owned by someone else is not
/// an invariant violation; only the owner-side membership and the
/// completed/unassigned exclusions are guaranteed.
///
/// # Panics
///
/// Panics with a description of the first violated invariant.
pub fn check_invariants(engine: &SyncEngine) {
    let tasks = engine.tasks().scan_all().expect("task scan failed");
    let users = engine.users().scan_all().expect("user scan failed");

    for task in &tasks {
        match task.assigned_user {
            Some(owner_id) => {
                let owner = users
                    .iter()
                    .find(|u| u.id == owner_id)
                    .unwrap_or_else(|| {
                        panic!("task {} references missing user {owner_id}", task.id)
                    });
                assert_eq!(
                    task.assigned_user_name, owner.name,
                    "task {} caches stale owner name",
                    task.id
                );
                if !task.completed {
                    assert!(
                        owner.has_pending(task.id),
                        "open task {} missing from owner {}'s pending set",
                        task.id,
                        owner_id
                    );
                }
            }
            None => {
                assert_eq!(
                    task.assigned_user_name, UNASSIGNED,
                    "unassigned task {} carries an owner name",
                    task.id
                );
            }
        }

        if task.completed || task.assigned_user.is_none() {
            for user in &users {
                assert!(
                    !user.has_pending(task.id),
                    "task {} is {} but pending for user {}",
                    task.id,
                    if task.completed { "completed" } else { "unassigned" },
                    user.id
                );
            }
        }
    }

    for user in &users {
        let mut seen = Vec::new();
        for id in &user.pending_tasks {
            assert!(
                !seen.contains(&id),
                "user {} holds duplicate pending id {id}",
                user.id
            );
            seen.push(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::TestEngine;
    use crate::payloads::{task_assigned, user_named};

    #[test]
    fn clean_store_passes() {
        let engine = TestEngine::memory();
        check_invariants(&engine);

        let ada = engine
            .create_user(user_named("Ada", "ada@example.com"))
            .unwrap();
        engine.create_task(task_assigned("t", ada.id)).unwrap();
        check_invariants(&engine);
    }

    #[test]
    #[should_panic(expected = "missing from owner")]
    fn detects_missing_pending_entry() {
        let engine = TestEngine::memory();
        let ada = engine
            .create_user(user_named("Ada", "ada@example.com"))
            .unwrap();
        let task = engine.create_task(task_assigned("t", ada.id)).unwrap();

        // Corrupt the store behind the engine's back.
        engine
            .users()
            .update(ada.id, |u| u.remove_pending(task.id))
            .unwrap();

        check_invariants(&engine);
    }

    #[test]
    #[should_panic(expected = "stale owner name")]
    fn detects_stale_name_cache() {
        let engine = TestEngine::memory();
        let ada = engine
            .create_user(user_named("Ada", "ada@example.com"))
            .unwrap();
        engine.create_task(task_assigned("t", ada.id)).unwrap();

        engine
            .users()
            .update(ada.id, |u| u.name = "Renamed".into())
            .unwrap();

        check_invariants(&engine);
    }
}
