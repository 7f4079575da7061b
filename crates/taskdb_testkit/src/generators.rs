//! Proptest generators for random mutation sequences.
//!
//! Ops carry seeds rather than ids; [`apply_mutation`] resolves each
//! seed against the store's live id pools at apply time, so a generated
//! sequence exercises hits, misses, dangling references, and email
//! collisions without coordinating with the store.

use crate::payloads::deadline;
use proptest::prelude::*;
use taskdb_core::model::{TaskPayload, UserPayload};
use taskdb_core::{EngineError, SyncEngine};
use taskdb_store::DocumentId;

/// One randomly chosen mutation.
#[derive(Debug, Clone)]
pub enum MutationOp {
    /// Create a task, optionally assigned.
    CreateTask {
        /// Name seed.
        name: usize,
        /// Assignee pool seed; `None` creates the task unassigned.
        assignee: Option<usize>,
        /// Whether the task is created already completed.
        completed: bool,
    },
    /// Fully replace a task.
    UpdateTask {
        /// Target pool seed.
        target: usize,
        /// Name seed.
        name: usize,
        /// Assignee pool seed; `None` unassigns.
        assignee: Option<usize>,
        /// New completion flag.
        completed: bool,
    },
    /// Delete a task.
    DeleteTask {
        /// Target pool seed.
        target: usize,
    },
    /// Create a user, optionally listing pending tasks.
    CreateUser {
        /// Name/email seed; repeats provoke email collisions.
        ident: usize,
        /// Pending pool seeds.
        pending: Vec<usize>,
    },
    /// Fully replace a user.
    UpdateUser {
        /// Target pool seed.
        target: usize,
        /// Name/email seed.
        ident: usize,
        /// Pending pool seeds.
        pending: Vec<usize>,
    },
    /// Delete a user.
    DeleteUser {
        /// Target pool seed.
        target: usize,
    },
}

/// Resolves a seed against a pool; an empty pool yields a fresh id
/// that names nothing.
fn pick(pool: &[DocumentId], seed: usize) -> DocumentId {
    if pool.is_empty() {
        DocumentId::new()
    } else {
        pool[seed % pool.len()]
    }
}

/// Applies a mutation, resolving seeds against the store's current ids.
///
/// Returns the engine's own result; validation and not-found failures
/// are expected outcomes for randomly chosen targets.
///
/// # Errors
///
/// Propagates whatever the engine returns for the resolved mutation.
pub fn apply_mutation(engine: &SyncEngine, op: &MutationOp) -> Result<(), EngineError> {
    let task_ids: Vec<DocumentId> = engine
        .tasks()
        .scan_all()?
        .into_iter()
        .map(|t| t.id)
        .collect();
    let user_ids: Vec<DocumentId> = engine
        .users()
        .scan_all()?
        .into_iter()
        .map(|u| u.id)
        .collect();

    match op {
        MutationOp::CreateTask {
            name,
            assignee,
            completed,
        } => {
            let payload = TaskPayload {
                name: Some(format!("task-{name}")),
                deadline: Some(deadline()),
                completed: *completed,
                assigned_user: assignee.map(|seed| pick(&user_ids, seed)),
                ..TaskPayload::default()
            };
            engine.create_task(payload).map(|_| ())
        }
        MutationOp::UpdateTask {
            target,
            name,
            assignee,
            completed,
        } => {
            let payload = TaskPayload {
                name: Some(format!("task-{name}")),
                deadline: Some(deadline()),
                completed: *completed,
                assigned_user: assignee.map(|seed| pick(&user_ids, seed)),
                ..TaskPayload::default()
            };
            engine.update_task(pick(&task_ids, *target), payload).map(|_| ())
        }
        MutationOp::DeleteTask { target } => engine.delete_task(pick(&task_ids, *target)),
        MutationOp::CreateUser { ident, pending } => {
            let payload = UserPayload {
                name: Some(format!("user-{ident}")),
                email: Some(format!("user-{ident}@example.com")),
                pending_tasks: pending.iter().map(|seed| pick(&task_ids, *seed)).collect(),
            };
            engine.create_user(payload).map(|_| ())
        }
        MutationOp::UpdateUser {
            target,
            ident,
            pending,
        } => {
            let payload = UserPayload {
                name: Some(format!("user-{ident}")),
                email: Some(format!("user-{ident}@example.com")),
                pending_tasks: pending.iter().map(|seed| pick(&task_ids, *seed)).collect(),
            };
            engine.update_user(pick(&user_ids, *target), payload).map(|_| ())
        }
        MutationOp::DeleteUser { target } => engine.delete_user(pick(&user_ids, *target)),
    }
}

/// Strategy producing a single mutation op.
pub fn mutation_op() -> impl Strategy<Value = MutationOp> {
    let pending = proptest::collection::vec(0usize..16, 0..4);
    prop_oneof![
        (0usize..50, proptest::option::of(0usize..16), any::<bool>()).prop_map(
            |(name, assignee, completed)| MutationOp::CreateTask {
                name,
                assignee,
                completed,
            }
        ),
        (0usize..16, 0usize..50, proptest::option::of(0usize..16), any::<bool>()).prop_map(
            |(target, name, assignee, completed)| MutationOp::UpdateTask {
                target,
                name,
                assignee,
                completed,
            }
        ),
        (0usize..16).prop_map(|target| MutationOp::DeleteTask { target }),
        (0usize..50, pending.clone())
            .prop_map(|(ident, pending)| MutationOp::CreateUser { ident, pending }),
        (0usize..16, 0usize..50, pending).prop_map(|(target, ident, pending)| {
            MutationOp::UpdateUser {
                target,
                ident,
                pending,
            }
        }),
        (0usize..16).prop_map(|target| MutationOp::DeleteUser { target }),
    ]
}

/// Strategy producing a sequence of up to `max` mutations.
pub fn mutation_sequence(max: usize) -> impl Strategy<Value = Vec<MutationOp>> {
    proptest::collection::vec(mutation_op(), 0..max)
}
