//! # TaskDB Core
//!
//! Data model, entity validation, and the consistency-synchronization
//! engine for TaskDB.
//!
//! TaskDB keeps two independently stored collections mutually
//! consistent: every Task carries an optional reference to its assigned
//! User (plus a cached copy of that User's name), and every User carries
//! the set of its pending Task ids. No multi-document transaction exists;
//! the [`SyncEngine`] issues each mutation as a short ordered sequence of
//! idempotent single-document and sweep writes so that partial execution
//! is self-healing on retry.
//!
//! This crate provides:
//! - The [`model`] module with `Task`, `User`, and incoming payloads
//! - The [`Validator`] for check-and-normalize of payloads
//! - The [`SyncEngine`] with the six mutation flows
//! - The [`EngineError`] taxonomy (validation / not-found / store)

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod engine;
mod error;
pub mod model;
mod validator;

pub use engine::SyncEngine;
pub use error::{EngineError, EngineResult, EntityKind, ValidationError};
pub use validator::{TaskDraft, UserDraft, Validator};
