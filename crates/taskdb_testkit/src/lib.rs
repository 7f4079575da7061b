//! # TaskDB Testkit
//!
//! Test utilities for TaskDB.
//!
//! This crate provides:
//! - Engine fixtures with automatic cleanup
//! - Payload builders for concise test setup
//! - An exhaustive referential-invariant checker
//! - Proptest generators for random mutation sequences
//!
//! ## Usage
//!
//! ```rust,ignore
//! use taskdb_testkit::prelude::*;
//!
//! #[test]
//! fn assignment_stays_consistent() {
//!     let engine = TestEngine::memory();
//!     let ada = engine.create_user(user_named("Ada", "ada@example.com")).unwrap();
//!     engine.create_task(task_assigned("t", ada.id)).unwrap();
//!     check_invariants(&engine);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod invariants;
pub mod payloads;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::invariants::*;
    pub use crate::payloads::*;
}

pub use fixtures::TestEngine;
pub use invariants::check_invariants;
