//! # TaskDB Store
//!
//! Document-store layer for TaskDB.
//!
//! This crate provides keyed storage for typed documents grouped into
//! named collections. Each store call is atomic with respect to its
//! collection; there is **no** multi-call transaction primitive. Callers
//! that need cross-document consistency must express it as an ordered
//! sequence of idempotent single calls.
//!
//! ## Design Principles
//!
//! - Documents are encoded as CBOR inside the store; typed access
//!   decodes at the collection boundary
//! - Filtering is done with host-language predicates, not a query DSL
//! - One lock acquisition per call, nothing held across calls
//! - Optional snapshot persistence with an exclusive advisory file lock
//!
//! ## Example
//!
//! ```rust,ignore
//! use taskdb_store::{Document, DocumentId, Store};
//!
//! let store = Store::in_memory();
//! let notes = store.collection::<Note>();
//!
//! let note = notes.insert(Note::new("remember the milk"))?;
//! let found = notes.get(note.id())?;
//! notes.update_many(|n| n.archived, |n| n.archived = false)?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod codec;
mod collection;
mod document;
mod error;
mod snapshot;
mod store;

pub use collection::Collection;
pub use document::{Document, DocumentId};
pub use error::{StoreError, StoreResult};
pub use store::{Store, StoreConfig};
