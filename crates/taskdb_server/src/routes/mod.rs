//! Route handlers.

pub mod home;
pub mod tasks;
pub mod users;

use crate::error::ApiError;
use serde::Serialize;
use serde_json::Value;
use taskdb_core::EngineError;
use taskdb_store::{DocumentId, StoreError};

/// Parses a path id; an unparsable id reads as a missing document.
fn parse_id(raw: &str, not_found: &str) -> Result<DocumentId, ApiError> {
    DocumentId::parse_str(raw).map_err(|_| ApiError::not_found(not_found))
}

/// Maps a raw store failure on a read path to the generic 500.
fn store_err(err: StoreError) -> ApiError {
    ApiError::from(EngineError::from(err))
}

/// Renders one entity to its JSON document.
fn to_doc<T: Serialize>(entity: &T) -> Result<Value, ApiError> {
    serde_json::to_value(entity).map_err(|_| ApiError::internal())
}

/// Renders a slice of entities to JSON documents.
fn to_docs<T: Serialize>(entities: &[T]) -> Result<Vec<Value>, ApiError> {
    entities.iter().map(to_doc).collect()
}
