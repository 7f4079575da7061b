//! Typed collection handle.

use crate::codec;
use crate::document::{Document, DocumentId};
use crate::error::StoreResult;
use crate::store::{CollectionData, StoreInner};
use std::marker::PhantomData;
use std::sync::Arc;

/// A typed collection of documents.
///
/// `Collection<T>` provides type-safe access to documents of type `T`.
/// Encoding and decoding happen at this boundary; the store itself holds
/// opaque CBOR payloads.
///
/// # Atomicity
///
/// Every method acquires the collection lock exactly once and releases
/// it before returning. Single calls are atomic; sequences of calls are
/// not, and interleave freely with concurrent callers.
///
/// # Language-Native Querying
///
/// Filtering uses host-language predicates rather than a query DSL:
///
/// ```rust,ignore
/// let overdue = tasks.count(|t| t.deadline < now)?;
/// tasks.update_many(|t| t.assigned_user == Some(uid), |t| t.clear_assignment())?;
/// ```
pub struct Collection<T: Document> {
    /// Shared document map for this collection.
    data: CollectionData,
    /// Store state, for write-through flushing.
    store: Arc<StoreInner>,
    /// Type marker.
    _marker: PhantomData<fn() -> T>,
}

impl<T: Document> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            store: Arc::clone(&self.store),
            _marker: PhantomData,
        }
    }
}

impl<T: Document> Collection<T> {
    /// Creates a collection handle over shared store state.
    pub(crate) fn new(data: CollectionData, store: Arc<StoreInner>) -> Self {
        Self {
            data,
            store,
            _marker: PhantomData,
        }
    }

    /// Returns the collection name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        T::COLLECTION
    }

    /// Inserts a document, assigning it a fresh ID.
    ///
    /// Returns the stored document with its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or snapshot writing fails.
    pub fn insert(&self, mut doc: T) -> StoreResult<T> {
        {
            let mut docs = self.data.write();
            let mut id = DocumentId::new();
            while docs.contains_key(&id) {
                id = DocumentId::new();
            }
            doc.set_id(id);
            let bytes = codec::encode(&doc)?;
            docs.insert(id, bytes);
        }
        self.store.flush_after_write()?;
        Ok(doc)
    }

    /// Gets a document by ID.
    ///
    /// Returns `None` if the document doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding fails.
    pub fn get(&self, id: DocumentId) -> StoreResult<Option<T>> {
        let docs = self.data.read();
        match docs.get(&id) {
            Some(bytes) => Ok(Some(codec::decode(bytes)?)),
            None => Ok(None),
        }
    }

    /// Saves a document, fully overwriting any existing version.
    ///
    /// The document is stored under its current ID whether or not that
    /// ID already exists.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or snapshot writing fails.
    pub fn save(&self, doc: &T) -> StoreResult<()> {
        let bytes = codec::encode(doc)?;
        {
            self.data.write().insert(doc.id(), bytes);
        }
        self.store.flush_after_write()
    }

    /// Deletes a document by ID.
    ///
    /// Returns whether a document was removed. Deleting an absent ID is
    /// a no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if snapshot writing fails.
    pub fn delete(&self, id: DocumentId) -> StoreResult<bool> {
        let removed = self.data.write().remove(&id).is_some();
        if removed {
            self.store.flush_after_write()?;
        }
        Ok(removed)
    }

    /// Atomically reads, modifies, and writes back one document.
    ///
    /// Returns the updated document, or `None` if the ID doesn't exist
    /// (a no-op, not an error). The document's ID cannot be changed by
    /// `f`; it is restored before the write.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding, decoding, or snapshot writing fails.
    pub fn update(&self, id: DocumentId, f: impl FnOnce(&mut T)) -> StoreResult<Option<T>> {
        let updated = {
            let mut docs = self.data.write();
            match docs.get(&id) {
                Some(bytes) => {
                    let mut doc: T = codec::decode(bytes)?;
                    f(&mut doc);
                    doc.set_id(id);
                    docs.insert(id, codec::encode(&doc)?);
                    Some(doc)
                }
                None => None,
            }
        };
        if updated.is_some() {
            self.store.flush_after_write()?;
        }
        Ok(updated)
    }

    /// Atomically applies `apply` to every document matching `pred`.
    ///
    /// Returns the number of matching documents. Zero matches is
    /// success. Document IDs cannot be changed by `apply`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding, decoding, or snapshot writing fails.
    pub fn update_many(
        &self,
        pred: impl Fn(&T) -> bool,
        apply: impl Fn(&mut T),
    ) -> StoreResult<usize> {
        let matched = {
            let mut docs = self.data.write();
            let mut touched = Vec::new();
            for (id, bytes) in docs.iter() {
                let mut doc: T = codec::decode(bytes)?;
                if pred(&doc) {
                    apply(&mut doc);
                    doc.set_id(*id);
                    touched.push((*id, codec::encode(&doc)?));
                }
            }
            let count = touched.len();
            for (id, bytes) in touched {
                docs.insert(id, bytes);
            }
            count
        };
        if matched > 0 {
            self.store.flush_after_write()?;
        }
        Ok(matched)
    }

    /// Returns all documents in the collection.
    ///
    /// **Warning**: This is a full scan.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding fails.
    pub fn scan_all(&self) -> StoreResult<Vec<T>> {
        let docs = self.data.read();
        let mut result = Vec::with_capacity(docs.len());
        for bytes in docs.values() {
            result.push(codec::decode(bytes)?);
        }
        Ok(result)
    }

    /// Returns the number of documents matching `pred`.
    ///
    /// **Warning**: This is a full scan.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding fails.
    pub fn count(&self, pred: impl Fn(&T) -> bool) -> StoreResult<usize> {
        let docs = self.data.read();
        let mut count = 0;
        for bytes in docs.values() {
            let doc: T = codec::decode(bytes)?;
            if pred(&doc) {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Checks if a document exists.
    ///
    /// # Errors
    ///
    /// Currently infallible; returns a result for interface uniformity.
    pub fn exists(&self, id: DocumentId) -> StoreResult<bool> {
        Ok(self.data.read().contains_key(&id))
    }

    /// Returns the total number of documents in the collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Returns true if the collection holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}
