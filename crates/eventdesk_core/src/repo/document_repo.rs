//! Document repository contract and in-memory store.
//!
//! # Responsibility
//! - Hold the document collection for one dashboard session.
//! - Apply document/version mutations with merge semantics.
//! - Snapshot the collection to and from JSON for seeding.
//!
//! # Invariants
//! - Mutations on unknown ids are silent no-ops: they return `false` and
//!   leave the whole collection untouched.
//! - `add_version` always moves `current_version` to the new label.
//! - `revert_to_version` changes the pointer only, never the version list.
//! - `delete_version` never touches `current_version`.

use crate::clock::{Clock, SystemClock};
use crate::model::document::{Document, DocumentId, DocumentPatch, DocumentValidationError};
use crate::model::version::{DocumentVersion, VersionId, VersionPatch};
use log::debug;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Repository interface for document and version mutations.
///
/// Boolean results report whether a matching target was found.
pub trait DocumentRepository {
    /// Current time used for `updated_at`/`created_at` stamps.
    fn now_ms(&self) -> i64;
    fn documents(&self) -> &[Document];
    fn get_document(&self, id: DocumentId) -> Option<&Document>;
    fn set_documents(&mut self, documents: Vec<Document>);
    fn add_document(&mut self, document: Document);
    fn update_document(&mut self, id: DocumentId, patch: &DocumentPatch) -> bool;
    fn delete_document(&mut self, id: DocumentId) -> bool;
    fn add_version(&mut self, document_id: DocumentId, version: DocumentVersion) -> bool;
    fn update_version(
        &mut self,
        document_id: DocumentId,
        version_id: VersionId,
        patch: &VersionPatch,
    ) -> bool;
    fn delete_version(&mut self, document_id: DocumentId, version_id: VersionId) -> bool;
    fn revert_to_version(&mut self, document_id: DocumentId, version_id: VersionId) -> bool;
}

/// Lets services borrow a store instead of owning it.
impl<R: DocumentRepository + ?Sized> DocumentRepository for &mut R {
    fn now_ms(&self) -> i64 {
        (**self).now_ms()
    }

    fn documents(&self) -> &[Document] {
        (**self).documents()
    }

    fn get_document(&self, id: DocumentId) -> Option<&Document> {
        (**self).get_document(id)
    }

    fn set_documents(&mut self, documents: Vec<Document>) {
        (**self).set_documents(documents)
    }

    fn add_document(&mut self, document: Document) {
        (**self).add_document(document)
    }

    fn update_document(&mut self, id: DocumentId, patch: &DocumentPatch) -> bool {
        (**self).update_document(id, patch)
    }

    fn delete_document(&mut self, id: DocumentId) -> bool {
        (**self).delete_document(id)
    }

    fn add_version(&mut self, document_id: DocumentId, version: DocumentVersion) -> bool {
        (**self).add_version(document_id, version)
    }

    fn update_version(
        &mut self,
        document_id: DocumentId,
        version_id: VersionId,
        patch: &VersionPatch,
    ) -> bool {
        (**self).update_version(document_id, version_id, patch)
    }

    fn delete_version(&mut self, document_id: DocumentId, version_id: VersionId) -> bool {
        (**self).delete_version(document_id, version_id)
    }

    fn revert_to_version(&mut self, document_id: DocumentId, version_id: VersionId) -> bool {
        (**self).revert_to_version(document_id, version_id)
    }
}

/// Errors raised while importing or exporting a JSON snapshot.
#[derive(Debug)]
pub enum SnapshotError {
    Json(serde_json::Error),
    InvalidDocument {
        document_id: DocumentId,
        source: DocumentValidationError,
    },
    DuplicateDocumentId(DocumentId),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid document snapshot: {err}"),
            Self::InvalidDocument {
                document_id,
                source,
            } => write!(f, "invalid document {document_id} in snapshot: {source}"),
            Self::DuplicateDocumentId(id) => write!(f, "duplicate document id in snapshot: {id}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::InvalidDocument { source, .. } => Some(source),
            Self::DuplicateDocumentId(_) => None,
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// In-memory document store owned by one session.
pub struct DocumentStore {
    documents: Vec<Document>,
    selected: Option<DocumentId>,
    clock: Box<dyn Clock>,
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore {
    /// Creates an empty store stamped by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemClock))
    }

    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        Self {
            documents: Vec::new(),
            selected: None,
            clock,
        }
    }

    /// Creates a store pre-populated with `documents`.
    pub fn with_documents(documents: Vec<Document>, clock: Box<dyn Clock>) -> Self {
        let mut store = Self::with_clock(clock);
        store.set_documents(documents);
        store
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Tracks the currently viewed document. `None` clears the selection.
    pub fn select_document(&mut self, id: Option<DocumentId>) {
        self.selected = id;
    }

    pub fn selected_id(&self) -> Option<DocumentId> {
        self.selected
    }

    /// Resolves the selection against the live collection.
    ///
    /// Returns `None` when nothing is selected or the document was removed.
    pub fn selected_document(&self) -> Option<&Document> {
        self.selected.and_then(|id| self.get_document(id))
    }

    /// Serializes the full collection as pretty JSON.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(&self.documents)?)
    }

    /// Parses and validates a JSON snapshot produced by `to_json`.
    ///
    /// # Errors
    /// - `Json` when the payload is not a document array.
    /// - `InvalidDocument` when one document fails shape validation.
    /// - `DuplicateDocumentId` when two documents share an id.
    pub fn parse_snapshot(json: &str) -> Result<Vec<Document>, SnapshotError> {
        let documents: Vec<Document> = serde_json::from_str(json)?;
        let mut seen = HashSet::with_capacity(documents.len());
        for document in &documents {
            document
                .validate()
                .map_err(|source| SnapshotError::InvalidDocument {
                    document_id: document.id,
                    source,
                })?;
            if !seen.insert(document.id) {
                return Err(SnapshotError::DuplicateDocumentId(document.id));
            }
        }
        Ok(documents)
    }

    /// Replaces the collection with a validated JSON snapshot.
    ///
    /// The store is left unchanged when parsing fails.
    pub fn load_json(&mut self, json: &str) -> Result<usize, SnapshotError> {
        let documents = Self::parse_snapshot(json)?;
        let count = documents.len();
        self.set_documents(documents);
        Ok(count)
    }

    fn document_mut(&mut self, id: DocumentId) -> Option<&mut Document> {
        self.documents.iter_mut().find(|document| document.id == id)
    }
}

impl DocumentRepository for DocumentStore {
    fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    fn documents(&self) -> &[Document] {
        &self.documents
    }

    fn get_document(&self, id: DocumentId) -> Option<&Document> {
        self.documents.iter().find(|document| document.id == id)
    }

    fn set_documents(&mut self, documents: Vec<Document>) {
        debug!(
            "event=documents_set module=store status=ok count={}",
            documents.len()
        );
        self.documents = documents;
    }

    fn add_document(&mut self, document: Document) {
        debug!(
            "event=document_add module=store status=ok document_id={}",
            document.id
        );
        self.documents.push(document);
    }

    fn update_document(&mut self, id: DocumentId, patch: &DocumentPatch) -> bool {
        let Some(document) = self.document_mut(id) else {
            debug!("event=document_update module=store status=noop document_id={id}");
            return false;
        };
        patch.apply_to(document);
        debug!("event=document_update module=store status=ok document_id={id}");
        true
    }

    fn delete_document(&mut self, id: DocumentId) -> bool {
        let before = self.documents.len();
        self.documents.retain(|document| document.id != id);
        let removed = self.documents.len() != before;
        debug!(
            "event=document_delete module=store status={} document_id={id}",
            if removed { "ok" } else { "noop" }
        );
        removed
    }

    fn add_version(&mut self, document_id: DocumentId, version: DocumentVersion) -> bool {
        let now = self.clock.now_ms();
        let Some(document) = self.document_mut(document_id) else {
            debug!("event=version_add module=store status=noop document_id={document_id}");
            return false;
        };
        debug!(
            "event=version_add module=store status=ok document_id={} version_id={} label={}",
            document_id, version.id, version.version
        );
        document.current_version = version.version.clone();
        document.versions.push(version);
        document.updated_at = now;
        true
    }

    fn update_version(
        &mut self,
        document_id: DocumentId,
        version_id: VersionId,
        patch: &VersionPatch,
    ) -> bool {
        let target = self
            .document_mut(document_id)
            .and_then(|document| document.version_mut(version_id));
        let Some(version) = target else {
            debug!(
                "event=version_update module=store status=noop document_id={document_id} version_id={version_id}"
            );
            return false;
        };
        patch.apply_to(version);
        debug!(
            "event=version_update module=store status=ok document_id={document_id} version_id={version_id}"
        );
        true
    }

    fn delete_version(&mut self, document_id: DocumentId, version_id: VersionId) -> bool {
        let removed = match self.document_mut(document_id) {
            Some(document) => {
                let before = document.versions.len();
                document.versions.retain(|version| version.id != version_id);
                document.versions.len() != before
            }
            None => false,
        };
        debug!(
            "event=version_delete module=store status={} document_id={document_id} version_id={version_id}",
            if removed { "ok" } else { "noop" }
        );
        removed
    }

    fn revert_to_version(&mut self, document_id: DocumentId, version_id: VersionId) -> bool {
        let now = self.clock.now_ms();
        let Some(document) = self.document_mut(document_id) else {
            debug!("event=version_revert module=store status=noop document_id={document_id}");
            return false;
        };
        let Some(label) = document
            .version(version_id)
            .map(|version| version.version.clone())
        else {
            debug!(
                "event=version_revert module=store status=noop document_id={document_id} version_id={version_id}"
            );
            return false;
        };
        debug!(
            "event=version_revert module=store status=ok document_id={document_id} version_id={version_id} label={label}"
        );
        document.current_version = label;
        document.updated_at = now;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{DocumentRepository, DocumentStore, SnapshotError};
    use crate::clock::FixedClock;
    use crate::model::document::Document;
    use crate::model::version::DocumentVersion;

    #[test]
    fn selection_resolves_against_live_collection() {
        let mut store = DocumentStore::with_clock(Box::new(FixedClock(5)));
        let doc = Document::new("Run sheet", "operations", "ana", 1);
        let id = doc.id;
        store.add_document(doc);

        store.select_document(Some(id));
        assert_eq!(store.selected_document().map(|d| d.id), Some(id));

        store.delete_document(id);
        assert_eq!(store.selected_id(), Some(id));
        assert!(store.selected_document().is_none());

        store.select_document(None);
        assert_eq!(store.selected_id(), None);
    }

    #[test]
    fn load_json_rejects_duplicate_ids_and_keeps_state() {
        let mut store = DocumentStore::with_clock(Box::new(FixedClock(5)));
        let doc = Document::new("Run sheet", "operations", "ana", 1);
        let json = serde_json::to_string(&vec![doc.clone(), doc]).unwrap();

        let err = store.load_json(&json).unwrap_err();
        assert!(matches!(err, SnapshotError::DuplicateDocumentId(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn snapshot_roundtrip_preserves_versions() {
        let mut store = DocumentStore::with_clock(Box::new(FixedClock(5)));
        let doc = Document::new("Run sheet", "operations", "ana", 1);
        let id = doc.id;
        store.add_document(doc);
        store.add_version(id, DocumentVersion::new(id, "1.0", "first cut", "ana", 2));

        let json = store.to_json().unwrap();
        let mut restored = DocumentStore::with_clock(Box::new(FixedClock(9)));
        assert_eq!(restored.load_json(&json).unwrap(), 1);
        assert_eq!(restored.documents(), store.documents());
    }
}
