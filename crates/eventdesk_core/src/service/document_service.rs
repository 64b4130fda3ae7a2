//! Document use-case service.
//!
//! # Responsibility
//! - Create documents with generated identity and timestamps.
//! - Normalize and replace document tags.
//! - Serve the dashboard tab filters (status, category, tag, viewer).
//!
//! # Invariants
//! - Tag names are trimmed, lowercased, deduplicated, and sorted.
//! - Lists are sorted by `updated_at DESC, id ASC`.

use crate::model::document::{
    AccessLevel, Document, DocumentId, DocumentPatch, DocumentValidationError, PublishStatus,
};
use crate::repo::document_repo::DocumentRepository;
use log::info;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for document use-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentServiceError {
    DocumentNotFound(DocumentId),
    InvalidTag(String),
    BlankCategory,
    BlankAuthor,
    Validation(DocumentValidationError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for DocumentServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DocumentNotFound(id) => write!(f, "document not found: {id}"),
            Self::InvalidTag(value) => write!(f, "invalid tag: `{value}`"),
            Self::BlankCategory => write!(f, "category must not be blank"),
            Self::BlankAuthor => write!(f, "author must not be blank"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent document state: {details}")
            }
        }
    }
}

impl Error for DocumentServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DocumentValidationError> for DocumentServiceError {
    fn from(value: DocumentValidationError) -> Self {
        Self::Validation(value)
    }
}

pub type DocumentResult<T> = Result<T, DocumentServiceError>;

/// Request model for creating a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub title: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub created_by: String,
    pub access_level: AccessLevel,
    pub allowed_users: Vec<String>,
    pub allowed_roles: Vec<String>,
}

impl NewDocument {
    /// Public document request without tags or description.
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            category: category.into(),
            tags: Vec::new(),
            created_by: created_by.into(),
            access_level: AccessLevel::Public,
            allowed_users: Vec::new(),
            allowed_roles: Vec::new(),
        }
    }
}

/// Viewer identity used for access filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub user: String,
    pub roles: Vec<String>,
}

/// Tab filter options. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentFilter {
    pub status: Option<PublishStatus>,
    /// Case-insensitive exact category match.
    pub category: Option<String>,
    /// Single-tag match after normalization.
    pub tag: Option<String>,
    pub viewer: Option<Viewer>,
}

/// Document facade over repository implementations.
pub struct DocumentService<R: DocumentRepository> {
    repo: R,
}

impl<R: DocumentRepository> DocumentService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn into_inner(self) -> R {
        self.repo
    }

    /// Creates a draft document with no versions.
    pub fn create_document(&mut self, request: NewDocument) -> DocumentResult<Document> {
        let category = request.category.trim();
        if category.is_empty() {
            return Err(DocumentServiceError::BlankCategory);
        }
        let author = request.created_by.trim();
        if author.is_empty() {
            return Err(DocumentServiceError::BlankAuthor);
        }
        let tags = checked_tags(&request.tags)?;

        let mut document = Document::new(
            request.title.trim(),
            category,
            author,
            self.repo.now_ms(),
        );
        document.description = request.description;
        document.tags = tags;
        document.access_level = request.access_level;
        document.allowed_users = request.allowed_users;
        document.allowed_roles = request.allowed_roles;
        document.validate()?;

        let id = document.id;
        self.repo.add_document(document);
        info!("event=document_create module=document_service status=ok document_id={id}");
        self.read_back(id, "created document missing")
    }

    /// Atomically replaces the full tag set for one document.
    pub fn set_tags(&mut self, id: DocumentId, tags: &[String]) -> DocumentResult<Document> {
        let tags = checked_tags(tags)?;
        self.update(id, &DocumentPatch::new().tags(tags))
    }

    /// Merges `patch` into a document.
    ///
    /// # Errors
    /// - `DocumentNotFound` when `id` is unknown.
    /// - `Validation` when the merged document would be malformed; the
    ///   stored document is left unchanged.
    pub fn update(&mut self, id: DocumentId, patch: &DocumentPatch) -> DocumentResult<Document> {
        let mut preview = self
            .repo
            .get_document(id)
            .cloned()
            .ok_or(DocumentServiceError::DocumentNotFound(id))?;
        patch.apply_to(&mut preview);
        preview.validate()?;

        if !self.repo.update_document(id, patch) {
            return Err(DocumentServiceError::DocumentNotFound(id));
        }
        self.read_back(id, "updated document missing")
    }

    pub fn publish(&mut self, id: DocumentId) -> DocumentResult<Document> {
        self.set_status(id, PublishStatus::Published)
    }

    pub fn archive(&mut self, id: DocumentId) -> DocumentResult<Document> {
        self.set_status(id, PublishStatus::Archived)
    }

    pub fn delete(&mut self, id: DocumentId) -> DocumentResult<()> {
        if !self.repo.delete_document(id) {
            return Err(DocumentServiceError::DocumentNotFound(id));
        }
        info!("event=document_delete module=document_service status=ok document_id={id}");
        Ok(())
    }

    /// Lists documents matching `filter`, newest update first.
    pub fn list(&self, filter: &DocumentFilter) -> Vec<&Document> {
        let tag = filter.tag.as_deref().and_then(normalize_tag);
        let mut items: Vec<&Document> = self
            .repo
            .documents()
            .iter()
            .filter(|document| filter.status.map_or(true, |status| document.status == status))
            .filter(|document| {
                filter.category.as_deref().map_or(true, |category| {
                    document.category.eq_ignore_ascii_case(category.trim())
                })
            })
            .filter(|document| {
                tag.as_deref()
                    .map_or(true, |tag| document.tags.iter().any(|t| t == tag))
            })
            .filter(|document| {
                filter.viewer.as_ref().map_or(true, |viewer| {
                    document.is_visible_to(&viewer.user, &viewer.roles)
                })
            })
            .collect();
        items.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
        items
    }

    /// Distinct categories sorted by name.
    pub fn categories(&self) -> Vec<String> {
        self.repo
            .documents()
            .iter()
            .map(|document| document.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn set_status(&mut self, id: DocumentId, status: PublishStatus) -> DocumentResult<Document> {
        let document = self.update(id, &DocumentPatch::new().status(status))?;
        info!(
            "event=document_status module=document_service status=ok document_id={id} value={status}"
        );
        Ok(document)
    }

    fn read_back(&self, id: DocumentId, details: &'static str) -> DocumentResult<Document> {
        self.repo
            .get_document(id)
            .cloned()
            .ok_or(DocumentServiceError::InconsistentState(details))
    }
}

fn checked_tags(tags: &[String]) -> DocumentResult<Vec<String>> {
    for tag in tags {
        if tag.trim().is_empty() {
            return Err(DocumentServiceError::InvalidTag(tag.clone()));
        }
    }
    Ok(normalize_tags(tags))
}

/// Normalizes one tag value.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Normalizes, deduplicates, and sorts tag values.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    tags.iter()
        .filter_map(|tag| normalize_tag(tag))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::normalize_tags;

    #[test]
    fn normalize_tags_lowercases_and_dedups() {
        let tags = vec![
            "Load-In".to_string(),
            " load-in ".to_string(),
            "AUDIO".to_string(),
            "".to_string(),
        ];
        assert_eq!(
            normalize_tags(&tags),
            vec!["audio".to_string(), "load-in".to_string()]
        );
    }
}
