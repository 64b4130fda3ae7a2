//! Version-control use-case service.
//!
//! # Responsibility
//! - Build new versions (ids, timestamps) and push them through the store.
//! - Run review, approval, and comment-thread workflows on versions.
//! - Report pointer integrity problems the store does not prevent.
//!
//! # Invariants
//! - Labels are unique per document when created through this service.
//! - The current version is never deleted through this service while it is
//!   the only holder of its label.
//! - Revert moves the pointer only; it never appends history.

use crate::model::document::{Document, DocumentId, PublishStatus};
use crate::model::version::{DocumentVersion, VersionComment, VersionId, VersionPatch};
use crate::repo::document_repo::DocumentRepository;
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static MAJOR_MINOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\.(\d+)$").expect("valid major.minor regex"));
static LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9A-Za-z][0-9A-Za-z._-]*$").expect("valid label regex"));

const FIRST_LABEL: &str = "1.0";

/// Service error for version use-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionServiceError {
    DocumentNotFound(DocumentId),
    VersionNotFound {
        document_id: DocumentId,
        version_id: VersionId,
    },
    /// Label is blank or contains characters outside `[0-9A-Za-z._-]`.
    InvalidLabel(String),
    DuplicateLabel {
        document_id: DocumentId,
        label: String,
    },
    BlankChanges,
    BlankAuthor,
    BlankComment,
    /// Archived versions cannot be approved.
    VersionArchived(VersionId),
    /// Deleting this version would leave the current pointer dangling.
    CannotDeleteCurrent {
        document_id: DocumentId,
        label: String,
    },
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for VersionServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DocumentNotFound(id) => write!(f, "document not found: {id}"),
            Self::VersionNotFound {
                document_id,
                version_id,
            } => write!(f, "version {version_id} not found in document {document_id}"),
            Self::InvalidLabel(label) => write!(f, "invalid version label: `{label}`"),
            Self::DuplicateLabel { document_id, label } => write!(
                f,
                "version label `{label}` already exists in document {document_id}"
            ),
            Self::BlankChanges => write!(f, "change summary must not be blank"),
            Self::BlankAuthor => write!(f, "author must not be blank"),
            Self::BlankComment => write!(f, "comment must not be blank"),
            Self::VersionArchived(id) => write!(f, "version is archived: {id}"),
            Self::CannotDeleteCurrent { document_id, label } => write!(
                f,
                "cannot delete current version `{label}` of document {document_id}"
            ),
            Self::InconsistentState(details) => write!(f, "inconsistent version state: {details}"),
        }
    }
}

impl Error for VersionServiceError {}

pub type VersionResult<T> = Result<T, VersionServiceError>;

/// Request model for adding a version to a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewVersion {
    /// Version label. `None` uses `suggest_next_label`.
    pub label: Option<String>,
    pub changes: String,
    pub created_by: String,
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
}

/// Pointer integrity findings for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityReport {
    pub document_id: DocumentId,
    /// Set when `current_version` matches no version label.
    pub dangling_current: Option<String>,
    /// Labels shared by more than one version.
    pub duplicate_labels: Vec<String>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.dangling_current.is_none() && self.duplicate_labels.is_empty()
    }
}

/// Version-control facade over repository implementations.
pub struct VersionService<R: DocumentRepository> {
    repo: R,
}

impl<R: DocumentRepository> VersionService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn repo_mut(&mut self) -> &mut R {
        &mut self.repo
    }

    pub fn into_inner(self) -> R {
        self.repo
    }

    /// Adds a new version and makes it current.
    ///
    /// # Errors
    /// - `DocumentNotFound` when `document_id` is unknown.
    /// - `InvalidLabel`, `BlankChanges`, `BlankAuthor` for malformed input.
    /// - `DuplicateLabel` when the label is already used in this document.
    pub fn create_version(
        &mut self,
        document_id: DocumentId,
        request: NewVersion,
    ) -> VersionResult<DocumentVersion> {
        let document = self.document(document_id)?;
        let label = match request.label {
            Some(label) => normalize_label(&label)?,
            None => next_label(document),
        };
        if request.changes.trim().is_empty() {
            return Err(VersionServiceError::BlankChanges);
        }
        let author = request.created_by.trim();
        if author.is_empty() {
            return Err(VersionServiceError::BlankAuthor);
        }
        if document.has_version_label(&label) {
            return Err(VersionServiceError::DuplicateLabel { document_id, label });
        }

        let mut version = DocumentVersion::new(
            document_id,
            label,
            request.changes.trim(),
            author,
            self.repo.now_ms(),
        );
        version.file_name = request.file_name;
        version.file_size = request.file_size;
        let version_id = version.id;

        if !self.repo.add_version(document_id, version) {
            return Err(VersionServiceError::DocumentNotFound(document_id));
        }
        let created = self.read_back(document_id, version_id, "created version missing")?;
        info!(
            "event=version_create module=version_service status=ok document_id={} version_id={} label={}",
            document_id, version_id, created.version
        );
        Ok(created)
    }

    /// Suggests the next `major.minor` label for a document.
    pub fn suggest_next_label(&self, document_id: DocumentId) -> VersionResult<String> {
        Ok(next_label(self.document(document_id)?))
    }

    /// Returns the version history ordered by creation time.
    pub fn history(&self, document_id: DocumentId) -> VersionResult<Vec<&DocumentVersion>> {
        Ok(self.document(document_id)?.sorted_versions())
    }

    /// Returns the version the current pointer resolves to, if any.
    pub fn current(&self, document_id: DocumentId) -> VersionResult<Option<&DocumentVersion>> {
        Ok(self.document(document_id)?.current())
    }

    /// Records `reviewer` on a version. Repeated reviews are idempotent.
    pub fn record_review(
        &mut self,
        document_id: DocumentId,
        version_id: VersionId,
        reviewer: &str,
    ) -> VersionResult<DocumentVersion> {
        let reviewer = reviewer.trim();
        if reviewer.is_empty() {
            return Err(VersionServiceError::BlankAuthor);
        }
        let version = self.version(document_id, version_id)?;
        if version.was_reviewed_by(reviewer) {
            return Ok(version.clone());
        }

        let mut reviewed_by = version.reviewed_by.clone();
        reviewed_by.push(reviewer.to_string());
        let patch = VersionPatch::new().reviewed_by(reviewed_by);
        self.apply(document_id, version_id, &patch)
    }

    /// Approves a version and publishes it.
    ///
    /// # Errors
    /// - `VersionArchived` when the version is archived.
    pub fn approve(
        &mut self,
        document_id: DocumentId,
        version_id: VersionId,
        approver: &str,
    ) -> VersionResult<DocumentVersion> {
        let approver = approver.trim();
        if approver.is_empty() {
            return Err(VersionServiceError::BlankAuthor);
        }
        let version = self.version(document_id, version_id)?;
        if version.status == PublishStatus::Archived {
            return Err(VersionServiceError::VersionArchived(version_id));
        }

        let patch = VersionPatch::new()
            .approval(approver, self.repo.now_ms())
            .status(PublishStatus::Published);
        let approved = self.apply(document_id, version_id, &patch)?;
        info!(
            "event=version_approve module=version_service status=ok document_id={document_id} version_id={version_id}"
        );
        Ok(approved)
    }

    /// Archives a version. Approval metadata is kept.
    pub fn archive(
        &mut self,
        document_id: DocumentId,
        version_id: VersionId,
    ) -> VersionResult<DocumentVersion> {
        self.version(document_id, version_id)?;
        let patch = VersionPatch::new().status(PublishStatus::Archived);
        self.apply(document_id, version_id, &patch)
    }

    /// Appends a comment to the version thread.
    pub fn add_comment(
        &mut self,
        document_id: DocumentId,
        version_id: VersionId,
        author: &str,
        content: &str,
    ) -> VersionResult<VersionComment> {
        let author = author.trim();
        if author.is_empty() {
            return Err(VersionServiceError::BlankAuthor);
        }
        let content = content.trim();
        if content.is_empty() {
            return Err(VersionServiceError::BlankComment);
        }
        let version = self.version(document_id, version_id)?;

        let comment = VersionComment::new(author, content, self.repo.now_ms());
        let mut comments = version.comments.clone();
        comments.push(comment.clone());
        self.apply(
            document_id,
            version_id,
            &VersionPatch::new().comments(comments),
        )?;
        Ok(comment)
    }

    /// Points the document at an existing version without adding history.
    pub fn revert(
        &mut self,
        document_id: DocumentId,
        version_id: VersionId,
    ) -> VersionResult<Document> {
        self.version(document_id, version_id)?;
        if !self.repo.revert_to_version(document_id, version_id) {
            return Err(VersionServiceError::InconsistentState(
                "revert target vanished before write",
            ));
        }
        let document = self.document(document_id)?.clone();
        info!(
            "event=version_revert module=version_service status=ok document_id={} version_id={} label={}",
            document_id, version_id, document.current_version
        );
        Ok(document)
    }

    /// Deletes a version unless it is the sole holder of the current label.
    pub fn delete_version(
        &mut self,
        document_id: DocumentId,
        version_id: VersionId,
    ) -> VersionResult<()> {
        let document = self.document(document_id)?;
        let version = document
            .version(version_id)
            .ok_or(VersionServiceError::VersionNotFound {
                document_id,
                version_id,
            })?;
        if version.version == document.current_version {
            let holders = document
                .versions
                .iter()
                .filter(|candidate| candidate.version == document.current_version)
                .count();
            if holders == 1 {
                return Err(VersionServiceError::CannotDeleteCurrent {
                    document_id,
                    label: version.version.clone(),
                });
            }
        }

        if !self.repo.delete_version(document_id, version_id) {
            return Err(VersionServiceError::InconsistentState(
                "delete target vanished before write",
            ));
        }
        info!(
            "event=version_delete module=version_service status=ok document_id={document_id} version_id={version_id}"
        );
        Ok(())
    }

    /// Reports dangling pointer and duplicate-label problems.
    pub fn integrity_report(&self, document_id: DocumentId) -> VersionResult<IntegrityReport> {
        Ok(integrity_of(self.document(document_id)?))
    }

    /// Reports every document with at least one integrity problem.
    pub fn integrity_problems(&self) -> Vec<IntegrityReport> {
        self.repo
            .documents()
            .iter()
            .map(integrity_of)
            .filter(|report| !report.is_clean())
            .collect()
    }

    fn document(&self, document_id: DocumentId) -> VersionResult<&Document> {
        self.repo
            .get_document(document_id)
            .ok_or(VersionServiceError::DocumentNotFound(document_id))
    }

    fn version(
        &self,
        document_id: DocumentId,
        version_id: VersionId,
    ) -> VersionResult<&DocumentVersion> {
        self.document(document_id)?
            .version(version_id)
            .ok_or(VersionServiceError::VersionNotFound {
                document_id,
                version_id,
            })
    }

    fn apply(
        &mut self,
        document_id: DocumentId,
        version_id: VersionId,
        patch: &VersionPatch,
    ) -> VersionResult<DocumentVersion> {
        if !self.repo.update_version(document_id, version_id, patch) {
            return Err(VersionServiceError::VersionNotFound {
                document_id,
                version_id,
            });
        }
        self.read_back(document_id, version_id, "updated version missing")
    }

    fn read_back(
        &self,
        document_id: DocumentId,
        version_id: VersionId,
        details: &'static str,
    ) -> VersionResult<DocumentVersion> {
        self.repo
            .get_document(document_id)
            .and_then(|document| document.version(version_id))
            .cloned()
            .ok_or(VersionServiceError::InconsistentState(details))
    }
}

fn integrity_of(document: &Document) -> IntegrityReport {
    IntegrityReport {
        document_id: document.id,
        dangling_current: document
            .has_dangling_current_version()
            .then(|| document.current_version.clone()),
        duplicate_labels: document.duplicate_version_labels(),
    }
}

fn normalize_label(label: &str) -> VersionResult<String> {
    let trimmed = label.trim();
    if !LABEL_RE.is_match(trimmed) {
        return Err(VersionServiceError::InvalidLabel(label.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Bumps the minor part of the highest `major.minor` label.
///
/// Labels outside the `major.minor` form are ignored; a document without
/// numeric labels starts at `1.0`.
pub fn next_label(document: &Document) -> String {
    let highest = document
        .versions
        .iter()
        .filter_map(|version| {
            let caps = MAJOR_MINOR_RE.captures(version.version.trim())?;
            let major = caps.get(1)?.as_str().parse::<u64>().ok()?;
            let minor = caps.get(2)?.as_str().parse::<u64>().ok()?;
            Some((major, minor))
        })
        .max();

    match highest {
        Some((major, minor)) => format!("{major}.{}", minor.saturating_add(1)),
        None => FIRST_LABEL.to_string(),
    }
}
