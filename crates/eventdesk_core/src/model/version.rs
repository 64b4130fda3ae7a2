//! Document version model.
//!
//! # Responsibility
//! - Define one historical snapshot of a document and its review metadata.
//! - Provide partial-update patches for version fields.
//!
//! # Invariants
//! - `document_id` always names the owning document.
//! - `comments` keep insertion order.
//! - A version is owned by exactly one document; it is never shared.

use crate::model::document::{DocumentId, PublishStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a version entry.
pub type VersionId = Uuid;

/// Stable identifier for a comment on a version.
pub type CommentId = Uuid;

/// One comment in a version review thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionComment {
    pub id: CommentId,
    pub content: String,
    pub author: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl VersionComment {
    pub fn new(author: impl Into<String>, content: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            author: author.into(),
            created_at,
        }
    }
}

/// Snapshot of a document's content and review metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentVersion {
    pub id: VersionId,
    pub document_id: DocumentId,
    /// Human-facing label such as `1.0` or `2.1`. Not guaranteed unique.
    pub version: String,
    /// Free-text change summary.
    pub changes: String,
    pub created_by: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    pub status: PublishStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reviewed_by: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    /// Unix epoch milliseconds. Set together with `approved_by`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<VersionComment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Attachment size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

impl DocumentVersion {
    /// Creates a draft version with a generated ID and no review metadata.
    pub fn new(
        document_id: DocumentId,
        version: impl Into<String>,
        changes: impl Into<String>,
        created_by: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self::with_id(
            Uuid::new_v4(),
            document_id,
            version,
            changes,
            created_by,
            created_at,
        )
    }

    /// Creates a draft version with a caller-provided ID.
    ///
    /// Used by seed and import paths where identity already exists.
    pub fn with_id(
        id: VersionId,
        document_id: DocumentId,
        version: impl Into<String>,
        changes: impl Into<String>,
        created_by: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id,
            document_id,
            version: version.into(),
            changes: changes.into(),
            created_by: created_by.into(),
            created_at,
            status: PublishStatus::Draft,
            reviewed_by: Vec::new(),
            approved_by: None,
            approved_at: None,
            comments: Vec::new(),
            file_name: None,
            file_size: None,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.approved_by.is_some()
    }

    pub fn was_reviewed_by(&self, reviewer: &str) -> bool {
        self.reviewed_by.iter().any(|name| name == reviewer)
    }
}

/// Partial update for a version. `None` fields are left untouched.
///
/// Identity fields (`id`, `document_id`) are not patchable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionPatch {
    pub version: Option<String>,
    pub changes: Option<String>,
    pub status: Option<PublishStatus>,
    pub reviewed_by: Option<Vec<String>>,
    pub approved_by: Option<Option<String>>,
    pub approved_at: Option<Option<i64>>,
    pub comments: Option<Vec<VersionComment>>,
    pub file_name: Option<Option<String>>,
    pub file_size: Option<Option<u64>>,
}

impl VersionPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(mut self, value: impl Into<String>) -> Self {
        self.version = Some(value.into());
        self
    }

    pub fn changes(mut self, value: impl Into<String>) -> Self {
        self.changes = Some(value.into());
        self
    }

    pub fn status(mut self, value: PublishStatus) -> Self {
        self.status = Some(value);
        self
    }

    pub fn reviewed_by(mut self, value: Vec<String>) -> Self {
        self.reviewed_by = Some(value);
        self
    }

    /// Sets approver and approval time together.
    pub fn approval(mut self, approver: impl Into<String>, approved_at: i64) -> Self {
        self.approved_by = Some(Some(approver.into()));
        self.approved_at = Some(Some(approved_at));
        self
    }

    pub fn clear_approval(mut self) -> Self {
        self.approved_by = Some(None);
        self.approved_at = Some(None);
        self
    }

    pub fn comments(mut self, value: Vec<VersionComment>) -> Self {
        self.comments = Some(value);
        self
    }

    pub fn attachment(mut self, file_name: impl Into<String>, file_size: u64) -> Self {
        self.file_name = Some(Some(file_name.into()));
        self.file_size = Some(Some(file_size));
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merges the set fields into `target`.
    pub fn apply_to(&self, target: &mut DocumentVersion) {
        if let Some(value) = &self.version {
            target.version = value.clone();
        }
        if let Some(value) = &self.changes {
            target.changes = value.clone();
        }
        if let Some(value) = self.status {
            target.status = value;
        }
        if let Some(value) = &self.reviewed_by {
            target.reviewed_by = value.clone();
        }
        if let Some(value) = &self.approved_by {
            target.approved_by = value.clone();
        }
        if let Some(value) = self.approved_at {
            target.approved_at = value;
        }
        if let Some(value) = &self.comments {
            target.comments = value.clone();
        }
        if let Some(value) = &self.file_name {
            target.file_name = value.clone();
        }
        if let Some(value) = self.file_size {
            target.file_size = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DocumentVersion, VersionPatch};
    use crate::model::document::PublishStatus;
    use uuid::Uuid;

    #[test]
    fn patch_touches_only_set_fields() {
        let mut version = DocumentVersion::new(Uuid::new_v4(), "1.0", "initial", "ana", 10);
        let before = version.clone();

        VersionPatch::new()
            .status(PublishStatus::Published)
            .apply_to(&mut version);

        assert_eq!(version.status, PublishStatus::Published);
        assert_eq!(version.version, before.version);
        assert_eq!(version.changes, before.changes);
        assert_eq!(version.id, before.id);
    }

    #[test]
    fn clear_approval_resets_both_fields() {
        let mut version = DocumentVersion::new(Uuid::new_v4(), "1.0", "initial", "ana", 10);
        VersionPatch::new().approval("lee", 20).apply_to(&mut version);
        assert!(version.is_approved());

        VersionPatch::new().clear_approval().apply_to(&mut version);
        assert_eq!(version.approved_by, None);
        assert_eq!(version.approved_at, None);
    }

    #[test]
    fn empty_patch_reports_empty() {
        assert!(VersionPatch::new().is_empty());
        assert!(!VersionPatch::new().changes("x").is_empty());
    }
}
