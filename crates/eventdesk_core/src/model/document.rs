//! Document domain model.
//!
//! # Responsibility
//! - Define the canonical multi-version document record.
//! - Provide pointer/ownership checks used by services and diagnostics.
//! - Provide partial-update patches for document metadata.
//!
//! # Invariants
//! - `id` is stable and never reused for another document.
//! - `current_version` should name the label of one entry in `versions`.
//!   Store mutations do not enforce this; `has_dangling_current_version`
//!   reports it.
//! - Every entry in `versions` carries `document_id == id`.

use crate::model::version::{DocumentVersion, VersionId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a document.
pub type DocumentId = Uuid;

/// Publication state shared by documents and their versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishStatus {
    Draft,
    Published,
    Archived,
}

impl PublishStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }
}

impl Display for PublishStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visibility class for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    /// Visible to everyone.
    Public,
    /// Visible to the creator only.
    Private,
    /// Visible to the creator and the allow-listed users/roles.
    Restricted,
}

/// Canonical document record with its owned version history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Label of the active version. Empty when no version exists yet.
    pub current_version: String,
    /// Insertion order carries no meaning; display order is by `created_at`.
    #[serde(default)]
    pub versions: Vec<DocumentVersion>,
    pub status: PublishStatus,
    pub access_level: AccessLevel,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_users: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_roles: Vec<String>,
    pub created_by: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds. Stamped by version add/revert.
    pub updated_at: i64,
}

impl Document {
    /// Creates a draft public document with a generated ID and no versions.
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        created_by: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), title, category, created_by, created_at)
    }

    /// Creates a document with a caller-provided ID.
    ///
    /// Used by seed and import paths where identity already exists.
    pub fn with_id(
        id: DocumentId,
        title: impl Into<String>,
        category: impl Into<String>,
        created_by: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            category: category.into(),
            tags: Vec::new(),
            current_version: String::new(),
            versions: Vec::new(),
            status: PublishStatus::Draft,
            access_level: AccessLevel::Public,
            allowed_users: Vec::new(),
            allowed_roles: Vec::new(),
            created_by: created_by.into(),
            created_at,
            updated_at: created_at,
        }
    }

    pub fn version(&self, version_id: VersionId) -> Option<&DocumentVersion> {
        self.versions.iter().find(|version| version.id == version_id)
    }

    pub fn version_mut(&mut self, version_id: VersionId) -> Option<&mut DocumentVersion> {
        self.versions
            .iter_mut()
            .find(|version| version.id == version_id)
    }

    /// Returns the version the current pointer resolves to.
    ///
    /// When labels are duplicated, the most recently created match wins.
    pub fn current(&self) -> Option<&DocumentVersion> {
        self.versions
            .iter()
            .filter(|version| version.version == self.current_version)
            .max_by_key(|version| version.created_at)
    }

    /// Returns versions sorted by creation time, ties broken by label.
    pub fn sorted_versions(&self) -> Vec<&DocumentVersion> {
        let mut sorted: Vec<&DocumentVersion> = self.versions.iter().collect();
        sorted.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.version.cmp(&b.version))
        });
        sorted
    }

    pub fn has_version_label(&self, label: &str) -> bool {
        self.versions.iter().any(|version| version.version == label)
    }

    /// True when the pointer is set but matches no version label.
    pub fn has_dangling_current_version(&self) -> bool {
        !self.current_version.is_empty() && !self.has_version_label(&self.current_version)
    }

    /// Labels used by more than one version, sorted.
    pub fn duplicate_version_labels(&self) -> Vec<String> {
        let mut counts = BTreeMap::<&str, usize>::new();
        for version in &self.versions {
            *counts.entry(version.version.as_str()).or_default() += 1;
        }
        counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(label, _)| label.to_string())
            .collect()
    }

    /// Returns whether `user` holding `roles` may view this document.
    pub fn is_visible_to(&self, user: &str, roles: &[String]) -> bool {
        if self.created_by == user {
            return true;
        }
        match self.access_level {
            AccessLevel::Public => true,
            AccessLevel::Private => false,
            AccessLevel::Restricted => {
                self.allowed_users.iter().any(|allowed| allowed == user)
                    || roles
                        .iter()
                        .any(|role| self.allowed_roles.iter().any(|allowed| allowed == role))
            }
        }
    }

    /// Validates shape-level invariants.
    ///
    /// Does not check the current-version pointer; a dangling pointer is a
    /// reportable state, not a malformed record.
    pub fn validate(&self) -> Result<(), DocumentValidationError> {
        if self.id.is_nil() {
            return Err(DocumentValidationError::NilId);
        }
        if self.title.trim().is_empty() {
            return Err(DocumentValidationError::BlankTitle);
        }
        for version in &self.versions {
            if version.document_id != self.id {
                return Err(DocumentValidationError::ForeignVersion {
                    version_id: version.id,
                    owner_id: version.document_id,
                });
            }
        }
        Ok(())
    }
}

/// Shape violations detected by `Document::validate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentValidationError {
    NilId,
    BlankTitle,
    /// A version in the list belongs to another document.
    ForeignVersion {
        version_id: VersionId,
        owner_id: DocumentId,
    },
}

impl Display for DocumentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "document id must not be nil"),
            Self::BlankTitle => write!(f, "document title must not be blank"),
            Self::ForeignVersion {
                version_id,
                owner_id,
            } => write!(
                f,
                "version {version_id} belongs to document {owner_id}, not this document"
            ),
        }
    }
}

impl Error for DocumentValidationError {}

/// Partial update for document metadata. `None` fields are left untouched.
///
/// `versions` is included so wholesale history replacement stays possible,
/// matching the merge semantics of the dashboard store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub current_version: Option<String>,
    pub versions: Option<Vec<DocumentVersion>>,
    pub status: Option<PublishStatus>,
    pub access_level: Option<AccessLevel>,
    pub allowed_users: Option<Vec<String>>,
    pub allowed_roles: Option<Vec<String>>,
    pub updated_at: Option<i64>,
}

impl DocumentPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, value: impl Into<String>) -> Self {
        self.title = Some(value.into());
        self
    }

    pub fn description(mut self, value: impl Into<String>) -> Self {
        self.description = Some(value.into());
        self
    }

    pub fn category(mut self, value: impl Into<String>) -> Self {
        self.category = Some(value.into());
        self
    }

    pub fn tags(mut self, value: Vec<String>) -> Self {
        self.tags = Some(value);
        self
    }

    pub fn current_version(mut self, value: impl Into<String>) -> Self {
        self.current_version = Some(value.into());
        self
    }

    pub fn versions(mut self, value: Vec<DocumentVersion>) -> Self {
        self.versions = Some(value);
        self
    }

    pub fn status(mut self, value: PublishStatus) -> Self {
        self.status = Some(value);
        self
    }

    /// Sets access level together with its allow-lists.
    pub fn access(
        mut self,
        level: AccessLevel,
        allowed_users: Vec<String>,
        allowed_roles: Vec<String>,
    ) -> Self {
        self.access_level = Some(level);
        self.allowed_users = Some(allowed_users);
        self.allowed_roles = Some(allowed_roles);
        self
    }

    pub fn updated_at(mut self, value: i64) -> Self {
        self.updated_at = Some(value);
        self
    }

    /// Merges the set fields into `target`.
    pub fn apply_to(&self, target: &mut Document) {
        if let Some(value) = &self.title {
            target.title = value.clone();
        }
        if let Some(value) = &self.description {
            target.description = value.clone();
        }
        if let Some(value) = &self.category {
            target.category = value.clone();
        }
        if let Some(value) = &self.tags {
            target.tags = value.clone();
        }
        if let Some(value) = &self.current_version {
            target.current_version = value.clone();
        }
        if let Some(value) = &self.versions {
            target.versions = value.clone();
        }
        if let Some(value) = self.status {
            target.status = value;
        }
        if let Some(value) = self.access_level {
            target.access_level = value;
        }
        if let Some(value) = &self.allowed_users {
            target.allowed_users = value.clone();
        }
        if let Some(value) = &self.allowed_roles {
            target.allowed_roles = value.clone();
        }
        if let Some(value) = self.updated_at {
            target.updated_at = value;
        }
    }
}
