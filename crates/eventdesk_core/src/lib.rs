//! Core document version-control logic for EventDesk.
//! This crate is the single source of truth for document/version invariants.

pub mod clock;
pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::document::{
    AccessLevel, Document, DocumentId, DocumentPatch, DocumentValidationError, PublishStatus,
};
pub use model::version::{CommentId, DocumentVersion, VersionComment, VersionId, VersionPatch};
pub use repo::document_repo::{DocumentRepository, DocumentStore, SnapshotError};
pub use service::document_service::{
    DocumentFilter, DocumentService, DocumentServiceError, NewDocument, Viewer,
};
pub use service::version_service::{
    IntegrityReport, NewVersion, VersionService, VersionServiceError,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
