//! Document version-control domain model.
//!
//! # Responsibility
//! - Define canonical document and version records shared by store and services.
//! - Express partial updates as patch values instead of ad-hoc field merges.
//!
//! # Invariants
//! - Every document and version is identified by a stable UUID.
//! - Versions are owned by exactly one document.

pub mod document;
pub mod version;
