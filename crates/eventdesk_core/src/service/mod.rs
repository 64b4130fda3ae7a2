//! Core use-case services.
//!
//! # Responsibility
//! - Turn silent store mutations into validated, typed use-case APIs.
//! - Keep CLI/UI layers decoupled from the store representation.

pub mod document_service;
pub mod version_service;
