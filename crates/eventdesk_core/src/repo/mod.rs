//! Repository layer for the document collection.
//!
//! # Responsibility
//! - Define the mutation contract used by services.
//! - Keep the session-scoped in-memory collection behind that contract.
//!
//! # Invariants
//! - Repository mutations never fail; unknown ids are reported as `false`.
//! - Typed errors belong to the service layer.

pub mod document_repo;
