//! # Error Hierarchy
//!
//! Structured error types for the rulekeep model, built with `thiserror`.
//!
//! Collection errors fall into two kinds. A *duplicate key* means the input
//! to a collection was not a function of its keys. A *missing key* means a
//! lookup or a cross-collection reference named something that is not there.
//! Every error carries the collection it came from and the key rendered as
//! text, so the failure can be reported without access to the generic types.

use thiserror::Error;

/// The two classes of collection failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Two entities claim the same key, or an entity is filed under a key
    /// other than its own.
    DuplicateKey,
    /// A key was requested or referenced but is absent.
    MissingKey,
}

/// Errors raised while building or querying a keyed collection or one of
/// the validated compositions built on top of it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    /// Two input entities produced the same key.
    #[error("duplicate key {key} in {collection}")]
    DuplicateKey {
        /// The collection under construction.
        collection: &'static str,
        /// The colliding key.
        key: String,
    },

    /// An entity was filed under a key that differs from its own identifier.
    #[error("{collection} entry filed under {key} declares identifier {declared}")]
    KeyMismatch {
        /// The collection under construction.
        collection: &'static str,
        /// The key the entity was filed under.
        key: String,
        /// The identifier the entity itself declares.
        declared: String,
    },

    /// A lookup named a key the collection does not contain.
    #[error("no entry for key {key} in {collection}")]
    MissingKey {
        /// The collection that was queried.
        collection: &'static str,
        /// The absent key.
        key: String,
    },

    /// A composite refers to an identifier absent from the collection it
    /// depends on.
    #[error("{referenced_by} refers to {key}, which is not in {collection}")]
    DanglingReference {
        /// The dependency collection that lacks the key.
        collection: &'static str,
        /// The unresolved key.
        key: String,
        /// The composite holding the reference.
        referenced_by: &'static str,
    },
}

impl CollectionError {
    /// Classify this error as a duplicate-key or missing-key failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateKey { .. } | Self::KeyMismatch { .. } => ErrorKind::DuplicateKey,
            Self::MissingKey { .. } | Self::DanglingReference { .. } => ErrorKind::MissingKey,
        }
    }

    /// The offending key, as text.
    pub fn key(&self) -> &str {
        match self {
            Self::DuplicateKey { key, .. }
            | Self::KeyMismatch { key, .. }
            | Self::MissingKey { key, .. }
            | Self::DanglingReference { key, .. } => key,
        }
    }
}

/// Validation errors for primitive values parsed from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A number identifier is not a decimal integer.
    #[error("invalid {kind}: {value:?} (expected a decimal integer)")]
    InvalidNumber {
        /// Which identifier was being parsed ("rule number", "CFJ number").
        kind: &'static str,
        /// The rejected input.
        value: String,
    },

    /// A power value is not a decimal number.
    #[error("invalid power: {0:?} (expected a decimal number)")]
    InvalidPower(String),

    /// A date string is not a calendar date.
    #[error("invalid date: {value:?} ({reason})")]
    InvalidDate {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}
