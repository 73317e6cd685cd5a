//! # rulekeep-core — Foundational Types for rulekeep
//!
//! This crate is the leaf of the rulekeep workspace. It defines the
//! primitives every other crate builds on and depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `RuleNumber`, `CfjNumber` and
//!    `CategoryId` are distinct types. A CFJ number cannot be passed where a
//!    rule number is expected, even though both wrap the same big integer.
//!
//! 2. **One keyed collection.** Every "map of entities by their own id" in the
//!    model is a [`KeyedCollection`]. Duplicate and mismatched keys are
//!    rejected in exactly one place, so the rule set and the category set
//!    cannot drift apart in behaviour.
//!
//! 3. **Write once, read many.** Nothing in this crate exposes a mutating
//!    method. A new state is a new value.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `rulekeep-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod history;
pub mod identity;
pub mod keyed;

// Re-export primary types for ergonomic imports.
pub use error::{CollectionError, ErrorKind, ValidationError};
pub use history::{HistoricalDate, HistoricalEntry};
pub use identity::{CategoryId, CfjNumber, RuleNumber};
pub use keyed::{Keyed, KeyedCollection};
