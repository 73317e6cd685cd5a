//! # rulekeep-state — The Ruleset Model
//!
//! Immutable container types for the canonical state of a ruleset. Every
//! type here is validated when it is built and never changes afterwards;
//! an update is modelled as building a new value from modified inputs.
//!
//! ## Layers
//!
//! ```text
//! RuleState ─────────────▶ RulesetState ─────────────┐
//!                                                     ▼
//! CategorySpecification ─▶ CategorySpecificationSet ─▶ RuleCategoryMapping
//!                                                     │
//!                          CategorizedRulesetState ◀──┘ (with RulesetState)
//! ```
//!
//! - **Rules** (`rule.rs`): `RuleState`, `RuleHistory`, `Power`, and the
//!   `RulesetState` keyed by rule number.
//! - **Annotations** (`annotation.rs`): CFJ annotations attached to a rule.
//! - **Categories** (`category.rs`): `CategorySpecification` and the
//!   `CategorySpecificationSet` keyed by category id.
//! - **Mapping** (`mapping.rs`): `RuleCategoryMapping`, checked against its
//!   category set at construction.
//! - **Categorized ruleset** (`categorized.rs`): a ruleset paired with a
//!   mapping whose rule numbers all exist in it, plus derived views.
//!
//! ## Invariants
//!
//! A value of any of these types is always valid. Duplicate keys, misfiled
//! entries, unknown categories and unknown rule numbers are rejected by the
//! constructor; there is no way to obtain an invalid instance, including
//! through `Deserialize`.

pub mod annotation;
pub mod categorized;
pub mod category;
pub mod mapping;
pub mod rule;

pub use annotation::{
    CfjAnnotationCaseBlock, CfjAnnotationNumber, HistoricalCfjAnnotation, RuleAnnotation,
    RuleAnnotations,
};
pub use categorized::CategorizedRulesetState;
pub use category::{CategorySpecification, CategorySpecificationSet};
pub use mapping::RuleCategoryMapping;
pub use rule::{Power, RuleHistory, RuleState, RulesetState};

pub use rulekeep_core::{
    CategoryId, CfjNumber, CollectionError, ErrorKind, HistoricalDate, HistoricalEntry, RuleNumber,
};
