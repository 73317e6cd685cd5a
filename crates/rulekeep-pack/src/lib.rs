//! # rulekeep-pack — Data Directory Ingestion
//!
//! Reads a ruleset data directory into the validated model types of
//! `rulekeep-state`.
//!
//! ## Layout
//!
//! ```text
//! <data>/config/general   entity_kind, entity_has_power
//! <data>/config/index     ordered sections, each listing its rule numbers
//! <data>/rules/<number>   one YAML file per rule
//! ```
//!
//! - **Configuration** (`config.rs`): [`GeneralConfig`].
//! - **Index** (`index.rs`): [`IndexSection`]; each section becomes a category.
//! - **Rule files** (`rule_file.rs`): [`load_rule`] reads one rule and the
//!   SHA-256 digest of its file.
//! - **Loader** (`loader.rs`): [`load_ruleset`] builds the
//!   [`CategorizedRulesetState`](rulekeep_state::CategorizedRulesetState).
//! - **Property list** (`proplist.rs`): per-rule digest, power and title.
//!
//! ## Crate Policy
//!
//! - File paths are carried in every file-related error.
//! - The model crates never touch the filesystem; all I/O happens here.

pub mod config;
pub mod error;
pub mod index;
pub mod loader;
pub mod parser;
pub mod proplist;
pub mod rule_file;

pub use config::GeneralConfig;
pub use error::{PackError, PackResult};
pub use index::{load_index, IndexSection};
pub use loader::{load_ruleset, LoadedRuleset};
pub use proplist::{PropertyList, PropertyRow};
pub use rule_file::{
    load_rule, rule_path, scan_rule_files, RuleDocument, RuleFiles, RuleSource,
};
