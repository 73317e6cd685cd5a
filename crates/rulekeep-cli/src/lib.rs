//! # rulekeep-cli — Ruleset Command-Line Tool
//!
//! Provides the `rulekeep` binary over a ruleset data directory.
//!
//! ## Subcommands
//!
//! - `rulekeep check` — Load, validate and summarize a data directory.
//! - `rulekeep toc` — Print the table of contents, per section.
//! - `rulekeep manifest` — Print, write or compare the property list.
//!
//! ```bash
//! rulekeep check data/
//! rulekeep toc data/ --category power
//! rulekeep manifest data/ --compare data/meta/proplist
//! ```
//!
//! Handlers return an exit code and leave printing of errors to `main`.

pub mod check;
pub mod manifest;
pub mod toc;

use std::path::Path;

use anyhow::{Context, Result};

use rulekeep_pack::{load_ruleset, LoadedRuleset};

/// Load a data directory, adding the directory to any error.
pub fn load_data_dir(data_dir: &Path) -> Result<LoadedRuleset> {
    load_ruleset(data_dir)
        .with_context(|| format!("failed to load data directory {}", data_dir.display()))
}
