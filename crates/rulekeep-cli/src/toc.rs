//! # Toc Subcommand
//!
//! Prints the table of contents: each section name followed by one line per
//! rule, in index order.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use rulekeep_core::CategoryId;
use rulekeep_pack::LoadedRuleset;

/// Arguments for the `rulekeep toc` subcommand.
#[derive(Args, Debug)]
pub struct TocArgs {
    /// Path to the data directory.
    #[arg(value_name = "DATA")]
    pub data_dir: PathBuf,

    /// Only list the section with this category id.
    #[arg(long, value_name = "ID")]
    pub category: Option<String>,
}

/// Execute the toc subcommand.
pub fn run_toc(args: &TocArgs) -> Result<u8> {
    let loaded = crate::load_data_dir(&args.data_dir)?;
    let category = args.category.as_deref().map(CategoryId::from);
    print!("{}", render_toc(&loaded, category.as_ref())?);
    Ok(0)
}

/// Render the table of contents, optionally for a single category.
pub fn render_toc(loaded: &LoadedRuleset, category: Option<&CategoryId>) -> Result<String> {
    if let Some(id) = category {
        loaded
            .state
            .categories()
            .category_by_id(id)
            .with_context(|| format!("no section with category id {id}"))?;
    }

    let ruleset = loaded.state.ruleset();
    let mut out = String::new();
    for section in &loaded.sections {
        if category.is_some_and(|id| *id != section.category_id()) {
            continue;
        }
        out.push_str(&section.name);
        out.push('\n');
        for number in &section.rules {
            let rule = ruleset.rule_by_number(number)?;
            out.push_str(&toc_line(&number.to_string(), &rule.title));
        }
    }
    Ok(out)
}

fn toc_line(number: &str, title: &str) -> String {
    format!("   * Rule {number:>4}: {title}\n")
}
