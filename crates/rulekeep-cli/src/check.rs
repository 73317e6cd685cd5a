//! # Check Subcommand
//!
//! Loads a data directory, which runs every model invariant, and prints a
//! summary: rule count, highest rule number, category count, rules without a
//! category, rule files missing from the index, files in `rules/` that are
//! not rule files and, for entities with power, the number of rules at each
//! power.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use rulekeep_pack::LoadedRuleset;
use rulekeep_state::Power;

/// Arguments for the `rulekeep check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the data directory.
    #[arg(value_name = "DATA")]
    pub data_dir: PathBuf,
}

/// Execute the check subcommand.
///
/// Returns exit code 0 when the directory loads; load failures are errors.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let loaded = crate::load_data_dir(&args.data_dir)?;
    print!("{}", check_report(&loaded, &args.data_dir));
    Ok(0)
}

/// The summary printed by `rulekeep check`.
pub fn check_report(loaded: &LoadedRuleset, data_dir: &Path) -> String {
    let kind = &loaded.config.entity_kind;
    let ruleset = loaded.state.ruleset();
    let mut out = String::new();

    out.push_str(&format!("{kind}s: {}\n", ruleset.len()));
    if let Some(highest) = ruleset.highest_rule_number() {
        out.push_str(&format!("Highest {kind} number: {highest}\n"));
    }
    out.push_str(&format!("Categories: {}\n", loaded.state.categories().len()));

    for number in loaded.state.uncategorized_rule_numbers() {
        out.push_str(&format!("WARN: {kind} {number} has no category\n"));
    }
    for number in &loaded.unindexed {
        out.push_str(&format!(
            "WARN: {kind} {number} has a file but is not listed in the index\n"
        ));
    }
    for path in &loaded.stray_files {
        let rel = path.strip_prefix(data_dir).unwrap_or(path);
        out.push_str(&format!(
            "WARN: {} is not named by a {} number and was ignored\n",
            rel.display(),
            kind.to_lowercase()
        ));
    }

    if loaded.config.entity_has_power {
        out.push_str(&power_summary(&ruleset.power_distribution()));
    }
    out
}

/// One line per power, ascending: `"{count:<2} with Power={power}"`.
pub fn power_summary(distribution: &BTreeMap<Power, usize>) -> String {
    distribution
        .iter()
        .map(|(power, count)| format!("{count:<2} with Power={power}\n"))
        .collect()
}
