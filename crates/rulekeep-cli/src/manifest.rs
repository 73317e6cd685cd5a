//! # Manifest Subcommand
//!
//! Emits the property list of a data directory: one tab-separated line per
//! rule with its number, file digest, power and title.
//!
//! With `--compare`, reads a property list from an earlier run and prints
//! `<number>\tchanged` or `<number>\tunchanged` for every rule instead.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use rulekeep_pack::PropertyList;

/// Arguments for the `rulekeep manifest` subcommand.
#[derive(Args, Debug)]
pub struct ManifestArgs {
    /// Path to the data directory.
    #[arg(value_name = "DATA")]
    pub data_dir: PathBuf,

    /// Write the property list to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Compare against a previously written property list.
    #[arg(long, value_name = "PATH")]
    pub compare: Option<PathBuf>,
}

/// Execute the manifest subcommand.
pub fn run_manifest(args: &ManifestArgs) -> Result<u8> {
    let loaded = crate::load_data_dir(&args.data_dir)?;
    let list = loaded.property_list();

    if let Some(ref previous_path) = args.compare {
        let text = std::fs::read_to_string(previous_path)
            .with_context(|| format!("failed to read {}", previous_path.display()))?;
        let previous = PropertyList::parse(&text)
            .with_context(|| format!("failed to parse {}", previous_path.display()))?;
        print!("{}", change_report(&list, &previous));
    }

    match args.output {
        Some(ref path) => {
            std::fs::write(path, list.to_string())
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), rules = list.len(), "wrote property list");
        }
        None if args.compare.is_none() => print!("{list}"),
        None => {}
    }
    Ok(0)
}

/// One `<number>\tchanged|unchanged` line per rule in `current`.
pub fn change_report(current: &PropertyList, previous: &PropertyList) -> String {
    let changed = current.changed_since(previous);
    current
        .iter()
        .map(|(number, _)| {
            let status = if changed.contains(number) {
                "changed"
            } else {
                "unchanged"
            };
            format!("{number}\t{status}\n")
        })
        .collect()
}
