//! Per-rule YAML files (`rules/<number>`).
//!
//! A rule file is named by its rule number and holds the rule's title
//! (`name`), power, text and optional history and annotations. The number
//! itself comes from the file name, never from the file body.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use rulekeep_core::RuleNumber;
use rulekeep_state::{Power, RuleAnnotations, RuleHistory, RuleState};

use crate::error::{PackError, PackResult};
use crate::parser::{parse_yaml, read_bytes, sha256_hex};

/// The body of a rule file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RuleDocument {
    /// Rule title.
    pub name: String,
    pub power: Power,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub history: RuleHistory,
    #[serde(default)]
    pub annotations: Option<RuleAnnotations>,
}

impl RuleDocument {
    /// Attach the rule number and produce the model record.
    pub fn into_state(self, id: RuleNumber) -> RuleState {
        RuleState {
            id,
            title: self.name,
            power: self.power,
            text: self.text,
            history: self.history,
            annotations: self.annotations,
        }
    }
}

/// A loaded rule together with the digest of the file it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSource {
    pub state: RuleState,
    /// Lowercase hex SHA-256 of the raw file bytes.
    pub digest: String,
}

/// Path of the file for rule `number`.
pub fn rule_path(data_dir: &Path, number: &RuleNumber) -> PathBuf {
    rules_dir(data_dir).join(number.to_string())
}

fn rules_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("rules")
}

/// Load and digest the file for rule `number`.
pub fn load_rule(data_dir: &Path, number: &RuleNumber) -> PackResult<RuleSource> {
    let path = rule_path(data_dir, number);
    let data = read_bytes(&path)?;
    let digest = sha256_hex(&data);
    let document: RuleDocument = parse_yaml(&path, &data)?;
    tracing::debug!(rule = %number, digest = %digest, "loaded rule");
    Ok(RuleSource {
        state: document.into_state(number.clone()),
        digest,
    })
}

/// What the rules directory holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleFiles {
    /// Rule numbers whose file is named exactly as the number prints.
    pub numbers: BTreeSet<RuleNumber>,
    /// Other non-hidden files, such as `README`, `101~` or `0101`.
    pub strays: BTreeSet<PathBuf>,
}

/// List the rules directory.
///
/// Hidden files and subdirectories are skipped. A file counts as a rule file
/// only if its name is the canonical form of a rule number, the name
/// [`load_rule`] would read; anything else is collected as a stray and
/// logged, never treated as an error.
pub fn scan_rule_files(data_dir: &Path) -> PackResult<RuleFiles> {
    let dir = rules_dir(data_dir);
    let entries = std::fs::read_dir(&dir).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PackError::FileNotFound { path: dir.clone() }
        } else {
            PackError::Io(e)
        }
    })?;

    let mut files = RuleFiles::default();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') {
            continue;
        }
        match name.parse::<RuleNumber>() {
            Ok(number) if number.to_string() == name => {
                files.numbers.insert(number);
            }
            _ => {
                tracing::warn!(
                    path = %path.display(),
                    "ignoring file that is not named by a rule number"
                );
                files.strays.insert(path);
            }
        }
    }
    Ok(files)
}
