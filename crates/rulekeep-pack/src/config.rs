//! General configuration of a data directory (`config/general`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PackResult;
use crate::parser::load_yaml_typed;

/// What kind of entity the data directory describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Display noun for the entities, e.g. `Rule`.
    pub entity_kind: String,
    /// Whether entities carry a power that is worth reporting.
    pub entity_has_power: bool,
}

impl GeneralConfig {
    /// Load `config/general` under `data_dir`.
    pub fn load(data_dir: &Path) -> PackResult<Self> {
        let path = general_config_path(data_dir);
        let config: Self = load_yaml_typed(&path)?;
        tracing::debug!(
            path = %path.display(),
            entity_kind = %config.entity_kind,
            entity_has_power = config.entity_has_power,
            "loaded general configuration"
        );
        Ok(config)
    }
}

fn general_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config").join("general")
}
