//! Shared file reading and YAML parsing.
//!
//! All loaders read through these functions so that a missing file is always
//! reported as [`PackError::FileNotFound`] and a parse failure always names
//! the file it came from.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{PackError, PackResult};

/// Read a file's raw bytes.
pub fn read_bytes(path: &Path) -> PackResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PackError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            PackError::Io(e)
        }
    })
}

/// Parse YAML bytes that were read from `path`.
pub fn parse_yaml<T: DeserializeOwned>(path: &Path, data: &[u8]) -> PackResult<T> {
    serde_yaml::from_slice(data).map_err(|e| PackError::YamlParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load a YAML file into a strongly-typed struct.
pub fn load_yaml_typed<T: DeserializeOwned>(path: &Path) -> PackResult<T> {
    let data = read_bytes(path)?;
    parse_yaml(path, &data)
}

/// Compute the lowercase hex SHA-256 digest of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    result.iter().map(|b| format!("{b:02x}")).collect()
}
