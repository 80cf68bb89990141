//! Catalog configuration
//!
//! An optional `curadoria.yaml` at the catalog root overrides the defaults:
//!
//! ```yaml
//! materials_dir: curadoria_coletiva/materials
//! output: curadoria_coletiva/all_materials.yml
//! extensions: [yml, yaml]
//! edit_base_url: https://github.com/cumbucadev/curadoria-coletiva/edit/main/curadoria-coletiva
//! profile_base_url: https://github.com
//! ```
//!
//! Relative paths are resolved against the catalog root.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::storage::fragment::DEFAULT_EXTENSIONS;

/// File name looked up in the catalog root
pub const CONFIG_FILE: &str = "curadoria.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding fragment files
    pub materials_dir: PathBuf,
    /// Aggregate file written by `collect`
    pub output: PathBuf,
    /// Recognized fragment extensions
    pub extensions: Vec<String>,
    /// Prefix of the "suggest an edit" link; the fragment path is appended
    pub edit_base_url: String,
    /// Prefix of contributor profile links
    pub profile_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            materials_dir: PathBuf::from("materials"),
            output: PathBuf::from("all_materials.yml"),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            edit_base_url:
                "https://github.com/cumbucadev/curadoria-coletiva/edit/main/curadoria-coletiva"
                    .to_string(),
            profile_base_url: "https://github.com".to_string(),
        }
    }
}

impl Config {
    /// Load `curadoria.yaml` from `root`, falling back to defaults when absent
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            tracing::debug!("No {} in {:?}, using defaults", CONFIG_FILE, root);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| Error::FileReadError {
            path: path.clone(),
            source,
        })?;
        Self::parse(&content).map_err(|message| Error::ConfigParse { path, message })
    }

    fn parse(content: &str) -> std::result::Result<Self, String> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }
}
