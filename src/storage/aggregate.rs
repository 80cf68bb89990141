//! Aggregate file
//!
//! The aggregate is the single machine-generated YAML file holding every
//! accepted material, in loader order. It is rebuilt from scratch on each
//! collect run and is the only input of the query engine.

use std::io::Write as _;
use std::path::Path;

use crate::error::{Error, Result};
use crate::schema::Material;

/// First line of every aggregate file
pub const GENERATED_HEADER: &str = "# auto-generated file, please don't change it\n\n";

/// Render materials as aggregate file content.
///
/// Output depends only on `materials`: struct field order fixes key order,
/// sets are ordered, and nothing time-dependent is embedded.
pub fn render(materials: &[Material]) -> Result<String> {
    let body = serde_yaml::to_string(materials).map_err(|e| Error::SerializeError {
        message: e.to_string(),
    })?;

    let mut content = String::with_capacity(GENERATED_HEADER.len() + body.len());
    content.push_str(GENERATED_HEADER);
    content.push_str(&body);
    Ok(content)
}

/// Write the aggregate to `path`, replacing any previous file atomically
pub fn write(path: &Path, materials: &[Material]) -> Result<()> {
    let content = render(materials)?;
    write_atomic(path, content.as_bytes())
}

/// Write through a temporary sibling file and rename it into place.
///
/// On failure the destination keeps its previous content.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let write_error = |source| Error::WriteError {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => std::path::PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent).map_err(write_error)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "aggregate".to_string());
    let tmp = parent.join(format!(".{}.tmp.{}", file_name, std::process::id()));

    let result = (|| {
        let mut file = std::fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        std::fs::rename(&tmp, path)
    })();

    if let Err(e) = result {
        let _ = std::fs::remove_file(&tmp);
        return Err(write_error(e));
    }

    Ok(())
}

/// Load an aggregate file back into materials
pub fn load(path: &Path) -> Result<Vec<Material>> {
    if !path.exists() {
        return Err(Error::AggregateNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| Error::FileReadError {
        path: path.to_path_buf(),
        source,
    })?;

    parse(&content).map_err(|e| Error::AggregateParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn parse(content: &str) -> std::result::Result<Vec<Material>, serde_yaml::Error> {
    let blank = content
        .lines()
        .all(|line| line.trim().is_empty() || line.trim_start().starts_with('#'));
    if blank {
        return Ok(Vec::new());
    }
    serde_yaml::from_str(content)
}
