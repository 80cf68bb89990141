//! Fragment loader
//!
//! A fragment is one contributor-authored YAML file holding a list of
//! material entries. Fragments live side by side in one directory:
//!
//! ```text
//! /materials/
//!   python.yml
//!   web.yaml
//! ```
//!
//! The loader walks that directory in sorted filename order and yields one
//! [`RawRecord`] per entry. A file that cannot be read or parsed yields a
//! single error item in place of its records, so one broken fragment never
//! hides the others.

use serde_yaml::Value;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Extensions recognized when no others are configured
pub const DEFAULT_EXTENSIONS: &[&str] = &["yml", "yaml"];

/// One unvalidated fragment entry
#[derive(Debug, Clone)]
pub struct RawRecord {
    /// `<directory>/<file>` of the fragment
    pub source_path: String,
    /// 1-based position of the entry within its fragment
    pub position: usize,
    pub value: Value,
}

/// Fragment directory reader
#[derive(Debug, Clone)]
pub struct Loader {
    dir: PathBuf,
    extensions: Vec<String>,
}

impl Loader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Replace the recognized extensions (compared case-insensitively)
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// List fragment files in sorted filename order
    pub fn fragment_files(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.is_dir() {
            return Err(Error::MaterialsDirNotFound {
                path: self.dir.clone(),
            });
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| Error::MaterialsDirUnreadable {
                path: self.dir.clone(),
                message: e.to_string(),
            })?;
            let path = entry.path();
            if path.is_file() && self.recognizes(path) {
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }

    /// Open a lazy record stream over every fragment file
    pub fn records(&self) -> Result<Records> {
        let files = self.fragment_files()?;
        tracing::debug!("Found {} fragment file(s) in {:?}", files.len(), self.dir);

        Ok(Records {
            dir_name: directory_name(&self.dir),
            files: files.into_iter(),
            pending: Vec::new().into_iter(),
            stats: LoadStats::default(),
        })
    }

    fn recognizes(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
            .unwrap_or(false)
    }
}

/// Counters for the files a [`Records`] stream has visited
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub files_read: usize,
    pub files_skipped: usize,
}

/// Lazy stream of fragment entries, file by file
///
/// Each fragment is read and parsed only when the stream reaches it.
#[derive(Debug)]
pub struct Records {
    dir_name: String,
    files: std::vec::IntoIter<PathBuf>,
    pending: std::vec::IntoIter<RawRecord>,
    stats: LoadStats,
}

impl Records {
    pub fn stats(&self) -> LoadStats {
        self.stats
    }
}

impl Iterator for Records {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.pending.next() {
                return Some(Ok(record));
            }

            let path = self.files.next()?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let source_path = format!("{}/{}", self.dir_name, file_name);

            match read_fragment(&path, &source_path) {
                Ok(records) => {
                    self.stats.files_read += 1;
                    self.pending = records.into_iter();
                }
                Err(e) => {
                    self.stats.files_skipped += 1;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Read and parse one fragment file
pub fn read_fragment(path: &Path, source_path: &str) -> Result<Vec<RawRecord>> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::FragmentParse {
        source_path: source_path.to_string(),
        message: e.to_string(),
    })?;
    parse_fragment(&content, source_path)
}

/// Parse fragment content into raw records
pub fn parse_fragment(content: &str, source_path: &str) -> Result<Vec<RawRecord>> {
    let blank = content.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    });
    if blank {
        tracing::warn!("Fragment {} is empty", source_path);
        return Ok(Vec::new());
    }

    let parse_error = |e: serde_yaml::Error| Error::FragmentParse {
        source_path: source_path.to_string(),
        message: e.to_string(),
    };
    let mut value: Value = serde_yaml::from_str(content).map_err(parse_error)?;
    // Contributors share fields between entries with `<<: *anchor`
    value.apply_merge().map_err(parse_error)?;

    let entries = match value {
        Value::Null => {
            tracing::warn!("Fragment {} has no entries", source_path);
            Vec::new()
        }
        Value::Sequence(entries) => entries,
        _ => {
            return Err(Error::FragmentParse {
                source_path: source_path.to_string(),
                message: "expected a list of materials at the top level".to_string(),
            })
        }
    };

    Ok(entries
        .into_iter()
        .enumerate()
        .map(|(i, value)| RawRecord {
            source_path: source_path.to_string(),
            position: i + 1,
            value,
        })
        .collect())
}

/// Last component of the fragment directory, resolving `.` and `..`
fn directory_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .or_else(|| {
            dir.canonicalize()
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        })
        .unwrap_or_default()
}
