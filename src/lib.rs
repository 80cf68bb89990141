//! Curadoria - collaborative catalog of learning materials
//!
//! Contributors add materials as small YAML fragment files; a batch run
//! validates every entry and regenerates one aggregate file that the query
//! engine searches.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           Catalog                               │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  materials/*.yml                                                │
//! │         │                                                       │
//! │         ▼                                                       │
//! │  ┌─────────────────┐    ┌─────────────────────────────────────┐ │
//! │  │ Fragment Loader │───▶│ Validation (registry + title set)   │ │
//! │  └─────────────────┘    └──────────────────┬──────────────────┘ │
//! │                                            │                    │
//! │                          Collect / Strict run policy            │
//! │                                            │                    │
//! │                                            ▼                    │
//! │  ┌──────────────────────────────────────────────────────────┐   │
//! │  │              Aggregate writer (all_materials.yml)        │   │
//! │  └──────────────────────────────┬───────────────────────────┘   │
//! │                                 │                               │
//! │                                 ▼                               │
//! │  ┌──────────────────────────────────────────────────────────┐   │
//! │  │     Query Engine (free text, filters, sort, facets)      │   │
//! │  └──────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod query;
pub mod render;
pub mod schema;
pub mod storage;
pub mod validation;

pub use config::Config;
pub use error::{Error, Result};
pub use pipeline::{CollectReport, RunStats};
pub use query::{Query, SearchResult};
pub use schema::{Comment, Material};

use std::path::{Path, PathBuf};

use pipeline::{Collect, RunPolicy, Strict};
use storage::{aggregate, fragment::Loader};

/// The main catalog handle
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Root path of the catalog
    pub root: PathBuf,
    pub config: Config,
}

impl Catalog {
    /// Open the catalog at `root`, reading `curadoria.yaml` if present
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let config = Config::load(&root)?;
        Ok(Self { root, config })
    }

    pub fn with_config(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Resolve a configured path against the catalog root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn materials_dir(&self) -> PathBuf {
        self.resolve(&self.config.materials_dir)
    }

    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.config.output)
    }

    fn loader(&self, materials: Option<&Path>) -> Loader {
        let dir = materials
            .map(|p| self.resolve(p))
            .unwrap_or_else(|| self.materials_dir());
        Loader::new(dir).with_extensions(&self.config.extensions)
    }

    fn run<P: RunPolicy>(&self, materials: Option<&Path>, policy: P) -> Result<(P::Output, usize)> {
        let loader = self.loader(materials);
        tracing::info!("Loading fragments from {:?}", loader.dir());

        let mut records = loader.records()?;
        let output = pipeline::run(records.by_ref(), policy)?;
        Ok((output, records.stats().files_read))
    }

    /// Best-effort aggregation: skip bad fragments and records, then
    /// regenerate the aggregate at `output` (or the configured path).
    pub fn collect(&self, materials: Option<&Path>, output: Option<&Path>) -> Result<CollectReport> {
        let (mut report, files_read) = self.run(materials, Collect::default())?;
        report.stats.files_read = files_read;

        let output = output
            .map(|p| self.resolve(p))
            .unwrap_or_else(|| self.output_path());
        aggregate::write(&output, &report.materials)?;

        tracing::info!(
            "Wrote {} material(s) to {:?}",
            report.materials.len(),
            output
        );
        Ok(report)
    }

    /// Strict gate: fail on the first problem and write nothing
    pub fn validate(&self, materials: Option<&Path>) -> Result<RunStats> {
        let (mut stats, files_read) = self.run(materials, Strict)?;
        stats.files_read = files_read;
        Ok(stats)
    }

    /// Load the aggregate for querying
    pub fn load(&self, aggregate: Option<&Path>) -> Result<Vec<Material>> {
        let path = aggregate
            .map(|p| self.resolve(p))
            .unwrap_or_else(|| self.output_path());
        aggregate::load(&path)
    }
}
