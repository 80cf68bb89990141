//! Validation runs
//!
//! One loop drives every record through [`validate_record`]; a [`RunPolicy`]
//! decides what a rejection means:
//!
//! - [`Collect`] logs the rejection, skips the record and always reaches an
//!   aggregate.
//! - [`Strict`] stops the run at the first rejection and produces nothing.

use crate::error::{Error, Result};
use crate::schema::Material;
use crate::storage::fragment::RawRecord;
use crate::validation::{validate_record, TitleSet};

/// Counters for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub records_seen: usize,
    pub accepted: usize,
    pub rejected: usize,
    /// Fragments parsed successfully; filled in by callers that own the loader
    pub files_read: usize,
    pub files_skipped: usize,
}

/// What to do with accepted and rejected records
pub trait RunPolicy {
    type Output;

    fn accept(&mut self, material: Material);

    /// Handle a rejected record or unreadable fragment. Returning an error
    /// ends the run.
    fn reject(&mut self, error: Error) -> Result<()>;

    fn finish(self, stats: RunStats) -> Self::Output;
}

/// Drive `records` through validation under `policy`
pub fn run<I, P>(records: I, mut policy: P) -> Result<P::Output>
where
    I: IntoIterator<Item = Result<RawRecord>>,
    P: RunPolicy,
{
    let mut titles = TitleSet::new();
    let mut stats = RunStats::default();

    for item in records {
        let outcome = item.and_then(|record| {
            stats.records_seen += 1;
            validate_record(&record, &mut titles)
        });

        match outcome {
            Ok(material) => {
                stats.accepted += 1;
                policy.accept(material);
            }
            Err(error) => {
                if matches!(error, Error::FragmentParse { .. }) {
                    stats.files_skipped += 1;
                } else {
                    stats.rejected += 1;
                }
                policy.reject(error)?;
            }
        }
    }

    tracing::info!(
        "Validated {} record(s): {} accepted, {} rejected, {} fragment(s) skipped",
        stats.records_seen,
        stats.accepted,
        stats.rejected,
        stats.files_skipped
    );

    Ok(policy.finish(stats))
}

/// Best-effort policy used to build the browsable dataset
#[derive(Debug, Default)]
pub struct Collect {
    materials: Vec<Material>,
    skipped: Vec<Error>,
}

/// Result of a collect run
#[derive(Debug)]
pub struct CollectReport {
    /// Accepted materials in loader order
    pub materials: Vec<Material>,
    /// Every skipped record or fragment, in the order encountered
    pub skipped: Vec<Error>,
    pub stats: RunStats,
}

impl CollectReport {
    /// Number of fragments that could not be parsed
    pub fn parse_errors(&self) -> usize {
        self.skipped
            .iter()
            .filter(|e| matches!(e, Error::FragmentParse { .. }))
            .count()
    }
}

impl RunPolicy for Collect {
    type Output = CollectReport;

    fn accept(&mut self, material: Material) {
        self.materials.push(material);
    }

    fn reject(&mut self, error: Error) -> Result<()> {
        if !error.is_recoverable() {
            return Err(error);
        }
        tracing::warn!("Skipping: {}", error);
        self.skipped.push(error);
        Ok(())
    }

    fn finish(self, stats: RunStats) -> CollectReport {
        CollectReport {
            materials: self.materials,
            skipped: self.skipped,
            stats,
        }
    }
}

/// Release-gating policy: any rejection fails the run
#[derive(Debug, Default)]
pub struct Strict;

impl RunPolicy for Strict {
    type Output = RunStats;

    fn accept(&mut self, _material: Material) {}

    fn reject(&mut self, error: Error) -> Result<()> {
        Err(error)
    }

    fn finish(self, stats: RunStats) -> RunStats {
        stats
    }
}
