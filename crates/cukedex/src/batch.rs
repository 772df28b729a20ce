//! Parsing many feature files on a bounded worker pool.
//!
//! Files are independent, so each one is parsed on its own `rayon` task with
//! its own parse state. Results are collected in input order regardless of
//! completion order, which keeps reports deterministic.
//!
//! Outside strict mode a failing file is logged and recorded in
//! [`BatchReport::failures`] while the rest of the batch carries on. In
//! strict mode the earliest failing file (by input position) is returned as
//! an error, and files after it are no longer started once it is known.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use camino::Utf8PathBuf;
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::discovery::DEFAULT_ROOT;
use crate::filter::TagFilter;
use crate::node::Node;
use crate::parser::{FeatureError, parse_feature_file};

/// How a batch is run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchOptions {
    /// Propagate the first failure instead of collecting it.
    pub strict: bool,
    /// Worker threads; `0` uses the available parallelism.
    pub jobs: usize,
    /// Directory marker used to relativise feature paths.
    pub root: String,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            strict: false,
            jobs: 0,
            root: DEFAULT_ROOT.to_string(),
        }
    }
}

/// A file that could not be turned into a tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    /// Root-relative path of the file.
    pub path: Utf8PathBuf,
    /// Line at which parsing stopped, if the file was read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// Human-readable reason.
    pub message: String,
}

impl From<&FeatureError> for FileFailure {
    fn from(err: &FeatureError) -> Self {
        let message = match err {
            FeatureError::Read { source, .. } => source.to_string(),
            FeatureError::Parse { source, .. } => source.to_string(),
        };
        Self {
            path: err.path().to_path_buf(),
            line: err.line(),
            message,
        }
    }
}

/// Trees and failures produced by a batch, both in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Feature trees of every file that parsed.
    pub features: Vec<Node>,
    /// Files that failed, outside strict mode.
    pub failures: Vec<FileFailure>,
}

/// Errors that abort a whole batch.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The worker pool could not be created.
    #[error("failed to start worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
    /// A file failed while running in strict mode.
    #[error(transparent)]
    Feature(#[from] FeatureError),
}

enum Outcome {
    Parsed(Node),
    Failed(FeatureError),
    Skipped,
}

/// Parse `paths` with `filter`, honouring `options`.
///
/// # Errors
///
/// Returns [`BatchError::Pool`] if the worker pool cannot be built and, in
/// strict mode, [`BatchError::Feature`] for the earliest failing file.
pub fn parse_files(
    paths: &[PathBuf],
    filter: &TagFilter,
    options: &BatchOptions,
) -> Result<BatchReport, BatchError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.jobs)
        .build()?;
    let first_failure = AtomicUsize::new(usize::MAX);

    let outcomes: Vec<Outcome> = pool.install(|| {
        paths
            .par_iter()
            .enumerate()
            .map(|(index, path)| {
                if options.strict && index > first_failure.load(Ordering::Acquire) {
                    return Outcome::Skipped;
                }
                parse_feature_file(path, filter, &options.root).map_or_else(
                    |err| {
                        first_failure.fetch_min(index, Ordering::AcqRel);
                        Outcome::Failed(err)
                    },
                    Outcome::Parsed,
                )
            })
            .collect()
    });

    let mut report = BatchReport::default();
    for outcome in outcomes {
        match outcome {
            Outcome::Parsed(feature) => report.features.push(feature),
            Outcome::Failed(err) if options.strict => return Err(err.into()),
            Outcome::Failed(err) => {
                tracing::warn!(
                    file = %err.path(),
                    line = err.line(),
                    error = %err,
                    "skipping feature file"
                );
                report.failures.push(FileFailure::from(&err));
            }
            Outcome::Skipped => {}
        }
    }
    tracing::info!(
        files = paths.len(),
        parsed = report.features.len(),
        failed = report.failures.len(),
        "batch complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_are_lenient() {
        let options = BatchOptions::default();
        assert!(!options.strict);
        assert_eq!(options.jobs, 0);
        assert_eq!(options.root, "features");
    }

    #[expect(clippy::expect_used, reason = "tests use explicit failures for clarity")]
    #[test]
    fn empty_batch_is_empty_report() {
        let report = parse_files(&[], &TagFilter::unfiltered(), &BatchOptions::default())
            .expect("empty batch");
        assert!(report.features.is_empty());
        assert!(report.failures.is_empty());
    }

    #[test]
    fn failure_records_line_and_message() {
        let err = FeatureError::Parse {
            path: Utf8PathBuf::from("features/bad.feature"),
            source: crate::parser::ParseError::DuplicateFeature { line: 4 },
        };
        let failure = FileFailure::from(&err);
        assert_eq!(failure.path, "features/bad.feature");
        assert_eq!(failure.line, Some(4));
        assert_eq!(failure.message, "line 4: only one feature header is allowed per file");
    }
}
