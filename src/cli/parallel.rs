/// Parallel extraction engine for dataset builds
///
/// Pages are independent and the extractor is read-only after construction,
/// so a Rayon pool maps straight over the task list. The only shared state
/// is the progress counter.
use anyhow::{anyhow, Result};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tracing::warn;

use crate::cli::progress::ProgressReporter;
use crate::dataset::PageTask;
use crate::engine::{FeatureExtractor, PageError};
use crate::extractors::base::FeatureRecord;
use crate::extractors::html::HtmlError;

/// Configuration for parallel extraction
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Number of parallel threads (defaults to CPU count)
    pub num_threads: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            num_threads: num_cpus::get(),
        }
    }
}

/// Rows in task order plus the count of pages that had to be skipped.
pub struct BuildOutcome {
    pub rows: Vec<FeatureRecord>,
    pub skipped: usize,
}

/// Extract every task, skipping pages whose file is gone. No page failure
/// aborts the build.
pub fn extract_all(
    extractor: &FeatureExtractor,
    tasks: &[PageTask],
    config: &BuildConfig,
) -> Result<BuildOutcome> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.num_threads)
        .build()
        .map_err(|e| anyhow!("failed to build thread pool: {}", e))?;

    let reporter = Mutex::new(ProgressReporter::new(tasks.len()));
    let processed = AtomicUsize::new(0);

    let results: Vec<Option<FeatureRecord>> = pool.install(|| {
        tasks
            .par_iter()
            .map(|task| {
                let row = match extractor.extract_page(&task.path, &task.url, task.label) {
                    Ok(record) => Some(record),
                    Err(PageError::Html(HtmlError::NotFound(path))) => {
                        warn!(%path, "page file not found, skipping page");
                        None
                    }
                    Err(err) => {
                        warn!(
                            path = %task.path.display(),
                            error = %err,
                            "page extraction failed, skipping page"
                        );
                        None
                    }
                };
                let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
                if let Ok(mut reporter) = reporter.lock() {
                    reporter.report(done);
                }
                row
            })
            .collect()
    });

    let rows: Vec<FeatureRecord> = results.into_iter().flatten().collect();
    let skipped = tasks.len() - rows.len();
    if let Ok(reporter) = reporter.lock() {
        reporter.complete(rows.len(), skipped);
    }
    Ok(BuildOutcome { rows, skipped })
}
