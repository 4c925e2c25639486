/// Progress reporting for long-running dataset builds
///
/// Provides user-friendly progress updates to stderr, leaving stdout
/// clean for piped output.
use std::time::Instant;

pub struct ProgressReporter {
    start_time: Instant,
    total_pages: usize,
    last_report: Instant,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new(total_pages: usize) -> Self {
        eprintln!("🚀 Starting extraction: {} pages", total_pages);
        let now = Instant::now();
        Self {
            start_time: now,
            total_pages,
            last_report: now,
        }
    }

    /// Report progress (throttled to avoid spam)
    pub fn report(&mut self, processed: usize) {
        // Throttle: only report every 100ms
        let now = Instant::now();
        if now.duration_since(self.last_report).as_millis() < 100 && processed < self.total_pages {
            return;
        }
        self.last_report = now;

        let elapsed = self.start_time.elapsed().as_secs_f64();
        let rate = if elapsed > 0.0 {
            processed as f64 / elapsed
        } else {
            0.0
        };

        let pct = if self.total_pages > 0 {
            (processed as f64 / self.total_pages as f64 * 100.0) as u32
        } else {
            0
        };

        eprintln!(
            "⚡ Progress: {}/{} ({}%) - {:.0} pages/sec",
            processed, self.total_pages, pct, rate
        );
    }

    /// Report completion
    pub fn complete(&self, rows: usize, skipped: usize) {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        let rate = if elapsed > 0.0 {
            self.total_pages as f64 / elapsed
        } else {
            0.0
        };

        eprintln!(
            "✅ Extraction complete: {} rows from {} pages in {:.2}s ({:.0} pages/sec, {} skipped)",
            rows, self.total_pages, elapsed, rate, skipped
        );
    }
}
