// CLI Support Module
//
// Progress reporting and the parallel dataset build loop used by the binary.

pub mod parallel;
pub mod progress;

pub use parallel::{extract_all, BuildConfig, BuildOutcome};
pub use progress::ProgressReporter;
