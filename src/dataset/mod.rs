// Dataset Module
//
// Loads the labeled crawl manifests, resolves their entries against the
// stored page directories, and writes extracted records as CSV.

pub mod manifest;
pub mod writer;

pub use manifest::{load_benign, load_xssed, PageTask};
pub use writer::DatasetWriter;
