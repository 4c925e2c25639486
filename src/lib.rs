// xssvec - XSS Page Feature Extraction Library
//!
//! Turns a scraped web page (stored HTML file plus its source URL) into a
//! fixed-schema feature record for training a binary XSS classifier. Every
//! JavaScript execution vector in the markup is located, statically analyzed
//! with a tolerant parser, reduced to page level, and merged with lexical
//! URL features.

pub mod aggregate;
pub mod cli;
pub mod dataset;
pub mod engine;
pub mod extractors;

#[cfg(test)]
pub mod tests;

// Re-export common types
pub use engine::{FeatureExtractor, Label, PageError};
pub use extractors::base::{FeatureCatalog, FeatureRecord, FeatureValue, FragmentFeatures};
