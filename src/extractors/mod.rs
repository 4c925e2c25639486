// Feature Extractors Module
//
// Each extractor covers one surface of a page: the JavaScript fragments it
// carries, the HTML structure around them, and the URL it was served from.
// They share the flat record and catalog types in `base`.

pub mod base;
pub mod html;
pub mod javascript;
pub mod tree;
pub mod url;

// Re-export the base types
pub use base::{FeatureCatalog, FeatureRecord, FeatureValue, FragmentFeatures};
