// Page Feature Engine
//
// Composition root of the extraction pipeline. One extractor is built from a
// catalog (selectors and patterns compiled up front) and then shared
// read-only across worker threads: extraction is stateless between pages.

use std::path::Path;

use crate::aggregate::aggregate_fragments;
use crate::extractors::base::{FeatureCatalog, FeatureRecord, FragmentFeatures};
use crate::extractors::html::{HtmlAnalyzer, HtmlError};
use crate::extractors::javascript::JavaScriptAnalyzer;
use crate::extractors::url::UrlAnalyzer;

/// Binary page label, recorded in the `class` feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Benign,
    Xss,
}

impl Label {
    pub fn as_count(self) -> u64 {
        match self {
            Label::Benign => 0,
            Label::Xss => 1,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error(transparent)]
    Html(#[from] HtmlError),
}

/// Extracts one fixed-schema feature record per page.
pub struct FeatureExtractor {
    catalog: FeatureCatalog,
    javascript: JavaScriptAnalyzer,
    html: HtmlAnalyzer,
    url: UrlAnalyzer,
}

impl FeatureExtractor {
    pub fn new(catalog: FeatureCatalog) -> Self {
        Self {
            javascript: JavaScriptAnalyzer::new(catalog.clone()),
            html: HtmlAnalyzer::new(catalog.clone()),
            url: UrlAnalyzer::new(),
            catalog,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(FeatureCatalog::default())
    }

    pub fn catalog(&self) -> &FeatureCatalog {
        &self.catalog
    }

    /// The fixed key set every page record carries.
    pub fn schema(&self) -> Vec<String> {
        self.catalog.schema()
    }

    /// Extract the full feature record for one stored page.
    ///
    /// A fragment the parser cannot salvage is dropped from aggregation (the
    /// page still succeeds); a missing page file surfaces as
    /// `HtmlError::NotFound` and the page must be skipped by the caller.
    pub fn extract_page(
        &self,
        path: &Path,
        url: &str,
        label: Label,
    ) -> Result<FeatureRecord, PageError> {
        let origin = path.display().to_string();
        let extraction = self.html.extract_file(path)?;

        let mut fragment_features: Vec<FragmentFeatures> = Vec::new();
        for fragment in &extraction.fragments {
            if let Ok(features) = self.javascript.analyze(fragment, Some(&origin)) {
                fragment_features.push(features);
            }
            // failures are warn-logged by the analyzer and excluded here
        }
        if fragment_features.is_empty() {
            // A page can carry zero scripts, or only scripts the exploit
            // broke beyond recovery; the JavaScript block must still be
            // fully populated. Aggregate over the empty-fragment record.
            fragment_features.push(
                self.javascript
                    .analyze("", Some(&origin))
                    .unwrap_or_default(),
            );
        }

        let mut record = FeatureRecord::new();
        record.set_count("class", label.as_count());
        record.merge(self.url.analyze(url));
        record.merge(extraction.features);
        record.merge(aggregate_fragments(&self.catalog, &fragment_features));
        Ok(record)
    }
}
