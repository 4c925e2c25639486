// Page Aggregator
//
// Folds per-fragment JavaScript records into the page-level feature block.
// The reduction is deliberately asymmetric: sensitive-name counts take the
// maximum across fragments, while length, declaration and call counts take
// the minimum. Both directions are domain signals and neither can replace
// the other.

use crate::extractors::base::{FeatureCatalog, FeatureRecord, FragmentFeatures};

/// Reduce fragment records to the page-level `js_*` block. The caller hands
/// in at least one record (the synthesized empty-fragment record when a page
/// carries no parsable JavaScript); an empty slice reduces to the same
/// all-zero block that record would produce.
pub fn aggregate_fragments(
    catalog: &FeatureCatalog,
    fragments: &[FragmentFeatures],
) -> FeatureRecord {
    let mut page = FeatureRecord::new();

    for name in &catalog.dom_objects {
        let value = fragments.iter().map(|f| f.dom(name)).max().unwrap_or(0);
        page.set_count(format!("js_dom_{name}"), value);
    }
    for name in &catalog.properties {
        let value = fragments.iter().map(|f| f.prop(name)).max().unwrap_or(0);
        page.set_count(format!("js_prop_{name}"), value);
    }
    for name in &catalog.methods {
        let value = fragments.iter().map(|f| f.method(name)).max().unwrap_or(0);
        page.set_count(format!("js_method_{name}"), value);
    }

    page.set_count(
        "js_min_length",
        fragments.iter().map(|f| f.source_len).min().unwrap_or(0),
    );
    page.set_count(
        "js_min_define_function",
        fragments
            .iter()
            .map(|f| f.define_function)
            .min()
            .unwrap_or(0),
    );
    page.set_count(
        "js_min_function_calls",
        fragments
            .iter()
            .map(|f| f.function_calls)
            .min()
            .unwrap_or(0),
    );
    page.set_count(
        "js_string_max_length",
        fragments
            .iter()
            .map(|f| f.string_max_len)
            .max()
            .unwrap_or(0),
    );

    page
}
