// Schema stability tests
//
// The record key set is a function of the catalog alone; two pages with
// nothing in common must produce identical schemas, or the CSV falls apart.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::PathBuf;

use crate::engine::{FeatureExtractor, Label, PageError};
use crate::extractors::html::HtmlError;

fn write_page(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("create page");
    file.write_all(content.as_bytes()).expect("write page");
    path
}

#[test]
fn test_key_set_is_identical_across_pages() {
    let dir = tempfile::tempdir().expect("temp dir");
    let rich = write_page(
        &dir,
        "rich.html",
        r#"<script>document.write("x")</script><a href="javascript:alert(1)">x</a><div onclick="go()">y</div>"#,
    );
    let bare = write_page(&dir, "bare.html", "<p>hello</p>");

    let extractor = FeatureExtractor::with_defaults();
    let rich_record = extractor
        .extract_page(&rich, "http://evil.com/?q=<<script>", Label::Xss)
        .expect("rich page extracts");
    let bare_record = extractor
        .extract_page(&bare, "http://example.com/", Label::Benign)
        .expect("bare page extracts");

    let rich_keys: BTreeSet<_> = rich_record.keys().map(str::to_string).collect();
    let bare_keys: BTreeSet<_> = bare_record.keys().map(str::to_string).collect();
    assert_eq!(rich_keys, bare_keys);

    let schema: BTreeSet<_> = extractor.schema().into_iter().collect();
    assert_eq!(rich_keys, schema);

    assert_eq!(rich_record.count("class"), 1);
    assert_eq!(bare_record.count("class"), 0);
}

#[test]
fn test_zero_javascript_page_still_has_full_js_block() {
    let dir = tempfile::tempdir().expect("temp dir");
    let page = write_page(&dir, "plain.html", "<div><p>no scripts at all</p></div>");

    let extractor = FeatureExtractor::with_defaults();
    let record = extractor
        .extract_page(&page, "http://example.com/", Label::Benign)
        .expect("plain page extracts");

    assert_eq!(record.count("js_min_length"), 0);
    assert_eq!(record.count("js_min_function_calls"), 0);
    assert_eq!(record.count("js_string_max_length"), 0);
    assert_eq!(record.count("js_dom_document"), 0);
    assert!(!record.flag("js_file"));
}

#[test]
fn test_anchor_payload_end_to_end() {
    let dir = tempfile::tempdir().expect("temp dir");
    let page = write_page(&dir, "anchor.html", r#"<a href="javascript:alert(1)">x</a>"#);

    let extractor = FeatureExtractor::with_defaults();
    let record = extractor
        .extract_page(&page, "http://example.com/", Label::Xss)
        .expect("page extracts");

    assert_eq!(record.count("js_method_alert"), 1);
    // single fragment, so the call-count floor is that fragment's own count
    assert_eq!(record.count("js_min_function_calls"), 1);
}

#[test]
fn test_missing_page_is_a_distinct_signal() {
    let extractor = FeatureExtractor::with_defaults();
    let err = extractor
        .extract_page(
            std::path::Path::new("/nonexistent/gone.html"),
            "http://example.com/",
            Label::Benign,
        )
        .expect_err("page is gone");
    assert!(matches!(err, PageError::Html(HtmlError::NotFound(_))));
}

#[test]
fn test_unparsable_fragment_does_not_fail_the_page() {
    let dir = tempfile::tempdir().expect("temp dir");
    // One pathological fragment, one healthy one: the page keeps the healthy
    // fragment's features.
    let deep = format!(
        "<script>{}1{}</script><script>alert(1)</script>",
        "(".repeat(600),
        ")".repeat(600)
    );
    let page = write_page(&dir, "broken.html", &deep);

    let extractor = FeatureExtractor::with_defaults();
    let record = extractor
        .extract_page(&page, "http://example.com/", Label::Xss)
        .expect("page still extracts");
    assert_eq!(record.count("js_method_alert"), 1);
    assert_eq!(record.count("js_min_length"), 8);
}
