// Dataset layer tests

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::cli::{extract_all, BuildConfig};
use crate::dataset::{load_benign, load_xssed, DatasetWriter, PageTask};
use crate::engine::{FeatureExtractor, Label};
use crate::extractors::base::FeatureCatalog;

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create dirs");
    }
    let mut file = std::fs::File::create(path).expect("create file");
    file.write_all(content.as_bytes()).expect("write file");
}

#[test]
fn test_benign_manifest_skips_missing_pages() {
    let dir = tempfile::tempdir().expect("temp dir");
    let pages = dir.path().join("subsample");
    write_file(&pages.join("aaa"), "<p>stored</p>");

    let manifest = dir.path().join("randomwalk.json");
    write_file(
        &manifest,
        r#"[
            {"file_path": "html/randomsample/full/aaa", "url": "http://a.com/"},
            {"file_path": "html/randomsample/full/bbb", "url": "http://b.com/"}
        ]"#,
    );

    let tasks = load_benign(&manifest, &pages).expect("manifest loads");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].path, pages.join("aaa"));
    assert_eq!(tasks[0].url, "http://a.com/");
    assert_eq!(tasks[0].label, Label::Benign);
}

#[test]
fn test_xssed_manifest_resolves_first_mirrored_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let pages = dir.path().join("xssed");
    write_file(&pages.join("full/ccc"), "<p>mirror</p>");

    let manifest = dir.path().join("xssed.json");
    write_file(
        &manifest,
        r#"[
            {"url": "http://victim.com/", "category": "XSS", "files": [{"path": "full/ccc"}]},
            {"url": "http://broken-mirror.com/", "category": "XSS", "files": []}
        ]"#,
    );

    let tasks = load_xssed(&manifest, &pages).expect("manifest loads");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].path, pages.join("full/ccc"));
    assert_eq!(tasks[0].label, Label::Xss);
}

#[test]
fn test_build_skips_vanished_pages_without_aborting() {
    let dir = tempfile::tempdir().expect("temp dir");
    let stored = dir.path().join("page.html");
    write_file(&stored, "<script>alert(1)</script>");

    let tasks = vec![
        PageTask {
            path: stored,
            url: "http://a.com/".to_string(),
            label: Label::Xss,
        },
        PageTask {
            path: PathBuf::from("/nonexistent/vanished.html"),
            url: "http://b.com/".to_string(),
            label: Label::Benign,
        },
    ];

    let extractor = FeatureExtractor::with_defaults();
    let outcome = extract_all(&extractor, &tasks, &BuildConfig { num_threads: 2 })
        .expect("build completes");
    assert_eq!(outcome.rows.len(), 1);
    assert_eq!(outcome.skipped, 1);
    assert_eq!(outcome.rows[0].count("js_method_alert"), 1);
}

#[test]
fn test_csv_header_matches_schema() {
    let dir = tempfile::tempdir().expect("temp dir");
    let page = dir.path().join("page.html");
    write_file(&page, "<p>hi</p>");
    let output = dir.path().join("data.csv");

    let extractor = FeatureExtractor::with_defaults();
    let record = extractor
        .extract_page(&page, "http://a.com/", Label::Benign)
        .expect("page extracts");

    let schema = FeatureCatalog::default().schema();
    let mut writer = DatasetWriter::create(&output, schema.clone()).expect("writer opens");
    writer.write(&record).expect("row writes");
    writer.finish().expect("flush");

    let text = std::fs::read_to_string(&output).expect("read back");
    let mut lines = text.lines();
    let header: Vec<&str> = lines.next().expect("header line").split(',').collect();
    let row: Vec<&str> = lines.next().expect("data line").split(',').collect();
    assert_eq!(header.len(), schema.len());
    assert_eq!(row.len(), schema.len());
    // sorted schema puts the label first
    assert_eq!(header[0], "class");
    assert_eq!(row[0], "0");
    assert!(lines.next().is_none());
}
