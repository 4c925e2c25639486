// Labeled Dataset Manifests
//
// Two JSON manifests drive a dataset build: a benign crawl sample
// (`[{file_path, url}, ...]`) and the xssed mirror dump
// (`[{url, category, files: [{path}, ...]}, ...]`). Manifest entries whose
// stored page is missing are skipped: the benign sample was subsampled after
// crawling and some mirrored pages were never downloaded, and a missing page
// must never become a zero-featured row.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::engine::Label;

/// Mirror categories that actually are cross-site scripting.
const XSS_CATEGORIES: [&str; 2] = ["XSS", "Script Insertion"];

#[derive(Debug, Deserialize)]
pub struct BenignEntry {
    pub file_path: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct XssedEntry {
    pub url: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub files: Vec<XssedFile>,
}

#[derive(Debug, Deserialize)]
pub struct XssedFile {
    pub path: String,
}

/// One page queued for extraction.
#[derive(Debug, Clone)]
pub struct PageTask {
    pub path: PathBuf,
    pub url: String,
    pub label: Label,
}

/// Load the benign manifest. Entries resolve by file name against
/// `pages_dir`; the manifest records paths from the original crawl layout,
/// the subsampled store keeps only the file names.
pub fn load_benign(manifest: &Path, pages_dir: &Path) -> Result<Vec<PageTask>> {
    let entries: Vec<BenignEntry> = read_manifest(manifest)?;
    let present = list_files(pages_dir)?;

    let mut tasks = Vec::new();
    let mut missing = 0usize;
    for entry in entries {
        let Some(name) = Path::new(&entry.file_path).file_name() else {
            continue;
        };
        let path = pages_dir.join(name);
        if !present.contains(&path) {
            missing += 1;
            continue;
        }
        tasks.push(PageTask {
            path,
            url: entry.url,
            label: Label::Benign,
        });
    }
    if missing > 0 {
        info!(
            missing,
            manifest = %manifest.display(),
            "benign entries without a stored page were skipped"
        );
    }
    Ok(tasks)
}

/// Load the xssed mirror manifest. The first mirrored file is the page.
pub fn load_xssed(manifest: &Path, pages_dir: &Path) -> Result<Vec<PageTask>> {
    let entries: Vec<XssedEntry> = read_manifest(manifest)?;
    let present = list_files(pages_dir)?;

    let mut tasks = Vec::new();
    let mut missing = 0usize;
    for entry in entries {
        let Some(first) = entry.files.first() else {
            info!(url = %entry.url, "skipping mirror entry with no stored page");
            continue;
        };
        if let Some(category) = &entry.category {
            if !XSS_CATEGORIES.contains(&category.as_str()) {
                warn!(
                    url = %entry.url,
                    category = %category,
                    "non-XSS vulnerability in an XSS-labeled manifest, check whether it should be removed"
                );
            }
        }
        let path = pages_dir.join(&first.path);
        if !present.contains(&path) {
            missing += 1;
            continue;
        }
        tasks.push(PageTask {
            path,
            url: entry.url,
            label: Label::Xss,
        });
    }
    if missing > 0 {
        info!(
            missing,
            manifest = %manifest.display(),
            "mirror entries without a stored page were skipped"
        );
    }
    Ok(tasks)
}

fn read_manifest<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading manifest {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing manifest {}", path.display()))
}

/// Every file under `dir`, for manifest membership checks.
fn list_files(dir: &Path) -> Result<HashSet<PathBuf>> {
    let mut files = HashSet::new();
    for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
        if entry.file_type().is_file() {
            files.insert(entry.path().to_path_buf());
        }
    }
    Ok(files)
}
