// HTML Vector Extractor
//
// Finds every JavaScript-bearing location in a document and counts the
// structural names the catalog asks for. Six vectors carry code: inline
// <script> bodies, javascript: pseudo-protocol values on anchor href, form
// action, iframe src and frame src, and the value of any event handler
// attribute. html5ever's tree builder recovers from broken markup and
// decodes character references during parsing, so attribute-borne fragments
// arrive entity-decoded.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use crate::extractors::base::{FeatureCatalog, FeatureRecord};

#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    /// The stored page is gone. The caller must skip the page entirely; a
    /// missing page is not a zero-featured page.
    #[error("page file not found: {0}")]
    NotFound(String),
    #[error("failed to read page file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Structural features plus the ordered JavaScript fragments of a document.
#[derive(Debug, Clone)]
pub struct HtmlExtraction {
    pub features: FeatureRecord,
    pub fragments: Vec<String>,
}

/// Extracts structural counts and JavaScript vectors from HTML documents.
/// Selectors and the pseudo-protocol pattern are compiled once at
/// construction.
pub struct HtmlAnalyzer {
    catalog: FeatureCatalog,
    all_elements: Selector,
    scripts: Selector,
    anchors: Selector,
    forms: Selector,
    iframes: Selector,
    frames: Selector,
    js_protocol: Regex,
}

impl HtmlAnalyzer {
    pub fn new(catalog: FeatureCatalog) -> Self {
        Self {
            catalog,
            all_elements: fixed_selector("*"),
            scripts: fixed_selector("script"),
            anchors: fixed_selector("a[href]"),
            forms: fixed_selector("form[action]"),
            iframes: fixed_selector("iframe[src]"),
            frames: fixed_selector("frame[src]"),
            // Case-insensitive, leading whitespace allowed, newlines allowed
            // before and inside the captured code.
            js_protocol: Regex::new(r"(?is)^\s*javascript:(.*)")
                .expect("pseudo-protocol pattern is valid"),
        }
    }

    /// Read and extract one stored page. Undecodable byte sequences become
    /// replacement characters; a broken charset never discards a page.
    pub fn extract_file(&self, path: &Path) -> Result<HtmlExtraction, HtmlError> {
        let bytes = std::fs::read(path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => HtmlError::NotFound(path.display().to_string()),
            _ => HtmlError::Io {
                path: path.display().to_string(),
                source: err,
            },
        })?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(self.extract(&text, &path.display().to_string()))
    }

    /// Extract from already-decoded document text.
    pub fn extract(&self, document: &str, origin: &str) -> HtmlExtraction {
        let dom = Html::parse_document(document);
        let mut features = FeatureRecord::new();

        for tag in &self.catalog.tags {
            features.set_count(format!("html_tag_{tag}"), 0);
        }
        for attr in &self.catalog.attrs {
            features.set_count(format!("html_attr_{attr}"), 0);
        }
        for event in &self.catalog.event_handler_attrs {
            features.set_count(format!("html_event_{event}"), 0);
        }

        // Structural pass: tag, attribute and event handler counts, plus the
        // event handler fragments grouped per attribute name.
        let mut event_fragments: BTreeMap<&str, Vec<String>> = self
            .catalog
            .event_handler_attrs
            .iter()
            .map(|name| (name.as_str(), Vec::new()))
            .collect();
        for element in dom.select(&self.all_elements) {
            let value = element.value();
            if self.catalog.tags.iter().any(|t| t == value.name()) {
                features.bump(&format!("html_tag_{}", value.name()));
            }
            for (attr_name, attr_value) in value.attrs() {
                if self.catalog.attrs.iter().any(|a| a == attr_name) {
                    features.bump(&format!("html_attr_{attr_name}"));
                }
                if let Some(list) = event_fragments.get_mut(attr_name) {
                    features.bump(&format!("html_event_{attr_name}"));
                    list.push(attr_value.to_string());
                }
            }
        }

        // Vector pass, in a fixed order: inline scripts, then the four
        // pseudo-protocol attributes, then event handler values.
        let mut fragments = Vec::new();
        let mut has_script_file = false;
        for element in dom.select(&self.scripts) {
            if element.value().attr("src").is_some() {
                has_script_file = true;
                continue;
            }
            match sole_text_child(&element) {
                Some(code) => fragments.push(code),
                None => info!(origin, "skipping ill-formed <script> without a text body"),
            }
        }
        self.push_pseudo_protocol(&dom, &self.anchors, "href", &mut fragments);
        self.push_pseudo_protocol(&dom, &self.forms, "action", &mut fragments);
        self.push_pseudo_protocol(&dom, &self.iframes, "src", &mut fragments);
        self.push_pseudo_protocol(&dom, &self.frames, "src", &mut fragments);
        for name in &self.catalog.event_handler_attrs {
            if let Some(list) = event_fragments.get_mut(name.as_str()) {
                fragments.append(list);
            }
        }

        features.set_flag("js_file", has_script_file);
        features.set_count("html_length", document.chars().count() as u64);

        HtmlExtraction {
            features,
            fragments,
        }
    }

    /// Collect `javascript:` payloads from one attribute over one selector.
    fn push_pseudo_protocol(
        &self,
        dom: &Html,
        selector: &Selector,
        attr: &str,
        fragments: &mut Vec<String>,
    ) {
        for element in dom.select(selector) {
            let Some(value) = element.value().attr(attr) else {
                continue;
            };
            if let Some(captures) = self.js_protocol.captures(value) {
                fragments.push(captures[1].to_string());
            }
        }
    }
}

/// The single text child of an element, if that is all it contains. A script
/// wrapping child markup (or nothing at all) has no usable body.
fn sole_text_child(element: &ElementRef) -> Option<String> {
    let mut children = element.children();
    let only = children.next()?;
    if children.next().is_some() {
        return None;
    }
    only.value().as_text().map(|text| text.text.to_string())
}

/// Selectors over fixed names; parse failure would be a typo in this file.
fn fixed_selector(css: &str) -> Selector {
    Selector::parse(css).expect("fixed selector is valid")
}
