// Base Types for the Feature Extraction Pipeline
//
// Every extractor produces flat records keyed by stable feature names. The
// key set is derived from the catalog alone, never from page content, so the
// dataset writer can emit a fixed-schema CSV without a discovery pass.

use serde::Serialize;
use std::collections::BTreeMap;

/// A single feature value. Counts and lengths are `Count`, presence
/// indicators are `Flag`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Count(u64),
    Flag(bool),
}

impl FeatureValue {
    /// Numeric view: flags read as 0/1.
    pub fn as_count(&self) -> u64 {
        match self {
            FeatureValue::Count(n) => *n,
            FeatureValue::Flag(b) => u64::from(*b),
        }
    }

    /// Rendering used by the CSV writer.
    pub fn csv_field(&self) -> String {
        match self {
            FeatureValue::Count(n) => n.to_string(),
            FeatureValue::Flag(b) => b.to_string(),
        }
    }
}

/// Flat feature record. Keys are unique and iteration order is
/// deterministic, which is all the tabular output needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureRecord {
    values: BTreeMap<String, FeatureValue>,
}

impl FeatureRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_count(&mut self, key: impl Into<String>, value: u64) {
        self.values.insert(key.into(), FeatureValue::Count(value));
    }

    pub fn set_flag(&mut self, key: impl Into<String>, value: bool) {
        self.values.insert(key.into(), FeatureValue::Flag(value));
    }

    /// Increment an existing count key. Missing keys start at zero.
    pub fn bump(&mut self, key: &str) {
        let next = self.count(key) + 1;
        self.values.insert(key.to_string(), FeatureValue::Count(next));
    }

    pub fn get(&self, key: &str) -> Option<FeatureValue> {
        self.values.get(key).copied()
    }

    /// Numeric view of a key, zero when absent.
    pub fn count(&self, key: &str) -> u64 {
        self.get(key).map(|v| v.as_count()).unwrap_or(0)
    }

    pub fn flag(&self, key: &str) -> bool {
        matches!(self.get(key), Some(FeatureValue::Flag(true)))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, FeatureValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Fold another record in. Later keys win, but the pipeline only merges
    /// disjoint blocks (url_*, html_*, js_*).
    pub fn merge(&mut self, other: FeatureRecord) {
        self.values.extend(other.values);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Per-fragment JavaScript features. Created once per extracted fragment,
/// folded into the page record by the aggregator, never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FragmentFeatures {
    /// Character length of the fragment source.
    pub source_len: u64,
    /// Occurrences per catalog DOM object name.
    pub dom_counts: BTreeMap<String, u64>,
    /// Occurrences per catalog property name.
    pub prop_counts: BTreeMap<String, u64>,
    /// Occurrences per catalog method name.
    pub method_counts: BTreeMap<String, u64>,
    /// Named function declarations.
    pub define_function: u64,
    /// Call expressions plus function expressions.
    pub function_calls: u64,
    /// Longest collected string token, zero when none were collected.
    pub string_max_len: u64,
}

impl FragmentFeatures {
    /// A record with every catalog name present at zero. Bucket membership
    /// downstream is "the key exists", so initialization doubles as the
    /// classification whitelist.
    pub fn zeroed(catalog: &FeatureCatalog) -> Self {
        let zeros = |names: &[String]| {
            names
                .iter()
                .map(|n| (n.clone(), 0u64))
                .collect::<BTreeMap<_, _>>()
        };
        Self {
            dom_counts: zeros(&catalog.dom_objects),
            prop_counts: zeros(&catalog.properties),
            method_counts: zeros(&catalog.methods),
            ..Self::default()
        }
    }

    pub fn dom(&self, name: &str) -> u64 {
        self.dom_counts.get(name).copied().unwrap_or(0)
    }

    pub fn prop(&self, name: &str) -> u64 {
        self.prop_counts.get(name).copied().unwrap_or(0)
    }

    pub fn method(&self, name: &str) -> u64 {
        self.method_counts.get(name).copied().unwrap_or(0)
    }
}

/// Names the engine counts. Configuration, fixed at construction: changing
/// the catalog changes the feature schema, not the extraction logic.
#[derive(Debug, Clone)]
pub struct FeatureCatalog {
    /// HTML tag names counted per document.
    pub tags: Vec<String>,
    /// HTML attribute names counted by element presence.
    pub attrs: Vec<String>,
    /// Event handler attribute names; their values are JavaScript fragments.
    pub event_handler_attrs: Vec<String>,
    /// Identifier bucket checked first.
    pub dom_objects: Vec<String>,
    /// Identifier bucket checked second.
    pub properties: Vec<String>,
    /// Identifier bucket checked last.
    pub methods: Vec<String>,
}

impl Default for FeatureCatalog {
    fn default() -> Self {
        let strings = |names: &[&str]| names.iter().map(|s| s.to_string()).collect();
        Self {
            tags: strings(&[
                "script", "iframe", "meta", "div", "applet", "object", "embed", "link", "svg",
            ]),
            attrs: strings(&["href", "http-equiv", "lowsrc"]),
            event_handler_attrs: strings(&DEFAULT_EVENT_HANDLER_ATTRS),
            // "windows" is kept as published with the training data, as is
            // "document" living in two buckets (the priority order resolves it).
            dom_objects: strings(&["windows", "location", "document"]),
            properties: strings(&["cookie", "document", "referrer"]),
            methods: strings(&[
                "write",
                "getElementsByTagName",
                "alert",
                "eval",
                "fromCharCode",
                "prompt",
                "confirm",
            ]),
        }
    }
}

impl FeatureCatalog {
    /// The complete page-record key set this catalog produces, sorted. Every
    /// extracted page carries exactly these keys regardless of content.
    pub fn schema(&self) -> Vec<String> {
        let mut keys = vec![
            "class".to_string(),
            "url_length".to_string(),
            "url_duplicated_characters".to_string(),
            "url_special_characters".to_string(),
            "url_script_tag".to_string(),
            "url_cookie".to_string(),
            "url_redirection".to_string(),
            "url_number_keywords".to_string(),
            "url_number_domain".to_string(),
            "html_length".to_string(),
            "js_file".to_string(),
            "js_min_length".to_string(),
            "js_min_define_function".to_string(),
            "js_min_function_calls".to_string(),
            "js_string_max_length".to_string(),
        ];
        keys.extend(self.tags.iter().map(|t| format!("html_tag_{t}")));
        keys.extend(self.attrs.iter().map(|a| format!("html_attr_{a}")));
        keys.extend(
            self.event_handler_attrs
                .iter()
                .map(|e| format!("html_event_{e}")),
        );
        keys.extend(self.dom_objects.iter().map(|d| format!("js_dom_{d}")));
        keys.extend(self.properties.iter().map(|p| format!("js_prop_{p}")));
        keys.extend(self.methods.iter().map(|m| format!("js_method_{m}")));
        keys.sort();
        keys.dedup();
        keys
    }
}

/// Event handler attribute names, extracted from the dottoro reference list.
const DEFAULT_EVENT_HANDLER_ATTRS: [&str; 83] = [
    "onabort",
    "onactivate",
    "onafterprint",
    "onafterupdate",
    "onbeforeactivate",
    "onbeforecopy",
    "onbeforecut",
    "onbeforedeactivate",
    "onbeforeeditfocus",
    "onbeforepaste",
    "onbeforeprint",
    "onbeforeunload",
    "onbeforeupdate",
    "onblur",
    "onbounce",
    "oncellchange",
    "onchange",
    "onclick",
    "oncontextmenu",
    "oncontrolselect",
    "oncopy",
    "oncut",
    "ondataavailable",
    "ondatasetchanged",
    "ondatasetcomplete",
    "ondblclick",
    "ondeactivate",
    "ondrag",
    "ondragend",
    "ondragenter",
    "ondragleave",
    "ondragover",
    "ondragstart",
    "ondrop",
    "onerror",
    "onerrorupdate",
    "onfilterchange",
    "onfinish",
    "onfocus",
    "onfocusin",
    "onfocusout",
    "onhashchange",
    "onhelp",
    "oninput",
    "onkeydown",
    "onkeypress",
    "onkeyup",
    "onload",
    "onlosecapture",
    "onmessage",
    "onmousedown",
    "onmouseenter",
    "onmouseleave",
    "onmousemove",
    "onmouseout",
    "onmouseover",
    "onmouseup",
    "onmousewheel",
    "onmove",
    "onmoveend",
    "onmovestart",
    "onoffline",
    "ononline",
    "onpaste",
    "onpropertychange",
    "onreadystatechange",
    "onreset",
    "onresize",
    "onresizeend",
    "onresizestart",
    "onrowenter",
    "onrowexit",
    "onrowsdelete",
    "onrowsinserted",
    "onscroll",
    "onsearch",
    "onselect",
    "onselectionchange",
    "onselectstart",
    "onstart",
    "onstop",
    "onsubmit",
    "onunload",
];
