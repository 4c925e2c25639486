// URL Lexical Analyzer
//
// Pure function of the URL string: no I/O, cannot fail. Percent-decoding
// happens before every test so encoded payloads cannot hide from the
// substring checks.

use regex::Regex;

use crate::extractors::base::FeatureRecord;

/// Client-side redirection sinks worth flagging in a URL.
const REDIRECTION_SINKS: [&str; 11] = [
    "window.location",
    "window.history",
    "window.navigate",
    "document.URL",
    "document.documentURI",
    "document.URLUnencoded",
    "document.baseURI",
    "location",
    "window.open",
    "self.location",
    "top.location",
];

/// Keywords whose presence in a URL correlates with attack targets and
/// payload staging. Matched case-sensitively, counted once each.
const SUSPECT_KEYWORDS: [&str; 13] = [
    "login", "signup", "contact", "search", "query", "redirect", "XSS", "banking", "root",
    "password", "crypt", "shell", "evil",
];

/// Derives lexical features from the decoded URL string.
pub struct UrlAnalyzer {
    script_tag: Regex,
    domain: Regex,
}

impl UrlAnalyzer {
    pub fn new() -> Self {
        Self {
            // Opening or closing script tag, interior whitespace allowed.
            script_tag: Regex::new(r"(?i)(?:<\s*script.*>|<\s*/\s*script\s*>)")
                .expect("script tag pattern is valid"),
            // Domain-like sequences: dot-separated labels of up to 63 chars
            // not starting with a hyphen, ending in a 2-6 letter label.
            domain: Regex::new(r"(?:[A-Za-z0-9][A-Za-z0-9-]{0,62}\.)+[A-Za-z]{2,6}")
                .expect("domain pattern is valid"),
        }
    }

    pub fn analyze(&self, url: &str) -> FeatureRecord {
        let decoded_bytes = urlencoding::decode_binary(url.as_bytes());
        let url = String::from_utf8_lossy(&decoded_bytes);

        let mut features = FeatureRecord::new();
        features.set_count("url_length", url.chars().count() as u64);
        features.set_flag(
            "url_duplicated_characters",
            url.contains("<<") || url.contains(">>"),
        );
        features.set_flag(
            "url_special_characters",
            url.contains('"') || url.contains('\'') || url.contains('>'),
        );
        features.set_flag("url_script_tag", self.script_tag.is_match(&url));
        features.set_flag("url_cookie", url.contains("document.cookie"));
        features.set_flag(
            "url_redirection",
            REDIRECTION_SINKS.iter().any(|sink| url.contains(sink)),
        );
        features.set_count(
            "url_number_keywords",
            SUSPECT_KEYWORDS
                .iter()
                .filter(|keyword| url.contains(*keyword))
                .count() as u64,
        );
        features.set_count("url_number_domain", self.domain.find_iter(&url).count() as u64);
        features
    }
}

impl Default for UrlAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
