// JavaScript fragment analyzer tests

use crate::extractors::base::FeatureCatalog;
use crate::extractors::javascript::{FragmentError, JavaScriptAnalyzer};

fn analyzer() -> JavaScriptAnalyzer {
    JavaScriptAnalyzer::new(FeatureCatalog::default())
}

#[test]
fn test_empty_fragment_is_all_zero() {
    let features = analyzer().analyze("", None).expect("empty input is valid");
    assert_eq!(features.source_len, 0);
    assert_eq!(features.define_function, 0);
    assert_eq!(features.function_calls, 0);
    assert_eq!(features.string_max_len, 0);
    assert!(features.dom_counts.values().all(|&v| v == 0));
    assert!(features.prop_counts.values().all(|&v| v == 0));
    assert!(features.method_counts.values().all(|&v| v == 0));
}

#[test]
fn test_alert_call() {
    let features = analyzer().analyze("alert(1)", None).expect("valid fragment");
    assert_eq!(features.method("alert"), 1);
    assert_eq!(features.function_calls, 1);
    assert_eq!(features.define_function, 0);
    assert_eq!(features.source_len, 8);
}

#[test]
fn test_document_cookie_buckets() {
    let features = analyzer()
        .analyze("document.cookie", None)
        .expect("valid fragment");
    // "document" is in both catalogs; the dom_objects bucket wins.
    assert_eq!(features.dom("document"), 1);
    assert_eq!(features.prop("document"), 0);
    assert_eq!(features.prop("cookie"), 1);
}

#[test]
fn test_bucket_priority_never_double_counts() {
    let catalog = FeatureCatalog {
        dom_objects: vec!["document".to_string()],
        properties: vec!["document".to_string(), "cookie".to_string()],
        methods: vec!["document".to_string()],
        ..FeatureCatalog::default()
    };
    let features = JavaScriptAnalyzer::new(catalog)
        .analyze("document.cookie; document.title", None)
        .expect("valid fragment");
    assert_eq!(features.dom("document"), 2);
    assert_eq!(features.prop("document"), 0);
    assert_eq!(features.method("document"), 0);
    assert_eq!(features.prop("cookie"), 1);
}

#[test]
fn test_function_declarations_and_calls() {
    let source = "function f() {} var g = function() {}; f(); g();";
    let features = analyzer().analyze(source, None).expect("valid fragment");
    assert_eq!(features.define_function, 1);
    // function expression counts with the calls, plus the two invocations
    assert_eq!(features.function_calls, 3);
}

#[test]
fn test_iife_counts_as_calls() {
    let features = analyzer()
        .analyze("(function(){ alert(1) })()", None)
        .expect("valid fragment");
    assert_eq!(features.define_function, 0);
    // outer invocation + function expression + alert call
    assert_eq!(features.function_calls, 3);
    assert_eq!(features.method("alert"), 1);
}

#[test]
fn test_broken_payload_still_analyzes() {
    // An exploit cut off mid-expression must not lose its identifier counts.
    let features = analyzer()
        .analyze("alert(document.cookie", None)
        .expect("recovery keeps the fragment");
    assert_eq!(features.method("alert"), 1);
    assert_eq!(features.dom("document"), 1);
    assert_eq!(features.prop("cookie"), 1);
}

#[test]
fn test_string_literals_do_not_register() {
    // The string collection compares token text against a fixed value, so an
    // ordinary literal leaves the maximum at zero.
    let features = analyzer()
        .analyze("var a = \"aaaaaaaaaaaaaaaa\";", None)
        .expect("valid fragment");
    assert_eq!(features.string_max_len, 0);
}

#[test]
fn test_pathological_nesting_fails_the_fragment() {
    let mut source = String::new();
    for _ in 0..600 {
        source.push('(');
    }
    source.push('1');
    for _ in 0..600 {
        source.push(')');
    }
    let err = analyzer()
        .analyze(&source, Some("test"))
        .expect_err("nesting bound applies");
    assert!(matches!(err, FragmentError::TreeTooDeep(_)));
}

#[test]
fn test_aliasing_is_still_visible_lexically() {
    // Lexical bucketing is the point: the alias hides the call target from
    // any tree shape, the token stream still shows it.
    let features = analyzer()
        .analyze("var test = alert; test();", None)
        .expect("valid fragment");
    assert_eq!(features.method("alert"), 1);
}
