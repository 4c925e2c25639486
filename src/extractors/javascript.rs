// JavaScript Fragment Analyzer
//
// Parses one extracted fragment with tree-sitter. The grammar is tolerant:
// violations become ERROR/MISSING nodes instead of hard failures, which
// matters because XSS payloads routinely break strict syntax mid-token.
// Analysis runs in two passes: a syntactic pass over a schema-less JSON
// rendition of the tree, and a lexical pass over the flat leaf token stream.
//
// Identifier tokens are bucketed lexically rather than syntactically because
// aliasing defeats tree shapes trivially:
//     var test = alert;
//     test();

use serde_json::{json, Map, Value};
use tracing::warn;
use tree_sitter::{Node, Parser, Tree};

use crate::extractors::base::{FeatureCatalog, FragmentFeatures};
use crate::extractors::tree::walk_nodes;

/// Grammar kinds that read as identifiers in the token stream.
const IDENTIFIER_KINDS: [&str; 6] = [
    "identifier",
    "property_identifier",
    "shorthand_property_identifier",
    "shorthand_property_identifier_pattern",
    "statement_identifier",
    "private_property_identifier",
];

/// Named function declarations.
const FUNCTION_DECLARATION_KINDS: [&str; 2] =
    ["function_declaration", "generator_function_declaration"];

/// Call expressions, plus function expressions: an expression-position
/// `function` is overwhelmingly an IIFE wrapper in payload code, so it is
/// counted with the calls.
const CALL_LIKE_KINDS: [&str; 3] = ["call_expression", "function_expression", "generator_function"];

/// Nesting bound for the tree conversion. Pathological input fails the
/// fragment instead of blowing the stack.
const MAX_TREE_DEPTH: usize = 512;

#[derive(Debug, thiserror::Error)]
pub enum FragmentError {
    #[error("JavaScript parser produced no tree")]
    Parse,
    #[error("syntax tree nesting exceeded {0} levels")]
    TreeTooDeep(usize),
}

/// Analyzes individual JavaScript fragments against the configured catalogs.
pub struct JavaScriptAnalyzer {
    catalog: FeatureCatalog,
}

impl JavaScriptAnalyzer {
    pub fn new(catalog: FeatureCatalog) -> Self {
        Self { catalog }
    }

    /// Analyze one fragment. `origin` names the page for diagnostics. A
    /// failed fragment is warn-logged here and must be excluded from
    /// aggregation by the caller, not zero-filled. The empty string is valid
    /// input and yields an all-zero record.
    pub fn analyze(
        &self,
        source: &str,
        origin: Option<&str>,
    ) -> Result<FragmentFeatures, FragmentError> {
        let origin = origin.unwrap_or("<unknown>");
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_javascript::LANGUAGE.into())
            .map_err(|_| FragmentError::Parse)?;

        let Some(syntax_tree) = parser.parse(source, None) else {
            warn!(origin, fragment = source, "unparsable JavaScript fragment");
            return Err(FragmentError::Parse);
        };

        let root = match node_to_value(syntax_tree.root_node(), source.as_bytes(), 0) {
            Ok(value) => value,
            Err(err) => {
                warn!(origin, fragment = source, error = %err, "unparsable JavaScript fragment");
                return Err(err);
            }
        };

        let mut features = FragmentFeatures::zeroed(&self.catalog);
        features.source_len = source.chars().count() as u64;

        // Syntactic pass: nodes without a type (position maps and the like)
        // are skipped, not an error.
        for node in walk_nodes(&root) {
            let Some(kind) = node.get("type").and_then(Value::as_str) else {
                continue;
            };
            if FUNCTION_DECLARATION_KINDS.contains(&kind) {
                features.define_function += 1;
            } else if CALL_LIKE_KINDS.contains(&kind) {
                features.function_calls += 1;
            }
        }

        // Lexical pass: bucket identifier tokens by catalog priority. The
        // ordered check gives first-match-wins, so a name listed in two
        // catalogs is never double-counted.
        let mut strings: Vec<String> = Vec::new();
        for token in leaf_tokens(&syntax_tree, source.as_bytes()) {
            if IDENTIFIER_KINDS.contains(&token.kind.as_str()) {
                if let Some(count) = features.dom_counts.get_mut(token.text.as_str()) {
                    *count += 1;
                } else if let Some(count) = features.prop_counts.get_mut(token.text.as_str()) {
                    *count += 1;
                } else if let Some(count) = features.method_counts.get_mut(token.text.as_str()) {
                    *count += 1;
                }
            } else if token.text == "string" {
                // Compares the token text, not its kind, so real string
                // literals almost never register and js_string_max_length
                // stays 0 for most inputs. The published training data was
                // generated this way; changing the test would silently shift
                // the feature distribution under trained models.
                strings.push(token.text);
            }
        }
        features.string_max_len = strings
            .iter()
            .map(|s| s.chars().count() as u64)
            .max()
            .unwrap_or(0);

        Ok(features)
    }
}

/// One lexical token: the grammar kind and the source text it covers.
struct LeafToken {
    kind: String,
    text: String,
}

/// Flat, ordered token stream: every leaf of the parse tree, unnamed
/// punctuation included.
fn leaf_tokens(tree: &Tree, source: &[u8]) -> Vec<LeafToken> {
    let mut tokens = Vec::new();
    let mut cursor = tree.walk();
    loop {
        while cursor.goto_first_child() {}
        let node = cursor.node();
        tokens.push(LeafToken {
            kind: node.kind().to_string(),
            text: node.utf8_text(source).unwrap_or_default().to_string(),
        });
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return tokens;
            }
        }
    }
}

/// Render a parse node as a plain tagged value so traversal stays decoupled
/// from the grammar's schema. Named nodes become maps carrying `type`,
/// `start`/`end` position maps (no `type` key of their own), and either
/// `children` or a leaf `value`.
fn node_to_value(node: Node, source: &[u8], depth: usize) -> Result<Value, FragmentError> {
    if depth >= MAX_TREE_DEPTH {
        return Err(FragmentError::TreeTooDeep(MAX_TREE_DEPTH));
    }

    let start = node.start_position();
    let end = node.end_position();
    let mut map = Map::new();
    map.insert("type".to_string(), json!(node.kind()));
    map.insert(
        "start".to_string(),
        json!({"row": start.row, "column": start.column}),
    );
    map.insert(
        "end".to_string(),
        json!({"row": end.row, "column": end.column}),
    );

    let mut children = Vec::with_capacity(node.named_child_count());
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        children.push(node_to_value(child, source, depth + 1)?);
    }
    if children.is_empty() {
        map.insert(
            "value".to_string(),
            json!(node.utf8_text(source).unwrap_or_default()),
        );
    } else {
        map.insert("children".to_string(), Value::Array(children));
    }

    Ok(Value::Object(map))
}
