// Schema-Agnostic Tree Traversal
//
// The syntax tree handed over by the parser has no fixed shape: grammar
// versions add and rename fields freely. The walker therefore treats a node
// as a plain tagged value (map / sequence / scalar) and visits every map
// reachable from it, never binding to the grammar's schema.

use serde_json::{Map, Value};

/// Lazy iterator over every non-empty map reachable from a value.
///
/// A non-empty map is yielded, then each of its values is visited; each
/// element of a non-empty sequence is visited; scalars and empty containers
/// contribute nothing. Every descendant map appears exactly once. The
/// explicit stack keeps traversal depth off the call stack.
pub struct NodeWalker<'a> {
    stack: Vec<&'a Value>,
}

pub fn walk_nodes(root: &Value) -> NodeWalker<'_> {
    NodeWalker { stack: vec![root] }
}

impl<'a> Iterator for NodeWalker<'a> {
    type Item = &'a Map<String, Value>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(value) = self.stack.pop() {
            match value {
                Value::Object(map) if !map.is_empty() => {
                    self.stack.extend(map.values().rev());
                    return Some(map);
                }
                Value::Array(seq) if !seq.is_empty() => {
                    self.stack.extend(seq.iter().rev());
                }
                _ => {}
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_yields_every_nested_map() {
        let tree = json!({
            "type": "a",
            "children": [
                {"type": "b", "inner": {"type": "c"}},
                {"type": "d"}
            ]
        });
        let kinds: Vec<&str> = walk_nodes(&tree)
            .filter_map(|m| m.get("type").and_then(Value::as_str))
            .collect();
        assert_eq!(kinds.len(), 4);
        for kind in ["a", "b", "c", "d"] {
            assert!(kinds.contains(&kind));
        }
    }

    #[test]
    fn test_skips_scalars_and_empty_containers() {
        let tree = json!({"a": 1, "b": [], "c": {}, "d": "x", "e": null});
        // The root map itself is the only map with content.
        assert_eq!(walk_nodes(&tree).count(), 1);
    }

    #[test]
    fn test_scalar_root_yields_nothing() {
        assert_eq!(walk_nodes(&json!(42)).count(), 0);
        assert_eq!(walk_nodes(&json!(null)).count(), 0);
        assert_eq!(walk_nodes(&json!([])).count(), 0);
    }

    #[test]
    fn test_maps_inside_sequences_are_reached() {
        let tree = json!([[{"x": 1}], [{"y": 2}, {"z": [{"w": 3}]}]]);
        assert_eq!(walk_nodes(&tree).count(), 4);
    }
}
