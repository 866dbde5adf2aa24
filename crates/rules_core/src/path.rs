//! Field path resolution.
//!
//! A path is a dotted list of segments (`user.emails.0`). A `*` segment expands
//! to every key of an object or every index of an array at that level. The
//! resolver assumes the input is a finite tree; `serde_json::Value` cannot
//! express cycles, so every resolution terminates.

use indexmap::IndexMap;
use serde_json::Value;

/// Segment that expands to every key or index of the current node.
pub const WILDCARD: &str = "*";

/// Key used when the path is empty and the whole value is returned.
pub const ROOT_KEY: &str = "0";

/// Resolved leaf values keyed by their concrete dotted path.
pub type Resolved<'a> = IndexMap<String, &'a Value>;

/// Resolves `path` against `data`.
///
/// Returns every matching concrete key with its value, in the enumeration
/// order of the data. An empty map means the field is not present.
///
/// # Example
///
/// ```rust
/// use rules_core::resolve;
/// use serde_json::json;
///
/// let data = json!({"emails": ["a@a.com", "b@b.com"]});
/// let resolved = resolve(&data, "emails.*");
///
/// assert_eq!(resolved["emails.0"], "a@a.com");
/// assert_eq!(resolved["emails.1"], "b@b.com");
/// ```
pub fn resolve<'a>(data: &'a Value, path: &str) -> Resolved<'a> {
    let segments: Vec<&str> = if path.is_empty() {
        Vec::new()
    } else {
        path.split('.').collect()
    };

    let mut resolved = IndexMap::new();
    walk(data, &segments, String::new(), &mut resolved);
    resolved
}

fn walk<'a>(node: &'a Value, segments: &[&str], base: String, out: &mut Resolved<'a>) {
    let Some((segment, rest)) = segments.split_first() else {
        let key = if base.is_empty() {
            ROOT_KEY.to_string()
        } else {
            base
        };
        out.insert(key, node);
        return;
    };

    if *segment == WILDCARD {
        // Scalars and null have no keys, so they contribute nothing here.
        match node {
            Value::Object(map) => {
                for (key, child) in map {
                    walk(child, rest, join(&base, key), out);
                }
            }
            Value::Array(items) => {
                for (index, child) in items.iter().enumerate() {
                    walk(child, rest, join(&base, &index.to_string()), out);
                }
            }
            _ => {}
        }
        return;
    }

    if let Some(child) = child(node, segment) {
        walk(child, rest, join(&base, segment), out);
    }
}

fn child<'a>(node: &'a Value, segment: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn join(base: &str, key: &str) -> String {
    if base.is_empty() {
        key.to_string()
    } else {
        format!("{base}.{key}")
    }
}
