//! Writing trees back as documents
//!
//! Output is block YAML with a fixed 4 space step per nesting level:
//!
//! ```yaml
//! seed: 42
//! train:
//!     lr: 0.1
//!     layers:
//!       - 64
//!       - 32
//! ```
//!
//! Fields keep their insertion order. Strings are written plain unless that would read back as
//! something else, in which case they are double quoted. Lists and nodes nested inside lists are
//! written in flow style (`[1, 2]`, `{a: 1}`). Empty nodes and lists are written as `{}` and `[]`.
use crate::node::ConfigNode;
use crate::value::{key_name, Value};

const INDENT: &str = "    ";

/// Document text for `node`, leaving out the `exclude`d field names at every level
pub fn to_document(node: &ConfigNode, exclude: &[&str]) -> String {
    let mut out = String::new();
    write_fields(&mut out, node, exclude, 0);
    out
}

/// Document text for a plain field map
pub(crate) fn fields_to_document<'a>(
    fields: impl IntoIterator<Item = (&'a String, &'a Value)>,
    exclude: &[&str],
) -> String {
    let mut out = String::new();
    write_fields(&mut out, fields, exclude, 0);
    out
}

fn write_fields<'a>(
    out: &mut String,
    fields: impl IntoIterator<Item = (&'a String, &'a Value)>,
    exclude: &[&str],
    depth: usize,
) {
    let tab = INDENT.repeat(depth);

    for (name, value) in fields {
        if exclude.contains(&name.as_str()) {
            continue;
        }
        let key = key_text(name, false);

        match value {
            Value::Node(child) if child.keys().any(|k| !exclude.contains(&k)) => {
                out.push_str(&format!("{tab}{key}:\n"));
                write_fields(out, child, exclude, depth + 1);
            }
            Value::Node(_) => out.push_str(&format!("{tab}{key}: {{}}\n")),
            Value::List(items) if !items.is_empty() => {
                out.push_str(&format!("{tab}{key}:\n"));
                for item in items {
                    out.push_str(&format!("{tab}  - {}\n", inline(item)));
                }
            }
            other => out.push_str(&format!("{tab}{key}: {}\n", inline(other))),
        }
    }
}

/// Flow style text for any value
pub fn inline(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Decimal(d) => decimal(*d),
        Value::String(s) => string(s, false),
        Value::List(items) => {
            let items: Vec<String> = items.iter().map(flow).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Node(node) => {
            let fields: Vec<String> = node
                .iter()
                .map(|(name, value)| format!("{}: {}", key_text(name, true), flow(value)))
                .collect();
            format!("{{{}}}", fields.join(", "))
        }
    }
}

/// Inside `[...]` or `{...}`
fn flow(value: &Value) -> String {
    match value {
        Value::String(s) => string(s, true),
        other => inline(other),
    }
}

fn decimal(d: f64) -> String {
    if d.is_nan() {
        ".nan".to_string()
    } else if d.is_infinite() {
        let inf = if d > 0.0 { ".inf" } else { "-.inf" };
        inf.to_string()
    } else {
        // `{:?}` always keeps a decimal point or exponent, so 3.0 stays a decimal
        format!("{d:?}")
    }
}

fn string(s: &str, in_flow: bool) -> String {
    let reads_back = plain_safe(s, in_flow)
        && matches!(
            serde_yaml::from_str::<serde_yaml::Value>(s),
            Ok(serde_yaml::Value::String(parsed)) if parsed == s
        );

    if reads_back {
        s.to_string()
    } else {
        quoted(s)
    }
}

/// Keys only have to come back with the same name, `1: x` is fine for a field named "1"
fn key_text(name: &str, in_flow: bool) -> String {
    let reads_back = plain_safe(name, in_flow)
        && serde_yaml::from_str::<serde_yaml::Value>(name)
            .is_ok_and(|parsed| {
                !parsed.is_mapping() && !parsed.is_sequence() && key_name(&parsed) == name
            });

    if reads_back {
        name.to_string()
    } else {
        quoted(name)
    }
}

/// JSON string syntax is valid double quoted YAML
fn quoted(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

fn plain_safe(s: &str, in_flow: bool) -> bool {
    const INDICATORS: &[char] = &[
        '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%', '@',
        '`',
    ];
    const FLOW_INDICATORS: &[char] = &[',', '[', ']', '{', '}'];

    if s.is_empty() || s.trim() != s || s.starts_with(INDICATORS) {
        return false;
    }
    if s.contains(['\n', '\r', '\t']) || s.contains(": ") || s.contains(" #") || s.ends_with(':') {
        return false;
    }

    !(in_flow && s.contains(FLOW_INDICATORS))
}
