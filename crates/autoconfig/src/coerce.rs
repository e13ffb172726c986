//! Opportunistic numeric conversion of string fields
use crate::node::ConfigNode;
use crate::value::Value;

/// Convert numeric-looking string fields in place, recursing into nested nodes
///
/// Integral numbers become [Value::Integer], the rest [Value::Decimal]. List elements are left alone.
/// Only strings are candidates, so running this again is a no-op.
pub fn coerce_numbers(node: &mut ConfigNode) {
    for (name, value) in node.iter_mut() {
        match value {
            Value::String(s) => {
                if let Some(number) = parse_number(s) {
                    tracing::trace!(field = %name, from = %s, to = ?number, "coerced");
                    *value = number;
                }
            }
            Value::Node(child) => coerce_numbers(child),
            _ => {}
        }
    }
}

fn parse_number(s: &str) -> Option<Value> {
    let decimal: f64 = s.trim().parse().ok()?;

    // "nan", "inf" and friends stay strings
    if !decimal.is_finite() {
        return None;
    }

    let in_range = decimal >= i64::MIN as f64 && decimal < i64::MAX as f64;
    if decimal.fract() == 0.0 && in_range {
        Some(Value::Integer(decimal as i64))
    } else {
        Some(Value::Decimal(decimal))
    }
}
