use crate::snapshot::{RawValue, SnapshotError};

// Private-use prefix that survives a round-trip through a JSON string.
const NON_FINITE_MARKER: &str = "\u{e000}non-finite:";

const NON_FINITE_LITERALS: [(&str, f64); 3] = [
    ("-Infinity", f64::NEG_INFINITY),
    ("Infinity", f64::INFINITY),
    ("NaN", f64::NAN),
];

/// Decode a snapshot file body.
///
/// Accepts the bare `NaN`, `Infinity` and `-Infinity` literals some upstream
/// encoders emit; they decode to the matching `f64`.
pub fn decode_snapshot(text: &str) -> Result<RawValue, SnapshotError> {
    let quoted = quote_non_finite(text);
    let value: RawValue = serde_json::from_str(&quoted)?;
    Ok(restore_non_finite(value))
}

/// Rewrite non-finite literals outside of strings as marker strings.
fn quote_non_finite(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut i = 0;

    while i < text.len() {
        let rest = &text[i..];

        if !in_string {
            if let Some((literal, _)) = NON_FINITE_LITERALS
                .iter()
                .find(|(literal, _)| rest.starts_with(literal))
            {
                out.push('"');
                out.push_str(NON_FINITE_MARKER);
                out.push_str(literal);
                out.push('"');
                i += literal.len();
                continue;
            }
        }

        let Some(c) = rest.chars().next() else {
            break;
        };
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
        }

        out.push(c);
        i += c.len_utf8();
    }

    out
}

fn restore_non_finite(value: RawValue) -> RawValue {
    match value {
        RawValue::String(s) => match s.strip_prefix(NON_FINITE_MARKER) {
            Some(literal) => NON_FINITE_LITERALS
                .iter()
                .find(|(l, _)| *l == literal)
                .map(|(_, n)| RawValue::Number(*n))
                .unwrap_or(RawValue::String(s)),
            None => RawValue::String(s),
        },
        RawValue::Array(items) => {
            RawValue::Array(items.into_iter().map(restore_non_finite).collect())
        }
        RawValue::Object(entries) => RawValue::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k, restore_non_finite(v)))
                .collect(),
        ),
        other => other,
    }
}
