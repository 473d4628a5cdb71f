use crate::snapshot::RawValue;

/// Replace every NaN number with `Null`, keeping structure and key order.
pub fn normalize(value: RawValue) -> RawValue {
    match value {
        RawValue::Number(n) if n.is_nan() => RawValue::Null,
        RawValue::Array(items) => RawValue::Array(items.into_iter().map(normalize).collect()),
        RawValue::Object(entries) => RawValue::Object(
            entries
                .into_iter()
                .map(|(key, value)| (key, normalize(value)))
                .collect(),
        ),
        other => other,
    }
}
