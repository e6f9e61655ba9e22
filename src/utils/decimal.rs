use serde::{Deserialize, Deserializer, de};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

fn to_f64<E: de::Error>(raw: NumberOrText) -> Result<f64, E> {
    match raw {
        NumberOrText::Number(n) => Ok(n),
        NumberOrText::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| E::custom(format!("invalid decimal {s:?}"))),
    }
}

/// DRF renders `DecimalField` as `"1.50"` unless `COERCE_DECIMAL_TO_STRING`
/// is off; both shapes are accepted.
pub fn de_decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    to_f64(NumberOrText::deserialize(deserializer)?)
}

/// Like [`de_decimal`] but a JSON `null` becomes `0.0`.
pub fn de_decimal_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(raw) => to_f64(raw),
        None => Ok(0.0),
    }
}
