//! Deserialization helpers for API response models.

use serde::{Deserialize, Deserializer};

/// Decode `null` as the field's default value. The API sends `null` for
/// fields that do not apply, e.g. `username` on an unassociated client.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Sample {
        #[serde(deserialize_with = "nullable")]
        name: String,
        #[serde(deserialize_with = "nullable")]
        values: Vec<i64>,
        #[serde(deserialize_with = "nullable")]
        total: i64,
    }

    #[test]
    fn test_null_becomes_default() {
        let sample: Sample =
            serde_json::from_str(r#"{"name":null,"values":null,"total":null}"#).unwrap();
        assert_eq!(sample.name, "");
        assert!(sample.values.is_empty());
        assert_eq!(sample.total, 0);
    }

    #[test]
    fn test_present_and_missing_values() {
        let sample: Sample = serde_json::from_str(r#"{"name":"floor","total":3}"#).unwrap();
        assert_eq!(sample.name, "floor");
        assert!(sample.values.is_empty());
        assert_eq!(sample.total, 3);
    }

    #[test]
    fn test_wrong_type_still_fails() {
        assert!(serde_json::from_str::<Sample>(r#"{"name":42}"#).is_err());
    }
}
