//! Serde helpers for partial-update bodies

use serde::{Deserialize, Deserializer};

/// Distinguish an absent field from an explicit `null`.
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`:
/// absent → `None`, `null` → `Some(None)`, value → `Some(Some(v))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        sensor_id: Option<Option<i32>>,
    }

    #[test]
    fn absent_null_and_value_differ() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        let null: Patch = serde_json::from_str(r#"{"sensor_id": null}"#).unwrap();
        let value: Patch = serde_json::from_str(r#"{"sensor_id": 4}"#).unwrap();
        assert_eq!(absent.sensor_id, None);
        assert_eq!(null.sensor_id, Some(None));
        assert_eq!(value.sensor_id, Some(Some(4)));
    }
}
