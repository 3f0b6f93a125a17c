use serde::{Deserialize, Deserializer};

/// Deserializer for patch fields on nullable columns, where "absent" and
/// "explicit null" mean different things: use with
/// `#[serde(default, deserialize_with = "double_option")]` on an
/// `Option<Option<T>>` field. Absent stays `None`; `null` becomes
/// `Some(None)`; a value becomes `Some(Some(v))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
