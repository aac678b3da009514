use serde::{Deserialize, Deserializer};

pub mod documents;
pub mod profile;
pub mod user;

/// Reads an explicit JSON `null` as the field's default. Pair with
/// `#[serde(default)]`, which only covers absent keys.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
