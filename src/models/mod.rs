pub mod movie;
pub mod planning;
pub mod settings;

use serde::{Deserialize, Deserializer};

/// Reads an explicit `null` the same way as a missing field. Documents
/// written by the browser storefront carry `null` where a number failed to
/// parse.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
