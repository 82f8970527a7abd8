//! Field decoders for backend records that are not always well formed.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};
use tracing::warn;

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Valid(T),
    Invalid(IgnoredAny),
}

/// Decodes `T`, turning `null` or a value of the wrong shape into
/// `T::default()` so one bad field never rejects the whole record.
pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    match Option::<Lenient<T>>::deserialize(deserializer)? {
        Some(Lenient::Valid(value)) => Ok(value),
        Some(Lenient::Invalid(_)) => {
            warn!(expected = std::any::type_name::<T>(), "Ignoring malformed field");
            Ok(T::default())
        }
        None => Ok(T::default()),
    }
}
