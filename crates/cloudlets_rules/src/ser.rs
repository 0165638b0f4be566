//! Serde helpers shared by the wire structs.

use serde::{Deserialize, Deserializer};

/// Skip-serializing predicate mirroring Go's `omitempty` for booleans.
#[allow(clippy::trivially_copy_pass_by_ref)]
pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

/// Skip-serializing predicate mirroring Go's `omitempty` for integers.
#[allow(clippy::trivially_copy_pass_by_ref)]
pub(crate) fn is_zero(value: &i64) -> bool {
    *value == 0
}

/// Treats an explicit JSON `null` as the field's default value. The API emits
/// `null` for absent arrays and objects.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
