//! Field-map helpers.
//!
//! One persisted entity is a flat mapping from field name to string value
//! (the backend's hash). Field names keep the camelCase spellings of the
//! data already in production backends.

use std::collections::BTreeMap;

/// Flat field name -> string value mapping, the storage unit for one entity.
pub type FieldMap = BTreeMap<String, String>;

/// Build a [`FieldMap`] from `(name, value)` pairs.
pub fn field_map<I, K, V>(pairs: I) -> FieldMap
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
