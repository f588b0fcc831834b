//! Bounded entry extraction for collection-like subtypes.

use crate::error::InspectError;
use crate::host::Host;
use crate::protocol::Subtype;

/// One `(key, value)` entry pulled from a collection. Sets and iterators
/// have no keys.
#[derive(Debug, Clone)]
pub struct RawEntry<V> {
    pub key: Option<V>,
    pub value: V,
}

/// Extracts up to `fetch_count` entries, skipping the first `fetch_start`.
/// A `fetch_count` of `0` means unbounded.
///
/// Weak variants and iterators delegate the bound to the host and ignore
/// `fetch_start` — neither can be enumerated from an arbitrary offset — and
/// iterator fetches consume the iterator. Requesting entries for any other
/// subtype is a caller error, never silently empty.
pub fn entries<H: Host>(
    host: &H,
    value: &H::Value,
    subtype: Subtype,
    fetch_start: usize,
    fetch_count: usize,
) -> Result<Vec<RawEntry<H::Value>>, InspectError> {
    let cap = if fetch_count == 0 {
        usize::MAX
    } else {
        fetch_count
    };
    let entries = match subtype {
        Subtype::Set => host
            .set_values(value)
            .into_iter()
            .skip(fetch_start)
            .take(cap)
            .map(|value| RawEntry { key: None, value })
            .collect(),
        Subtype::Map => host
            .map_entries(value)
            .into_iter()
            .skip(fetch_start)
            .take(cap)
            .map(|(key, value)| RawEntry {
                key: Some(key),
                value,
            })
            .collect(),
        Subtype::WeakMap | Subtype::WeakSet => host
            .weak_entries(value, cap)
            .into_iter()
            .map(|(key, value)| RawEntry { key, value })
            .collect(),
        Subtype::Iterator => host
            .iterator_entries(value, cap)
            .into_iter()
            .map(|value| RawEntry { key: None, value })
            .collect(),
        Subtype::Null
        | Subtype::Array
        | Subtype::Regexp
        | Subtype::Date
        | Subtype::Error
        | Subtype::Proxy
        | Subtype::Node
        | Subtype::Class => return Err(InspectError::NotACollection),
    };
    Ok(entries)
}

/// Whether a subtype participates in the entries protocol.
pub(crate) fn is_collection(subtype: Subtype) -> bool {
    matches!(
        subtype,
        Subtype::Set | Subtype::Map | Subtype::WeakMap | Subtype::WeakSet | Subtype::Iterator
    )
}
