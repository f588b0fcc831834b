//! Property enumeration across the prototype chain.
//!
//! Walks from the object outward to the root prototype, yielding raw
//! descriptors in host insertion order per level. Pagination bounds the work
//! per call; the synthetic `__proto__` entry is appended on the first page
//! only.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::describe::array_like_length;
use crate::host::{Host, OwnProperty, PropertyKey, PropertySlot, Thrown};
use crate::protocol::Subtype;

/// Which properties an enumeration pass collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyFilter {
    /// Everything, at every chain level.
    AllInChain,
    /// First (own) level only.
    OwnOnly,
    /// Only native-getter accessors, anywhere in the chain.
    NativeGettersOnly,
    /// Own properties plus native-getter accessors from the chain.
    OwnAndNativeGetters,
}

impl PropertyFilter {
    fn wants_own_data(self) -> bool {
        matches!(
            self,
            Self::AllInChain | Self::OwnOnly | Self::OwnAndNativeGetters
        )
    }

    fn wants_inherited_data(self) -> bool {
        matches!(self, Self::AllInChain)
    }

    fn wants_native_getters(self) -> bool {
        matches!(
            self,
            Self::AllInChain | Self::NativeGettersOnly | Self::OwnAndNativeGetters
        )
    }
}

/// Bounds and switches for one enumeration pass.
#[derive(Debug, Clone, Copy)]
pub struct EnumerateOptions {
    pub filter: PropertyFilter,
    /// Properties to skip before collecting.
    pub fetch_start: usize,
    /// Cap on collected properties; `0` means unbounded.
    pub fetch_count: usize,
    /// Append the synthetic `__proto__` entry on the first page.
    pub include_proto: bool,
    /// Convert native-getter accessors into invoked value descriptors.
    pub native_getters_as_values: bool,
}

impl Default for EnumerateOptions {
    fn default() -> Self {
        Self {
            filter: PropertyFilter::AllInChain,
            fetch_start: 0,
            fetch_count: 0,
            include_proto: true,
            native_getters_as_values: false,
        }
    }
}

/// One enumerated property before wire wrapping.
#[derive(Debug)]
pub struct RawProperty<V> {
    pub key: PropertyKey<V>,
    pub slot: PropertySlot<V>,
    pub enumerable: bool,
    pub writable: bool,
    pub configurable: bool,
    pub is_own: bool,
    pub native_getter: bool,
    pub was_thrown: bool,
}

/// Enumerates the properties of `object` under `options`.
///
/// Proxies are opaque: enumeration yields nothing and callers must unwrap
/// the target explicitly. A thrown getter never aborts the walk; it becomes
/// a descriptor carrying the thrown value with `was_thrown` set.
pub fn enumerate<H: Host>(
    host: &H,
    object: &H::Value,
    options: EnumerateOptions,
) -> Vec<RawProperty<H::Value>> {
    let mut out = Vec::new();
    if host.subtype(object) == Some(Subtype::Proxy) {
        return out;
    }

    let mut seen: FxHashSet<SmolStr> = FxHashSet::default();
    seen.insert(SmolStr::new_static("__proto__"));
    let mut to_skip = options.fetch_start;
    let mut remaining = if options.fetch_count == 0 {
        usize::MAX
    } else {
        options.fetch_count
    };
    let array_length = array_like_length(host, object);

    let mut level = 0usize;
    let mut current = Some(object.clone());
    'walk: while let Some(link) = current {
        let is_own = level == 0;
        let mut properties = if is_own {
            match array_length {
                // Index probing keeps host-added non-index own properties
                // out of array display.
                Some(length) => (0..length)
                    .filter_map(|index| host.indexed_property(&link, index))
                    .collect(),
                None => host.own_properties(&link),
            }
        } else {
            host.own_properties(&link)
        };
        properties.extend(host.own_symbol_properties(&link));

        for property in properties {
            if let PropertyKey::Name(name) = &property.key {
                // Shadowed further down the chain.
                if !seen.insert(name.clone()) {
                    continue;
                }
            }
            let Some(raw) = admit(host, object, property, is_own, options) else {
                continue;
            };
            if to_skip > 0 {
                to_skip -= 1;
                continue;
            }
            out.push(raw);
            remaining -= 1;
            if remaining == 0 {
                break 'walk;
            }
        }

        if options.filter == PropertyFilter::OwnOnly {
            break;
        }
        current = host.prototype_of(&link);
        level += 1;
    }

    if options.include_proto && options.fetch_start == 0 {
        if let Some(proto) = host.prototype_of(object) {
            out.push(RawProperty {
                key: PropertyKey::Name(SmolStr::new_static("__proto__")),
                slot: PropertySlot::Data(proto),
                enumerable: false,
                writable: true,
                configurable: true,
                is_own: true,
                native_getter: false,
                was_thrown: false,
            });
        }
    }
    out
}

fn admit<H: Host>(
    host: &H,
    receiver: &H::Value,
    property: OwnProperty<H::Value>,
    is_own: bool,
    options: EnumerateOptions,
) -> Option<RawProperty<H::Value>> {
    let OwnProperty {
        key,
        slot,
        enumerable,
        writable,
        configurable,
    } = property;

    match slot {
        PropertySlot::Data(value) => {
            let admitted = if is_own {
                options.filter.wants_own_data()
            } else {
                options.filter.wants_inherited_data()
            };
            admitted.then_some(RawProperty {
                key,
                slot: PropertySlot::Data(value),
                enumerable,
                writable,
                configurable,
                is_own,
                native_getter: false,
                was_thrown: false,
            })
        }
        PropertySlot::Accessor { get, set } => {
            // Declared-but-absent pairs come from bindings without proper
            // descriptors; they behave like native getters.
            let declared_absent = get.is_none() && set.is_none();
            let native = declared_absent
                || get
                    .as_ref()
                    .is_some_and(|getter| host.is_native_accessor(getter));

            if native && options.filter.wants_native_getters() && options.native_getters_as_values
            {
                let (value, was_thrown) = match &get {
                    Some(getter) => match host.invoke_getter(getter, receiver) {
                        Ok(value) => (value, false),
                        Err(Thrown(thrown)) => (thrown, true),
                    },
                    None => (host.undefined(), false),
                };
                return Some(RawProperty {
                    key,
                    slot: PropertySlot::Data(value),
                    enumerable,
                    writable,
                    configurable,
                    is_own,
                    native_getter: true,
                    was_thrown,
                });
            }

            let admitted = match options.filter {
                PropertyFilter::AllInChain => true,
                PropertyFilter::OwnOnly => is_own,
                PropertyFilter::NativeGettersOnly => native,
                PropertyFilter::OwnAndNativeGetters => is_own || native,
            };
            admitted.then_some(RawProperty {
                key,
                slot: PropertySlot::Accessor { get, set },
                enumerable,
                writable,
                configurable,
                is_own,
                native_getter: false,
                was_thrown: false,
            })
        }
    }
}
