//! Session facade owning the host and registry.

use tracing::debug;

use crate::collections;
use crate::describe::{resolved_subtype, DescribeOptions};
use crate::enumerate::{enumerate, EnumerateOptions, RawProperty};
use crate::error::InspectError;
use crate::host::{Host, Primitive, PropertyKey, PropertySlot};
use crate::protocol::{CollectionEntry, ObjectHandle, PropertyDescriptor};
use crate::registry::Registry;

/// Session-scoped inspector tying a host to its object registry.
///
/// One instance per inspected session. Every operation is synchronous and
/// runs to completion within one call; pagination bounds per-call work.
pub struct Inspector<H: Host> {
    pub(crate) host: H,
    pub(crate) registry: Registry<H::Value>,
}

impl<H: Host> Inspector<H> {
    pub fn new(host: H, session_id: u32) -> Self {
        Self {
            host,
            registry: Registry::new(session_id),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn session_id(&self) -> u32 {
        self.registry.session_id()
    }

    /// Binds `value` to a fresh handle, registered under `group` if given.
    pub fn bind(&mut self, value: H::Value, group: Option<&str>) -> ObjectHandle {
        self.registry.bind(value, group)
    }

    /// Resolves a handle to its live value.
    pub fn resolve(&self, handle: ObjectHandle) -> Result<&H::Value, InspectError> {
        self.registry.resolve(handle).ok_or(InspectError::NotFound)
    }

    /// Releases one handle. Idempotent.
    pub fn release(&mut self, handle: ObjectHandle) {
        self.registry.release(handle);
    }

    /// Releases every handle in `group` and forgets it.
    pub fn release_group(&mut self, group: &str) {
        self.registry.release_group(group);
    }

    /// Saves a value into the `$1..$99` ring and returns its index.
    /// Undefined and null are never saved.
    pub fn save_result(&mut self, value: H::Value) -> Option<u32> {
        if matches!(
            self.host.primitive(&value),
            Some(Primitive::Undefined | Primitive::Null)
        ) {
            return None;
        }
        let Self { host, registry } = self;
        Some(registry.save_result(value, |a, b| host.same_value(a, b)))
    }

    /// Value saved at 1-based `index`, if still present.
    pub fn saved_result(&self, index: u32) -> Option<&H::Value> {
        self.registry.saved_result(index)
    }

    /// Enumerates the properties of the object behind `handle`, wrapping
    /// each descriptor's values under the handle's own group.
    pub fn properties(
        &mut self,
        handle: ObjectHandle,
        options: EnumerateOptions,
    ) -> Result<Vec<PropertyDescriptor>, InspectError> {
        let object = self.resolve(handle)?.clone();
        let group = self.registry.group_name(handle);
        debug!("properties handle={handle:?} filter={:?}", options.filter);
        let raw = enumerate(&self.host, &object, options);
        Ok(raw
            .into_iter()
            .map(|property| self.wrap_property(property, group.as_deref()))
            .collect())
    }

    /// Engine-level internal properties of the object behind `handle`.
    pub fn internal_properties(
        &mut self,
        handle: ObjectHandle,
    ) -> Result<Vec<PropertyDescriptor>, InspectError> {
        let object = self.resolve(handle)?.clone();
        let group = self.registry.group_name(handle);
        let internals = self.host.internal_properties(&object);
        Ok(internals
            .into_iter()
            .map(|(name, value)| {
                let options = DescribeOptions {
                    group: group.as_deref(),
                    ..DescribeOptions::default()
                };
                PropertyDescriptor {
                    name,
                    value: Some(self.describe(&value, options)),
                    get: None,
                    set: None,
                    enumerable: None,
                    writable: None,
                    configurable: None,
                    is_own: None,
                    symbol: None,
                    native_getter: None,
                    was_thrown: None,
                }
            })
            .collect())
    }

    /// Bounded `(key, value)` entries of the collection behind `handle`.
    pub fn collection_entries(
        &mut self,
        handle: ObjectHandle,
        fetch_start: usize,
        fetch_count: usize,
    ) -> Result<Vec<CollectionEntry>, InspectError> {
        let object = self.resolve(handle)?.clone();
        let group = self.registry.group_name(handle);
        let subtype =
            resolved_subtype(&self.host, &object).ok_or(InspectError::NotACollection)?;
        let raw = collections::entries(&self.host, &object, subtype, fetch_start, fetch_count)?;
        debug!(
            "entries handle={handle:?} subtype={subtype:?} count={}",
            raw.len()
        );
        let options = DescribeOptions {
            group: group.as_deref(),
            ..DescribeOptions::default()
        };
        Ok(raw
            .into_iter()
            .map(|entry| CollectionEntry {
                key: entry.key.map(|key| self.describe(&key, options)),
                value: self.describe(&entry.value, options),
            })
            .collect())
    }

    fn wrap_property(
        &mut self,
        raw: RawProperty<H::Value>,
        group: Option<&str>,
    ) -> PropertyDescriptor {
        let options = DescribeOptions {
            group,
            ..DescribeOptions::default()
        };
        let (name, symbol) = match raw.key {
            PropertyKey::Name(name) => (name, None),
            PropertyKey::Symbol {
                description,
                symbol,
            } => {
                let wrapped = self.describe(&symbol, options);
                (description, Some(wrapped))
            }
        };
        let mut descriptor = PropertyDescriptor {
            name,
            value: None,
            get: None,
            set: None,
            enumerable: Some(raw.enumerable),
            writable: Some(raw.writable),
            configurable: Some(raw.configurable),
            is_own: raw.is_own.then_some(true),
            symbol,
            native_getter: raw.native_getter.then_some(true),
            was_thrown: raw.was_thrown.then_some(true),
        };
        match raw.slot {
            PropertySlot::Data(value) => {
                descriptor.value = Some(self.describe(&value, options));
            }
            PropertySlot::Accessor { get, set } => {
                // An accessor descriptor always carries at least one side,
                // even when both are declared but absent.
                if get.is_none() && set.is_none() {
                    let undefined = self.host.undefined();
                    descriptor.get = Some(self.describe(&undefined, options));
                } else {
                    if let Some(get) = get {
                        descriptor.get = Some(self.describe(&get, options));
                    }
                    if let Some(set) = set {
                        descriptor.set = Some(self.describe(&set, options));
                    }
                }
            }
        }
        descriptor
    }
}
