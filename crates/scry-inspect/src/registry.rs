//! Object registry: handle bindings, object groups, saved results.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::debug;

use crate::protocol::ObjectHandle;

/// Group whose release also clears the saved-result ring.
pub const CONSOLE_GROUP: &str = "console";

const SAVED_RESULT_CAPACITY: u32 = 99;

/// Session-scoped registry mapping opaque handles to live values.
///
/// Handle ids are never reused while bound. Groups allow bulk release of
/// every handle created during one logical operation.
#[derive(Debug)]
pub struct Registry<V> {
    session_id: u32,
    next_id: u64,
    bound: FxHashMap<u64, V>,
    groups: FxHashMap<SmolStr, Vec<u64>>,
    group_of: FxHashMap<u64, SmolStr>,
    /// Slot `i` holds `$(i + 1)`.
    saved: Vec<Option<V>>,
    next_saved_index: u32,
}

impl<V: Clone> Registry<V> {
    pub fn new(session_id: u32) -> Self {
        Self {
            session_id,
            next_id: 1,
            bound: FxHashMap::default(),
            groups: FxHashMap::default(),
            group_of: FxHashMap::default(),
            saved: Vec::new(),
            next_saved_index: 1,
        }
    }

    pub fn session_id(&self) -> u32 {
        self.session_id
    }

    /// Binds `value` to a fresh handle, registering it under `group` if one
    /// is given.
    pub fn bind(&mut self, value: V, group: Option<&str>) -> ObjectHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.bound.insert(id, value);
        if let Some(group) = group.filter(|name| !name.is_empty()) {
            let name = SmolStr::new(group);
            self.groups.entry(name.clone()).or_default().push(id);
            self.group_of.insert(id, name);
        }
        debug!("bind id={id} group={group:?}");
        ObjectHandle {
            session_id: self.session_id,
            id,
        }
    }

    /// Returns the live value bound to `handle`, or `None` if the handle is
    /// unknown, released, or belongs to another session.
    pub fn resolve(&self, handle: ObjectHandle) -> Option<&V> {
        if handle.session_id != self.session_id {
            return None;
        }
        self.bound.get(&handle.id)
    }

    /// Name of the group `handle` was registered under, if any.
    pub fn group_name(&self, handle: ObjectHandle) -> Option<SmolStr> {
        if handle.session_id != self.session_id {
            return None;
        }
        self.group_of.get(&handle.id).cloned()
    }

    /// Removes the binding. Idempotent: releasing an unknown or already
    /// released handle is a no-op.
    pub fn release(&mut self, handle: ObjectHandle) {
        if handle.session_id != self.session_id {
            return;
        }
        self.release_id(handle.id);
    }

    fn release_id(&mut self, id: u64) {
        self.bound.remove(&id);
        self.group_of.remove(&id);
    }

    /// Releases every handle registered under `name` and forgets the group.
    /// Releasing the console group also clears the saved-result ring.
    pub fn release_group(&mut self, name: &str) {
        if let Some(ids) = self.groups.remove(name) {
            debug!("release group {name:?} ({} handles)", ids.len());
            for id in ids {
                self.release_id(id);
            }
        }
        if name == CONSOLE_GROUP {
            self.clear_saved_results();
        }
    }

    pub fn clear_saved_results(&mut self) {
        self.saved.clear();
        self.next_saved_index = 1;
    }

    /// Value saved at 1-based `index`, if still present.
    pub fn saved_result(&self, index: u32) -> Option<&V> {
        index
            .checked_sub(1)
            .and_then(|slot| self.saved.get(slot as usize))
            .and_then(Option::as_ref)
    }

    /// Stores `value` in the `$1..$99` ring and returns its 1-based index.
    ///
    /// A value already present (per `same`) keeps its existing index. The
    /// ring wraps: after index 99 the next save lands on 1 again.
    pub fn save_result(&mut self, value: V, same: impl Fn(&V, &V) -> bool) -> u32 {
        for (slot, existing) in self.saved.iter().enumerate() {
            if let Some(existing) = existing {
                if same(existing, &value) {
                    return slot as u32 + 1;
                }
            }
        }
        let index = self.next_saved_index;
        self.next_saved_index = if index >= SAVED_RESULT_CAPACITY {
            1
        } else {
            index + 1
        };
        let slot = (index - 1) as usize;
        if self.saved.len() <= slot {
            self.saved.resize_with(slot + 1, || None);
        }
        self.saved[slot] = Some(value);
        index
    }
}
