//! Object heap: an arena of objects addressed by index.
//!
//! Objects reference each other by [`ObjectId`] instead of shared pointers,
//! which keeps cyclic graphs representable and cheap to clone.

use std::collections::VecDeque;

use indexmap::IndexMap;
use smol_str::SmolStr;

use scry_inspect::host::NodeInfo;

/// Index of an object in the heap arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub(crate) u32);

/// A runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    BigInt(i128),
    String(SmolStr),
    Object(ObjectId),
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(SmolStr::new(value))
    }
}

impl From<ObjectId> for Value {
    fn from(value: ObjectId) -> Self {
        Self::Object(value)
    }
}

/// Storage slot of one property.
#[derive(Debug, Clone)]
pub(crate) enum Slot {
    Data(Value),
    Accessor {
        get: Option<Value>,
        set: Option<Value>,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct Property {
    pub slot: Slot,
    pub enumerable: bool,
    pub writable: bool,
    pub configurable: bool,
}

impl Property {
    pub fn data(value: Value) -> Self {
        Self {
            slot: Slot::Data(value),
            enumerable: true,
            writable: true,
            configurable: true,
        }
    }

    pub fn hidden(value: Value) -> Self {
        Self {
            enumerable: false,
            ..Self::data(value)
        }
    }
}

/// What calling a function does.
#[derive(Debug, Clone)]
pub(crate) enum Behavior {
    Inert,
    Returns(Value),
    Throws(Value),
}

#[derive(Debug, Clone)]
pub(crate) enum ObjectKind {
    Plain,
    Array { elements: Vec<Value> },
    Function {
        source: String,
        native: bool,
        behavior: Behavior,
    },
    Symbol { description: Option<SmolStr> },
    Regexp { source: String },
    Date { text: String },
    Error { message: String },
    Map { entries: Vec<(Value, Value)> },
    Set { values: Vec<Value> },
    WeakMap { entries: Vec<(Value, Value)> },
    WeakSet { values: Vec<Value> },
    Iterator { remaining: VecDeque<Value> },
    Proxy { target: ObjectId },
    Node { info: NodeInfo },
    Class { name: SmolStr },
}

#[derive(Debug, Clone)]
pub(crate) struct ObjectData {
    pub kind: ObjectKind,
    pub class_name: SmolStr,
    pub constructor_name: Option<SmolStr>,
    pub proto: Option<ObjectId>,
    pub props: IndexMap<SmolStr, Property>,
    pub symbol_props: Vec<(ObjectId, Property)>,
    pub internal_props: Vec<(SmolStr, Value)>,
    /// Thrown by string coercion, when set.
    pub coerce_throws: Option<Value>,
    /// Reports `undefined` to `typeof` while being a live collection.
    pub host_collection: bool,
}

impl ObjectData {
    pub fn new(kind: ObjectKind, class_name: &str, proto: Option<ObjectId>) -> Self {
        Self {
            kind,
            class_name: SmolStr::new(class_name),
            constructor_name: None,
            proto,
            props: IndexMap::new(),
            symbol_props: Vec::new(),
            internal_props: Vec::new(),
            coerce_throws: None,
            host_collection: false,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Heap {
    objects: Vec<ObjectData>,
}

impl Heap {
    pub fn alloc(&mut self, data: ObjectData) -> ObjectId {
        let id = ObjectId(self.objects.len() as u32);
        self.objects.push(data);
        id
    }

    pub fn get(&self, id: ObjectId) -> &ObjectData {
        &self.objects[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: ObjectId) -> &mut ObjectData {
        &mut self.objects[id.0 as usize]
    }
}
