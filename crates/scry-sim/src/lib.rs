//! In-memory object-graph host for exercising the inspector.
//!
//! [`Sim`] owns a scriptable heap of objects — prototype chains, data and
//! accessor properties, symbol keys, collections and their weak variants,
//! one-shot iterators, nodes, proxies — and implements the inspector's
//! [`Host`](scry_inspect::host::Host) trait over it. Object graphs are built
//! imperatively, the way a test sets up runtime state.

mod heap;
mod host;

pub use heap::{ObjectId, Value};

use std::cell::RefCell;
use std::collections::VecDeque;

use smol_str::SmolStr;

use scry_inspect::host::NodeInfo;

use heap::{Behavior, Heap, ObjectData, ObjectKind, Property, Slot};

pub struct Sim {
    heap: RefCell<Heap>,
    object_prototype: ObjectId,
    function_prototype: ObjectId,
}

impl Default for Sim {
    fn default() -> Self {
        Self::new()
    }
}

impl Sim {
    pub fn new() -> Self {
        let mut heap = Heap::default();
        let mut object_prototype = ObjectData::new(ObjectKind::Plain, "Object", None);
        object_prototype.constructor_name = Some(SmolStr::new_static("Object"));
        let object_prototype = heap.alloc(object_prototype);
        let function_prototype = heap.alloc(ObjectData::new(
            ObjectKind::Plain,
            "Function",
            Some(object_prototype),
        ));
        Self {
            heap: RefCell::new(heap),
            object_prototype,
            function_prototype,
        }
    }

    pub fn object_prototype(&self) -> ObjectId {
        self.object_prototype
    }

    fn alloc(&self, data: ObjectData) -> ObjectId {
        self.heap.borrow_mut().alloc(data)
    }

    /// Plain object with the default prototype.
    pub fn object(&self) -> ObjectId {
        let mut data = ObjectData::new(ObjectKind::Plain, "Object", Some(self.object_prototype));
        data.constructor_name = Some(SmolStr::new_static("Object"));
        self.alloc(data)
    }

    /// Plain object without a prototype.
    pub fn bare_object(&self) -> ObjectId {
        self.alloc(ObjectData::new(ObjectKind::Plain, "Object", None))
    }

    /// Instance of a user-defined constructor, with its own prototype level.
    pub fn instance_of(&self, constructor: &str) -> ObjectId {
        let mut proto = ObjectData::new(ObjectKind::Plain, "Object", Some(self.object_prototype));
        proto.constructor_name = Some(SmolStr::new(constructor));
        let proto = self.alloc(proto);
        let mut data = ObjectData::new(ObjectKind::Plain, "Object", Some(proto));
        data.constructor_name = Some(SmolStr::new(constructor));
        self.alloc(data)
    }

    pub fn array(&self, elements: Vec<Value>) -> ObjectId {
        self.alloc(ObjectData::new(
            ObjectKind::Array { elements },
            "Array",
            Some(self.object_prototype),
        ))
    }

    pub fn function(&self, source: &str) -> ObjectId {
        self.alloc_function(source, false, Behavior::Inert)
    }

    fn alloc_function(&self, source: &str, native: bool, behavior: Behavior) -> ObjectId {
        self.alloc(ObjectData::new(
            ObjectKind::Function {
                source: source.to_string(),
                native,
                behavior,
            },
            "Function",
            Some(self.function_prototype),
        ))
    }

    /// Getter function that returns `result` when invoked.
    pub fn getter(&self, result: Value) -> ObjectId {
        self.alloc_function("function () { return this._value; }", false, Behavior::Returns(result))
    }

    /// Getter whose source carries the native-code marker.
    pub fn native_getter(&self, result: Value) -> ObjectId {
        self.alloc_function(
            "function () {\n    [native code]\n}",
            true,
            Behavior::Returns(result),
        )
    }

    /// Native getter that throws `thrown` when invoked.
    pub fn throwing_native_getter(&self, thrown: Value) -> ObjectId {
        self.alloc_function(
            "function () {\n    [native code]\n}",
            true,
            Behavior::Throws(thrown),
        )
    }

    pub fn symbol(&self, description: &str) -> ObjectId {
        self.alloc(ObjectData::new(
            ObjectKind::Symbol {
                description: Some(SmolStr::new(description)),
            },
            "Symbol",
            Some(self.object_prototype),
        ))
    }

    pub fn map_object(&self, entries: Vec<(Value, Value)>) -> ObjectId {
        self.alloc(ObjectData::new(
            ObjectKind::Map { entries },
            "Map",
            Some(self.object_prototype),
        ))
    }

    pub fn set_object(&self, values: Vec<Value>) -> ObjectId {
        self.alloc(ObjectData::new(
            ObjectKind::Set { values },
            "Set",
            Some(self.object_prototype),
        ))
    }

    pub fn weak_map_object(&self, entries: Vec<(Value, Value)>) -> ObjectId {
        self.alloc(ObjectData::new(
            ObjectKind::WeakMap { entries },
            "WeakMap",
            Some(self.object_prototype),
        ))
    }

    pub fn weak_set_object(&self, values: Vec<Value>) -> ObjectId {
        self.alloc(ObjectData::new(
            ObjectKind::WeakSet { values },
            "WeakSet",
            Some(self.object_prototype),
        ))
    }

    /// One-shot iterator over `values`.
    pub fn iterator_object(&self, values: Vec<Value>) -> ObjectId {
        self.alloc(ObjectData::new(
            ObjectKind::Iterator {
                remaining: VecDeque::from(values),
            },
            "Array Iterator",
            Some(self.object_prototype),
        ))
    }

    /// `source` is the full textual form, e.g. `/ab+c/g`.
    pub fn regexp(&self, source: &str) -> ObjectId {
        self.alloc(ObjectData::new(
            ObjectKind::Regexp {
                source: source.to_string(),
            },
            "RegExp",
            Some(self.object_prototype),
        ))
    }

    pub fn date(&self, text: &str) -> ObjectId {
        self.alloc(ObjectData::new(
            ObjectKind::Date {
                text: text.to_string(),
            },
            "Date",
            Some(self.object_prototype),
        ))
    }

    pub fn error(&self, message: &str) -> ObjectId {
        self.alloc(ObjectData::new(
            ObjectKind::Error {
                message: message.to_string(),
            },
            "Error",
            Some(self.object_prototype),
        ))
    }

    pub fn proxy(&self, target: ObjectId) -> ObjectId {
        self.alloc(ObjectData::new(
            ObjectKind::Proxy { target },
            "Proxy",
            Some(self.object_prototype),
        ))
    }

    pub fn node(&self, info: NodeInfo) -> ObjectId {
        let class_name = match &info {
            NodeInfo::Element { .. } => "HTMLElement",
            NodeInfo::Text { .. } => "Text",
            NodeInfo::Comment { .. } => "Comment",
            NodeInfo::Doctype { .. } => "DocumentType",
        };
        self.alloc(ObjectData::new(
            ObjectKind::Node { info },
            class_name,
            Some(self.object_prototype),
        ))
    }

    pub fn class_object(&self, name: &str) -> ObjectId {
        self.alloc(ObjectData::new(
            ObjectKind::Class {
                name: SmolStr::new(name),
            },
            "Function",
            Some(self.function_prototype),
        ))
    }

    /// Enumerable data property.
    pub fn define(&self, object: ObjectId, name: &str, value: impl Into<Value>) {
        self.heap
            .borrow_mut()
            .get_mut(object)
            .props
            .insert(SmolStr::new(name), Property::data(value.into()));
    }

    /// Non-enumerable data property.
    pub fn define_hidden(&self, object: ObjectId, name: &str, value: impl Into<Value>) {
        self.heap
            .borrow_mut()
            .get_mut(object)
            .props
            .insert(SmolStr::new(name), Property::hidden(value.into()));
    }

    pub fn define_accessor(
        &self,
        object: ObjectId,
        name: &str,
        get: Option<ObjectId>,
        set: Option<ObjectId>,
        enumerable: bool,
    ) {
        self.heap.borrow_mut().get_mut(object).props.insert(
            SmolStr::new(name),
            Property {
                slot: Slot::Accessor {
                    get: get.map(Value::Object),
                    set: set.map(Value::Object),
                },
                enumerable,
                writable: false,
                configurable: true,
            },
        );
    }

    pub fn define_symbol_property(&self, object: ObjectId, symbol: ObjectId, value: Value) {
        self.heap
            .borrow_mut()
            .get_mut(object)
            .symbol_props
            .push((symbol, Property::data(value)));
    }

    pub fn define_internal(&self, object: ObjectId, name: &str, value: Value) {
        self.heap
            .borrow_mut()
            .get_mut(object)
            .internal_props
            .push((SmolStr::new(name), value));
    }

    pub fn set_proto(&self, object: ObjectId, proto: Option<ObjectId>) {
        self.heap.borrow_mut().get_mut(object).proto = proto;
    }

    pub fn set_class_name(&self, object: ObjectId, name: &str) {
        self.heap.borrow_mut().get_mut(object).class_name = SmolStr::new(name);
    }

    pub fn set_constructor_name(&self, object: ObjectId, name: Option<&str>) {
        self.heap.borrow_mut().get_mut(object).constructor_name = name.map(SmolStr::new);
    }

    /// Makes string coercion of `object` throw `thrown`.
    pub fn throw_on_coerce(&self, object: ObjectId, thrown: Value) {
        self.heap.borrow_mut().get_mut(object).coerce_throws = Some(thrown);
    }

    /// Makes `object` report `undefined` to `typeof` while staying a live
    /// collection.
    pub fn mark_host_collection(&self, object: ObjectId) {
        let mut heap = self.heap.borrow_mut();
        let data = heap.get_mut(object);
        data.host_collection = true;
        data.class_name = SmolStr::new_static("HTMLAllCollection");
    }
}
