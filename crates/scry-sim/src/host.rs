//! Host trait implementation over the simulated heap.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use scry_inspect::host::{
    Host, NodeInfo, ObjectIdentity, OwnProperty, Primitive, PropertyKey, PropertySlot, Thrown,
};
use scry_inspect::protocol::{Subtype, ValueKind};

use crate::heap::{Behavior, ObjectKind, Property, Slot};
use crate::{ObjectId, Sim, Value};

fn number_string(number: f64) -> String {
    if number == 0.0 && number.is_sign_negative() {
        "-0".to_string()
    } else if number.is_nan() {
        "NaN".to_string()
    } else if number.is_infinite() {
        if number > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if number.fract() == 0.0 && number.abs() < 9e15 {
        format!("{}", number as i64)
    } else {
        format!("{number}")
    }
}

fn convert(property: &Property) -> PropertySlot<Value> {
    match &property.slot {
        Slot::Data(value) => PropertySlot::Data(value.clone()),
        Slot::Accessor { get, set } => PropertySlot::Accessor {
            get: get.clone(),
            set: set.clone(),
        },
    }
}

impl Sim {
    fn symbol_description(&self, symbol: ObjectId) -> SmolStr {
        let heap = self.heap.borrow();
        match &heap.get(symbol).kind {
            ObjectKind::Symbol {
                description: Some(description),
            } => SmolStr::new(format!("Symbol({description})")),
            _ => SmolStr::new_static("Symbol()"),
        }
    }

    fn json_of(&self, value: &Value, visited: &mut FxHashSet<u32>) -> Option<serde_json::Value> {
        match value {
            Value::Undefined | Value::BigInt(_) => None,
            Value::Null => Some(serde_json::Value::Null),
            Value::Bool(flag) => Some(serde_json::Value::Bool(*flag)),
            Value::Number(number) => Some(
                serde_json::Number::from_f64(*number)
                    .map_or(serde_json::Value::Null, serde_json::Value::Number),
            ),
            Value::String(text) => Some(serde_json::Value::String(text.to_string())),
            Value::Object(id) => {
                if !visited.insert(id.0) {
                    return None;
                }
                enum Shape {
                    Skip,
                    Elements(Vec<Value>),
                    Fields(Vec<(SmolStr, Value)>),
                    Opaque,
                }
                let shape = {
                    let heap = self.heap.borrow();
                    let data = heap.get(*id);
                    match &data.kind {
                        ObjectKind::Function { .. } | ObjectKind::Symbol { .. } => Shape::Skip,
                        ObjectKind::Array { elements } => Shape::Elements(elements.clone()),
                        ObjectKind::Plain => Shape::Fields(
                            data.props
                                .iter()
                                .filter(|(_, property)| property.enumerable)
                                .filter_map(|(name, property)| match &property.slot {
                                    Slot::Data(value) => Some((name.clone(), value.clone())),
                                    Slot::Accessor { .. } => None,
                                })
                                .collect(),
                        ),
                        _ => Shape::Opaque,
                    }
                };
                let json = match shape {
                    Shape::Skip => None,
                    Shape::Elements(elements) => Some(serde_json::Value::Array(
                        elements
                            .iter()
                            .map(|element| {
                                self.json_of(element, visited)
                                    .unwrap_or(serde_json::Value::Null)
                            })
                            .collect(),
                    )),
                    Shape::Fields(fields) => {
                        let mut out = serde_json::Map::new();
                        for (name, field) in fields {
                            if let Some(json) = self.json_of(&field, visited) {
                                out.insert(name.to_string(), json);
                            }
                        }
                        Some(serde_json::Value::Object(out))
                    }
                    Shape::Opaque => Some(serde_json::Value::Object(serde_json::Map::new())),
                };
                visited.remove(&id.0);
                json
            }
        }
    }
}

impl Host for Sim {
    type Value = Value;

    fn kind(&self, value: &Value) -> ValueKind {
        match value {
            Value::Undefined => ValueKind::Undefined,
            Value::Null => ValueKind::Object,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(_) => ValueKind::Number,
            Value::BigInt(_) => ValueKind::Bigint,
            Value::String(_) => ValueKind::String,
            Value::Object(id) => {
                let heap = self.heap.borrow();
                let data = heap.get(*id);
                if data.host_collection {
                    return ValueKind::Undefined;
                }
                match &data.kind {
                    ObjectKind::Function { .. } | ObjectKind::Class { .. } => ValueKind::Function,
                    ObjectKind::Symbol { .. } => ValueKind::Symbol,
                    _ => ValueKind::Object,
                }
            }
        }
    }

    fn primitive(&self, value: &Value) -> Option<Primitive> {
        match value {
            Value::Undefined => Some(Primitive::Undefined),
            Value::Null => Some(Primitive::Null),
            Value::Bool(flag) => Some(Primitive::Bool(*flag)),
            Value::Number(number) => Some(Primitive::Number(*number)),
            Value::BigInt(digits) => Some(Primitive::BigInt(digits.to_string())),
            Value::String(text) => Some(Primitive::String(text.to_string())),
            Value::Object(_) => None,
        }
    }

    fn subtype(&self, value: &Value) -> Option<Subtype> {
        match value {
            Value::Null => Some(Subtype::Null),
            Value::Object(id) => {
                let heap = self.heap.borrow();
                match &heap.get(*id).kind {
                    ObjectKind::Array { .. } => Some(Subtype::Array),
                    ObjectKind::Map { .. } => Some(Subtype::Map),
                    ObjectKind::Set { .. } => Some(Subtype::Set),
                    ObjectKind::WeakMap { .. } => Some(Subtype::WeakMap),
                    ObjectKind::WeakSet { .. } => Some(Subtype::WeakSet),
                    ObjectKind::Iterator { .. } => Some(Subtype::Iterator),
                    ObjectKind::Regexp { .. } => Some(Subtype::Regexp),
                    ObjectKind::Date { .. } => Some(Subtype::Date),
                    ObjectKind::Error { .. } => Some(Subtype::Error),
                    ObjectKind::Proxy { .. } => Some(Subtype::Proxy),
                    ObjectKind::Node { .. } => Some(Subtype::Node),
                    ObjectKind::Class { .. } => Some(Subtype::Class),
                    ObjectKind::Plain
                    | ObjectKind::Function { .. }
                    | ObjectKind::Symbol { .. } => None,
                }
            }
            _ => None,
        }
    }

    fn is_host_collection(&self, value: &Value) -> bool {
        match value {
            Value::Object(id) => self.heap.borrow().get(*id).host_collection,
            _ => false,
        }
    }

    fn identity(&self, value: &Value) -> Option<ObjectIdentity> {
        match value {
            Value::Object(id) => Some(ObjectIdentity(u64::from(id.0))),
            _ => None,
        }
    }

    fn same_value(&self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => {
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b && a.is_sign_negative() == b.is_sign_negative()
                }
            }
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => false,
        }
    }

    fn undefined(&self) -> Value {
        Value::Undefined
    }

    fn class_name(&self, value: &Value) -> SmolStr {
        match value {
            Value::Object(id) => self.heap.borrow().get(*id).class_name.clone(),
            _ => SmolStr::new_static("Object"),
        }
    }

    fn constructor_name(&self, value: &Value) -> Option<SmolStr> {
        match value {
            Value::Object(id) => self.heap.borrow().get(*id).constructor_name.clone(),
            _ => None,
        }
    }

    fn coerce_string(&self, value: &Value) -> Result<String, Thrown<Value>> {
        let text = match value {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(flag) => flag.to_string(),
            Value::Number(number) => number_string(*number),
            Value::BigInt(digits) => digits.to_string(),
            Value::String(text) => text.to_string(),
            Value::Object(id) => {
                let heap = self.heap.borrow();
                let data = heap.get(*id);
                if let Some(thrown) = &data.coerce_throws {
                    return Err(Thrown(thrown.clone()));
                }
                match &data.kind {
                    ObjectKind::Regexp { source } => source.clone(),
                    ObjectKind::Date { text } => text.clone(),
                    ObjectKind::Error { message } => {
                        if message.is_empty() {
                            data.class_name.to_string()
                        } else {
                            format!("{}: {message}", data.class_name)
                        }
                    }
                    ObjectKind::Function { source, .. } => source.clone(),
                    ObjectKind::Class { name } => format!("class {name} {{ }}"),
                    ObjectKind::Symbol { description } => match description {
                        Some(description) => format!("Symbol({description})"),
                        None => "Symbol()".to_string(),
                    },
                    _ => format!("[object {}]", data.class_name),
                }
            }
        };
        Ok(text)
    }

    fn to_json(&self, value: &Value) -> Option<serde_json::Value> {
        self.json_of(value, &mut FxHashSet::default())
    }

    fn function_source(&self, value: &Value) -> Option<String> {
        match value {
            Value::Object(id) => {
                let heap = self.heap.borrow();
                match &heap.get(*id).kind {
                    ObjectKind::Function { source, .. } => Some(source.clone()),
                    ObjectKind::Class { name } => Some(format!("class {name} {{ }}")),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn node_info(&self, value: &Value) -> Option<NodeInfo> {
        match value {
            Value::Object(id) => {
                let heap = self.heap.borrow();
                match &heap.get(*id).kind {
                    ObjectKind::Node { info } => Some(info.clone()),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn own_properties(&self, value: &Value) -> Vec<OwnProperty<Value>> {
        let Value::Object(id) = value else {
            return Vec::new();
        };
        let heap = self.heap.borrow();
        let data = heap.get(*id);
        let mut out = Vec::new();
        if let ObjectKind::Array { elements } = &data.kind {
            for (index, element) in elements.iter().enumerate() {
                out.push(OwnProperty {
                    key: PropertyKey::Name(SmolStr::new(index.to_string())),
                    slot: PropertySlot::Data(element.clone()),
                    enumerable: true,
                    writable: true,
                    configurable: true,
                });
            }
            out.push(OwnProperty {
                key: PropertyKey::Name(SmolStr::new_static("length")),
                slot: PropertySlot::Data(Value::Number(elements.len() as f64)),
                enumerable: false,
                writable: true,
                configurable: false,
            });
        }
        for (name, property) in &data.props {
            out.push(OwnProperty {
                key: PropertyKey::Name(name.clone()),
                slot: convert(property),
                enumerable: property.enumerable,
                writable: property.writable,
                configurable: property.configurable,
            });
        }
        out
    }

    fn own_symbol_properties(&self, value: &Value) -> Vec<OwnProperty<Value>> {
        let Value::Object(id) = value else {
            return Vec::new();
        };
        let symbols: Vec<(ObjectId, Property)> = {
            let heap = self.heap.borrow();
            heap.get(*id).symbol_props.clone()
        };
        symbols
            .into_iter()
            .map(|(symbol, property)| OwnProperty {
                key: PropertyKey::Symbol {
                    description: self.symbol_description(symbol),
                    symbol: Value::Object(symbol),
                },
                slot: convert(&property),
                enumerable: property.enumerable,
                writable: property.writable,
                configurable: property.configurable,
            })
            .collect()
    }

    fn prototype_of(&self, value: &Value) -> Option<Value> {
        match value {
            Value::Object(id) => self.heap.borrow().get(*id).proto.map(Value::Object),
            _ => None,
        }
    }

    fn internal_properties(&self, value: &Value) -> Vec<(SmolStr, Value)> {
        match value {
            Value::Object(id) => self.heap.borrow().get(*id).internal_props.clone(),
            _ => Vec::new(),
        }
    }

    fn array_length(&self, value: &Value) -> Option<u64> {
        let Value::Object(id) = value else {
            return None;
        };
        let heap = self.heap.borrow();
        let data = heap.get(*id);
        match &data.kind {
            ObjectKind::Array { elements } => Some(elements.len() as u64),
            _ => match data.props.get("length") {
                Some(Property {
                    slot: Slot::Data(Value::Number(length)),
                    ..
                }) if length.is_finite() && *length >= 0.0 => Some(*length as u64),
                _ => None,
            },
        }
    }

    fn has_splice(&self, value: &Value) -> bool {
        let Value::Object(id) = value else {
            return false;
        };
        let heap = self.heap.borrow();
        let mut current = Some(*id);
        while let Some(id) = current {
            let data = heap.get(id);
            if let Some(Property {
                slot: Slot::Data(Value::Object(function)),
                ..
            }) = data.props.get("splice")
            {
                if matches!(heap.get(*function).kind, ObjectKind::Function { .. }) {
                    return true;
                }
            }
            current = data.proto;
        }
        false
    }

    fn indexed_property(&self, value: &Value, index: u64) -> Option<OwnProperty<Value>> {
        let Value::Object(id) = value else {
            return None;
        };
        let heap = self.heap.borrow();
        let data = heap.get(*id);
        let name = SmolStr::new(index.to_string());
        match &data.kind {
            ObjectKind::Array { elements } => {
                elements.get(index as usize).map(|element| OwnProperty {
                    key: PropertyKey::Name(name),
                    slot: PropertySlot::Data(element.clone()),
                    enumerable: true,
                    writable: true,
                    configurable: true,
                })
            }
            _ => data.props.get(name.as_str()).map(|property| OwnProperty {
                key: PropertyKey::Name(name.clone()),
                slot: convert(property),
                enumerable: property.enumerable,
                writable: property.writable,
                configurable: property.configurable,
            }),
        }
    }

    fn collection_size(&self, value: &Value) -> Option<u64> {
        let Value::Object(id) = value else {
            return None;
        };
        let heap = self.heap.borrow();
        match &heap.get(*id).kind {
            ObjectKind::Map { entries } => Some(entries.len() as u64),
            ObjectKind::Set { values } => Some(values.len() as u64),
            _ => None,
        }
    }

    fn weak_collection_size(&self, value: &Value) -> Option<u64> {
        let Value::Object(id) = value else {
            return None;
        };
        let heap = self.heap.borrow();
        match &heap.get(*id).kind {
            ObjectKind::WeakMap { entries } => Some(entries.len() as u64),
            ObjectKind::WeakSet { values } => Some(values.len() as u64),
            _ => None,
        }
    }

    fn set_values(&self, value: &Value) -> Vec<Value> {
        let Value::Object(id) = value else {
            return Vec::new();
        };
        let heap = self.heap.borrow();
        match &heap.get(*id).kind {
            ObjectKind::Set { values } => values.clone(),
            _ => Vec::new(),
        }
    }

    fn map_entries(&self, value: &Value) -> Vec<(Value, Value)> {
        let Value::Object(id) = value else {
            return Vec::new();
        };
        let heap = self.heap.borrow();
        match &heap.get(*id).kind {
            ObjectKind::Map { entries } => entries.clone(),
            _ => Vec::new(),
        }
    }

    fn weak_entries(&self, value: &Value, limit: usize) -> Vec<(Option<Value>, Value)> {
        let Value::Object(id) = value else {
            return Vec::new();
        };
        let heap = self.heap.borrow();
        match &heap.get(*id).kind {
            ObjectKind::WeakMap { entries } => entries
                .iter()
                .take(limit)
                .map(|(key, value)| (Some(key.clone()), value.clone()))
                .collect(),
            ObjectKind::WeakSet { values } => values
                .iter()
                .take(limit)
                .map(|value| (None, value.clone()))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn iterator_entries(&self, value: &Value, limit: usize) -> Vec<Value> {
        let Value::Object(id) = value else {
            return Vec::new();
        };
        let mut heap = self.heap.borrow_mut();
        match &mut heap.get_mut(*id).kind {
            ObjectKind::Iterator { remaining } => {
                let take = limit.min(remaining.len());
                remaining.drain(..take).collect()
            }
            _ => Vec::new(),
        }
    }

    fn proxy_target(&self, value: &Value) -> Option<Value> {
        let Value::Object(id) = value else {
            return None;
        };
        let heap = self.heap.borrow();
        match &heap.get(*id).kind {
            ObjectKind::Proxy { target } => Some(Value::Object(*target)),
            _ => None,
        }
    }

    fn is_native_accessor(&self, function: &Value) -> bool {
        let Value::Object(id) = function else {
            return false;
        };
        let heap = self.heap.borrow();
        match &heap.get(*id).kind {
            ObjectKind::Function { source, native, .. } => {
                *native || source.contains("[native code]")
            }
            _ => false,
        }
    }

    fn invoke_getter(&self, getter: &Value, receiver: &Value) -> Result<Value, Thrown<Value>> {
        let _ = receiver;
        let Value::Object(id) = getter else {
            return Ok(Value::Undefined);
        };
        let behavior = {
            let heap = self.heap.borrow();
            match &heap.get(*id).kind {
                ObjectKind::Function { behavior, .. } => behavior.clone(),
                _ => Behavior::Inert,
            }
        };
        match behavior {
            Behavior::Inert => Ok(Value::Undefined),
            Behavior::Returns(value) => Ok(value),
            Behavior::Throws(thrown) => Err(Thrown(thrown)),
        }
    }
}
