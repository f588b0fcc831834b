//! Value descriptor construction.
//!
//! Converts a single live value into a wire-safe descriptor: primitives and
//! big integers are inlined, objects get a handle bound in the registry plus
//! subtype/class tagging and a type-specific description. Descriptor
//! building never fails; host-level throws degrade to descriptions of the
//! thrown value and finally to a fixed placeholder.

use smol_str::SmolStr;

use crate::host::{Host, NodeInfo, Primitive, Thrown};
use crate::preview::SecondLevel;
use crate::protocol::{RemoteValue, Subtype, ValueKind};
use crate::registry::CONSOLE_GROUP;
use crate::session::Inspector;

pub(crate) const COERCION_FAILED: &str = "<failed to convert exception to string>";

/// Switches for one descriptor build.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescribeOptions<'a> {
    /// Object group nested handles are registered under.
    pub group: Option<&'a str>,
    /// Force a by-value descriptor even for objects.
    pub force_value: bool,
    /// Attach a bounded preview to object descriptors.
    pub generate_preview: bool,
}

impl<H: Host> Inspector<H> {
    /// Builds a wire descriptor for `value`.
    pub fn describe(&mut self, value: &H::Value, options: DescribeOptions<'_>) -> RemoteValue {
        let host_collection = self.host.is_host_collection(value);
        let kind = self.host.kind(value);

        if !host_collection {
            if let Some(primitive) = self.host.primitive(value) {
                return describe_primitive(kind, &primitive);
            }
            if options.force_value {
                let mut out = base(kind);
                out.value = self.host.to_json(value);
                return out;
            }
        }

        let handle = self.registry.bind(value.clone(), options.group);
        let subtype = resolved_subtype(&self.host, value);
        let mut out = base(kind);
        out.object_id = Some(handle);
        out.subtype = subtype;
        out.class_name = Some(self.host.class_name(value).to_string());
        out.description = Some(self.describe_text(value));
        out.size = size_of(&self.host, value, subtype);

        if options.generate_preview && (kind == ValueKind::Object || host_collection) {
            if subtype == Some(Subtype::Proxy) {
                // Proxy semantics are not faithfully representable; preview
                // the target and say so.
                if let Some(target) = self.host.proxy_target(value) {
                    let mut preview = self.build_preview(&target, None, SecondLevel::Auto);
                    preview.lossless = false;
                    out.preview = Some(preview);
                }
            } else {
                out.preview = Some(self.build_preview(value, None, SecondLevel::Auto));
            }
        }
        out
    }

    /// Descriptor without live-object access: `typeof` plus a string
    /// coercion, no handle, no recursion.
    pub fn fallback_describe(&self, value: &H::Value) -> RemoteValue {
        let kind = self.host.kind(value);
        match self.host.primitive(value) {
            Some(Primitive::Undefined) => base(kind),
            Some(primitive) => describe_primitive(kind, &primitive),
            None => {
                let mut out = base(kind);
                out.description = Some(self.coerce_or_placeholder(value));
                out
            }
        }
    }

    /// Descriptor with a table-shaped preview: every row recurses, columns
    /// optionally filter the row keys.
    pub fn describe_table(&mut self, value: &H::Value, columns: Option<&[SmolStr]>) -> RemoteValue {
        let mut out = self.describe(
            value,
            DescribeOptions {
                group: Some(CONSOLE_GROUP),
                ..DescribeOptions::default()
            },
        );
        if out.object_id.is_some() {
            let second = match columns {
                Some(keys) => SecondLevel::Keys(keys),
                None => SecondLevel::All,
            };
            out.preview = Some(self.build_preview(value, None, second));
        }
        out
    }

    /// Type-specific textual description of an object value.
    pub(crate) fn describe_text(&self, value: &H::Value) -> String {
        match resolved_subtype(&self.host, value) {
            Some(Subtype::Regexp | Subtype::Date | Subtype::Error) => {
                self.coerce_or_placeholder(value)
            }
            Some(Subtype::Proxy) => "Proxy".to_string(),
            Some(Subtype::Node) => match self.host.node_info(value) {
                Some(info) => node_summary(&info),
                None => self.class_or_constructor(value),
            },
            Some(Subtype::Array) => {
                let class_name = self.host.class_name(value);
                match self.host.array_length(value) {
                    Some(length) => format!("{class_name}[{length}]"),
                    None => class_name.to_string(),
                }
            }
            Some(Subtype::Class) => self.function_text(value),
            _ => match self.host.kind(value) {
                ValueKind::Function => self.function_text(value),
                ValueKind::Symbol => self.coerce_or_placeholder(value),
                _ => self.class_or_constructor(value),
            },
        }
    }

    fn function_text(&self, value: &H::Value) -> String {
        self.host
            .function_source(value)
            .unwrap_or_else(|| self.coerce_or_placeholder(value))
    }

    fn class_or_constructor(&self, value: &H::Value) -> String {
        let class_name = self.host.class_name(value);
        if class_name == "Object" {
            if let Some(constructor) = self.host.constructor_name(value) {
                return constructor.to_string();
            }
        }
        class_name.to_string()
    }

    /// String coercion that cannot fail: a throwing coercion degrades to the
    /// thrown value's text, then to a fixed placeholder.
    pub(crate) fn coerce_or_placeholder(&self, value: &H::Value) -> String {
        match self.host.coerce_string(value) {
            Ok(text) => text,
            Err(Thrown(thrown)) => match self.host.coerce_string(&thrown) {
                Ok(text) => text,
                Err(_) => COERCION_FAILED.to_string(),
            },
        }
    }
}

pub(crate) fn base(kind: ValueKind) -> RemoteValue {
    RemoteValue {
        kind,
        subtype: None,
        value: None,
        description: None,
        object_id: None,
        class_name: None,
        size: None,
        preview: None,
    }
}

fn describe_primitive(kind: ValueKind, primitive: &Primitive) -> RemoteValue {
    let mut out = base(kind);
    match primitive {
        // Undefined is not sent by value over the wire.
        Primitive::Undefined => {}
        Primitive::Null => {
            out.kind = ValueKind::Object;
            out.subtype = Some(Subtype::Null);
            out.value = Some(serde_json::Value::Null);
        }
        Primitive::Bool(flag) => out.value = Some(serde_json::Value::Bool(*flag)),
        Primitive::Number(number) => {
            // NaN and the infinities have no JSON payload, only a
            // description.
            out.value = serde_json::Number::from_f64(*number).map(serde_json::Value::Number);
            out.description = Some(number_text(*number));
        }
        Primitive::BigInt(digits) => {
            let text = format!("{digits}n");
            out.value = Some(serde_json::Value::String(text.clone()));
            out.description = Some(text);
        }
        Primitive::String(text) => out.value = Some(serde_json::Value::String(text.clone())),
    }
    out
}

/// Human-readable number text; negative zero keeps its sign.
pub(crate) fn number_text(number: f64) -> String {
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

fn node_summary(info: &NodeInfo) -> String {
    match info {
        NodeInfo::Element { tag, id: Some(id), .. } => format!("<{tag} id=\"{id}\">"),
        NodeInfo::Element {
            tag,
            class_attr: Some(class_attr),
            ..
        } => format!("<{tag} class=\"{class_attr}\">"),
        NodeInfo::Element {
            tag,
            type_attr: Some(type_attr),
            ..
        } => format!("<{tag} type=\"{type_attr}\">"),
        NodeInfo::Element { tag, .. } => format!("<{tag}>"),
        NodeInfo::Text { text } => format!("\"{text}\""),
        NodeInfo::Comment { text } => format!("<!--{text}-->"),
        NodeInfo::Doctype { name } => format!("<!DOCTYPE {name}>"),
    }
}

/// Host classification augmented with the array-likeness heuristic.
pub(crate) fn resolved_subtype<H: Host>(host: &H, value: &H::Value) -> Option<Subtype> {
    if let Some(subtype) = host.subtype(value) {
        return Some(subtype);
    }
    if host.is_host_collection(value) {
        return Some(Subtype::Array);
    }
    if host.identity(value).is_some()
        && host.has_splice(value)
        && host.array_length(value).is_some()
    {
        return Some(Subtype::Array);
    }
    None
}

/// Length of `value` if it displays as an array.
pub(crate) fn array_like_length<H: Host>(host: &H, value: &H::Value) -> Option<u64> {
    if matches!(resolved_subtype(host, value), Some(Subtype::Array)) {
        host.array_length(value)
    } else {
        None
    }
}

/// Element or entry count for countable subtypes.
pub(crate) fn size_of<H: Host>(
    host: &H,
    value: &H::Value,
    subtype: Option<Subtype>,
) -> Option<u64> {
    match subtype? {
        Subtype::Array => host.array_length(value),
        Subtype::Map | Subtype::Set => host.collection_size(value),
        Subtype::WeakMap | Subtype::WeakSet => host.weak_collection_size(value),
        _ => None,
    }
}
