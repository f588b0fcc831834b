//! Wire data model for the inspector.
//!
//! Everything here is plain serde data. The transport layer owns framing and
//! dispatch; the front-end renders these descriptors and dereferences object
//! handles through further requests.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Coarse `typeof`-style classification of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Undefined,
    Boolean,
    Number,
    Bigint,
    String,
    Symbol,
    Function,
    Object,
    /// Property previews only: an accessor pair stands in for its value.
    Accessor,
}

/// Fine-grained classification where the host knows more than `typeof`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subtype {
    Null,
    Array,
    Map,
    Set,
    WeakMap,
    WeakSet,
    Iterator,
    Regexp,
    Date,
    Error,
    Proxy,
    Node,
    Class,
}

/// Opaque identifier bound 1:1 to a live object for the session lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectHandle {
    pub session_id: u32,
    pub id: u64,
}

/// Identifier for one frame of a wrapped stack, counted from the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFrameId {
    pub session_id: u32,
    pub ordinal: u32,
}

/// Wire-safe description of a single runtime value.
///
/// Primitives carry an inline `value`; objects carry an `object_id` handle
/// instead. The two are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteValue {
    #[serde(rename = "type")]
    pub kind: ValueKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<Subtype>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<ObjectHandle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<ObjectPreview>,
}

/// One property of an object, own or inherited.
///
/// A descriptor without `value` is an accessor pair; at least one of
/// `get`/`set` is present in that case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    pub name: SmolStr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<RemoteValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<RemoteValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set: Option<RemoteValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enumerable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub writable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configurable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_own: Option<bool>,
    /// Descriptor of the symbol key, for symbol-keyed properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<RemoteValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_getter: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub was_thrown: Option<bool>,
}

/// Bounded recursive preview of an object.
///
/// `lossless` is true only when every contributing property and entry was
/// included verbatim. `overflow` signals that more data existed than the
/// preview budget allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectPreview {
    #[serde(rename = "type")]
    pub kind: ValueKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<Subtype>,
    pub description: String,
    pub lossless: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overflow: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertyPreview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<EntryPreview>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// One property inside a preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPreview {
    pub name: SmolStr,
    #[serde(rename = "type")]
    pub kind: ValueKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<Subtype>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_preview: Option<ObjectPreview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal: Option<bool>,
}

/// One collection entry inside a preview. Sets have no keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPreview {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<ObjectPreview>,
    pub value: ObjectPreview,
}

/// One collection entry returned by an entries request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<RemoteValue>,
    pub value: RemoteValue,
}

/// Source position of a call frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub script_id: SmolStr,
    pub line_number: u32,
    pub column_number: u32,
}

/// Kind of one scope chain entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScopeKind {
    Global,
    With,
    Closure,
    Catch,
    FunctionName,
    GlobalLexicalEnvironment,
    NestedLexical,
}

/// One entry of a call frame's scope chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scope {
    #[serde(rename = "type")]
    pub kind: ScopeKind,
    pub object: RemoteValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<SmolStr>,
    /// True when the scope object has no enumerable own keys.
    pub empty: bool,
}

/// Structural wrapper for one stack frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFrame {
    pub call_frame_id: CallFrameId,
    pub function_name: String,
    pub location: SourceLocation,
    pub scope_chain: Vec<Scope>,
    pub this: RemoteValue,
}
