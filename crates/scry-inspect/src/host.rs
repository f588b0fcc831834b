//! Host reflection capabilities.
//!
//! The engine never touches live objects directly. Every reflective
//! primitive it needs — own-property lookup, prototype links, subtype
//! classification, bounded weak/iterator fetches — is a method on [`Host`],
//! implemented once per runtime. The enumeration and preview algorithms are
//! host-agnostic.

use smol_str::SmolStr;

use crate::protocol::{ScopeKind, Subtype, ValueKind};

/// Stable identity of a live object, used for cycle detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectIdentity(pub u64);

/// Inline payload for values that cross the wire by value.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    /// Arbitrary-precision integer, carried as its decimal digits.
    BigInt(String),
    String(String),
}

/// A value thrown while running host-level code (a getter, a coercion).
#[derive(Debug, Clone)]
pub struct Thrown<V>(pub V);

/// Key of an own property.
#[derive(Debug, Clone)]
pub enum PropertyKey<V> {
    Name(SmolStr),
    Symbol {
        /// Display form, e.g. `Symbol(tag)`.
        description: SmolStr,
        /// The symbol value itself, for wire wrapping.
        symbol: V,
    },
}

impl<V> PropertyKey<V> {
    pub fn display(&self) -> &SmolStr {
        match self {
            Self::Name(name) => name,
            Self::Symbol { description, .. } => description,
        }
    }
}

/// Storage slot of an own property.
#[derive(Debug, Clone)]
pub enum PropertySlot<V> {
    Data(V),
    /// Accessor pair; either side may be declared but absent.
    Accessor { get: Option<V>, set: Option<V> },
}

/// One own property as reported by the host, before wire wrapping.
#[derive(Debug, Clone)]
pub struct OwnProperty<V> {
    pub key: PropertyKey<V>,
    pub slot: PropertySlot<V>,
    pub enumerable: bool,
    pub writable: bool,
    pub configurable: bool,
}

/// Shape of a DOM-node-like value, for compact tag summaries.
#[derive(Debug, Clone)]
pub enum NodeInfo {
    Element {
        tag: SmolStr,
        id: Option<SmolStr>,
        class_attr: Option<SmolStr>,
        type_attr: Option<SmolStr>,
    },
    Text { text: String },
    Comment { text: String },
    Doctype { name: SmolStr },
}

/// Raw call-frame data supplied by the host's debugger.
#[derive(Debug, Clone)]
pub struct FrameInfo<V> {
    pub function_name: String,
    pub script_id: SmolStr,
    pub line: u32,
    pub column: u32,
    pub scope_chain: Vec<ScopeInfo<V>>,
    pub this_value: V,
}

/// One raw scope chain entry.
#[derive(Debug, Clone)]
pub struct ScopeInfo<V> {
    pub kind: ScopeKind,
    pub object: V,
    pub name: Option<SmolStr>,
}

/// Reflection primitives the engine consumes.
///
/// Methods that run user code (`invoke_getter`, `coerce_string`) return the
/// thrown value on failure; everything else is total. Implementations must
/// keep `Value` cheap to clone (a reference, not a deep copy).
pub trait Host {
    type Value: Clone;

    /// `typeof`-style coarse classification.
    fn kind(&self, value: &Self::Value) -> ValueKind;

    /// Inline payload for primitives and big integers; `None` for objects,
    /// functions, and symbols.
    fn primitive(&self, value: &Self::Value) -> Option<Primitive>;

    /// Fine-grained classification, where the host knows more than [`kind`].
    ///
    /// [`kind`]: Host::kind
    fn subtype(&self, value: &Self::Value) -> Option<Subtype>;

    /// Historical host quirk: a value whose `kind` reports undefined but
    /// that is nevertheless a live collection, displayed as an array.
    fn is_host_collection(&self, value: &Self::Value) -> bool {
        let _ = value;
        false
    }

    /// Stable identity for objects; `None` for primitives.
    fn identity(&self, value: &Self::Value) -> Option<ObjectIdentity>;

    /// SameValue comparison.
    fn same_value(&self, a: &Self::Value, b: &Self::Value) -> bool;

    /// The host's undefined value.
    fn undefined(&self) -> Self::Value;

    /// Internal constructor name of an object.
    fn class_name(&self, value: &Self::Value) -> SmolStr;

    /// Resolvable constructor name, if any.
    fn constructor_name(&self, value: &Self::Value) -> Option<SmolStr>;

    /// String coercion; may run user code and throw.
    fn coerce_string(&self, value: &Self::Value) -> Result<String, Thrown<Self::Value>>;

    /// JSON projection for by-value returns; `None` when not serializable.
    fn to_json(&self, value: &Self::Value) -> Option<serde_json::Value>;

    /// Source text of a function.
    fn function_source(&self, value: &Self::Value) -> Option<String>;

    /// Node shape for DOM-node-like values.
    fn node_info(&self, value: &Self::Value) -> Option<NodeInfo>;

    /// String-keyed own properties, in insertion order.
    fn own_properties(&self, value: &Self::Value) -> Vec<OwnProperty<Self::Value>>;

    /// Symbol-keyed own properties, in insertion order.
    fn own_symbol_properties(&self, value: &Self::Value) -> Vec<OwnProperty<Self::Value>>;

    /// Direct prototype, if any and accessible.
    fn prototype_of(&self, value: &Self::Value) -> Option<Self::Value>;

    /// Engine-level internal properties (e.g. a bound function's target).
    fn internal_properties(&self, value: &Self::Value) -> Vec<(SmolStr, Self::Value)>;

    /// Numeric, finite length if the value exposes one.
    fn array_length(&self, value: &Self::Value) -> Option<u64>;

    /// Whether the value exposes a splice-like capability (array-likeness
    /// heuristic for hosts without a precise classification).
    fn has_splice(&self, value: &Self::Value) -> bool;

    /// Own property at a numeric index of an array-like value.
    fn indexed_property(&self, value: &Self::Value, index: u64)
        -> Option<OwnProperty<Self::Value>>;

    /// Entry count for map/set subtypes.
    fn collection_size(&self, value: &Self::Value) -> Option<u64>;

    /// Entry count for weak subtypes.
    fn weak_collection_size(&self, value: &Self::Value) -> Option<u64>;

    /// Values of an ordered-set-like collection, in iteration order.
    fn set_values(&self, value: &Self::Value) -> Vec<Self::Value>;

    /// Entries of an associative-map-like collection, in iteration order.
    fn map_entries(&self, value: &Self::Value) -> Vec<(Self::Value, Self::Value)>;

    /// Up to `limit` entries of a weak collection. Weak collections cannot
    /// be fully enumerated; the bound is the host's, not a window.
    fn weak_entries(
        &self,
        value: &Self::Value,
        limit: usize,
    ) -> Vec<(Option<Self::Value>, Self::Value)>;

    /// Up to `limit` entries consumed from an iterator. Destructive: the
    /// iterator cannot be restarted.
    fn iterator_entries(&self, value: &Self::Value, limit: usize) -> Vec<Self::Value>;

    /// Target of a proxy value.
    fn proxy_target(&self, value: &Self::Value) -> Option<Self::Value>;

    /// Whether an accessor function is host-native (its source carries the
    /// native-code marker).
    fn is_native_accessor(&self, function: &Self::Value) -> bool;

    /// Invoke a getter with `receiver` as the receiver.
    fn invoke_getter(
        &self,
        getter: &Self::Value,
        receiver: &Self::Value,
    ) -> Result<Self::Value, Thrown<Self::Value>>;
}
