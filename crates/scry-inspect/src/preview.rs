//! Bounded object previews.
//!
//! A preview is a depth- and breadth-limited recursive rendering of an
//! object with cycle detection. `lossless` means every contributing property
//! and entry was included verbatim; `overflow` means more data existed than
//! the budget allowed. The two vary independently.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::collections::{self, RawEntry};
use crate::describe::{array_like_length, number_text, resolved_subtype, size_of};
use crate::enumerate::{enumerate, EnumerateOptions, PropertyFilter};
use crate::host::{Host, ObjectIdentity, OwnProperty, Primitive, PropertySlot};
use crate::protocol::{EntryPreview, ObjectPreview, PropertyPreview, Subtype, ValueKind};
use crate::session::Inspector;

/// Entries kept per collection preview; a sixth entry only flags overflow.
const ENTRY_LIMIT: usize = 5;
const NAMED_THRESHOLD: usize = 5;
const INDEXED_THRESHOLD: usize = 10;
const TABLE_THRESHOLD: usize = 1000;
const STRING_LIMIT: usize = 100;
const PREVIEWABLE_DEPTH: usize = 3;
const PREVIEWABLE_ELEMENTS: u64 = 5;
const PREVIEWABLE_PROPERTIES: usize = 3;
const ELLIPSIS: char = '\u{2026}';
const NEWLINE_MARK: &str = "\u{21B5}";

/// Recursion policy for nested property values.
#[derive(Debug, Clone, Copy, Default)]
pub enum SecondLevel<'a> {
    /// Nested objects recurse only when simple enough.
    #[default]
    Auto,
    /// Always recurse (table rows), no key filter.
    All,
    /// Always recurse, previewing only these keys per row.
    Keys(&'a [SmolStr]),
}

impl<'a> SecondLevel<'a> {
    fn is_table(self) -> bool {
        !matches!(self, Self::Auto)
    }

    fn row_keys(self) -> Option<&'a [SmolStr]> {
        match self {
            Self::Keys(keys) => Some(keys),
            Self::Auto | Self::All => None,
        }
    }
}

struct Budget {
    named: usize,
    indexed: usize,
}

impl<H: Host> Inspector<H> {
    /// Builds a bounded preview of `value`.
    ///
    /// The preview always terminates: recursion is gated by the previewable
    /// rule and each phase caps its entry and property counts. Previewing an
    /// iterator consumes it.
    pub fn preview(&self, value: &H::Value, second_level: SecondLevel<'_>) -> ObjectPreview {
        self.build_preview(value, None, second_level)
    }

    pub(crate) fn build_preview(
        &self,
        value: &H::Value,
        first_level_keys: Option<&[SmolStr]>,
        second_level: SecondLevel<'_>,
    ) -> ObjectPreview {
        self.preview_into(value, first_level_keys, second_level, &FxHashSet::default())
    }

    fn preview_into(
        &self,
        value: &H::Value,
        first_level_keys: Option<&[SmolStr]>,
        second_level: SecondLevel<'_>,
        visited: &FxHashSet<ObjectIdentity>,
    ) -> ObjectPreview {
        let mut preview = self.preview_shell(value);
        if preview.kind != ValueKind::Object && !self.host.is_host_collection(value) {
            return preview;
        }
        let Some(identity) = self.host.identity(value) else {
            return preview;
        };
        let mut visited = visited.clone();
        visited.insert(identity);

        match preview.subtype.filter(|&subtype| collections::is_collection(subtype)) {
            Some(subtype) => self.fill_entries(&mut preview, value, subtype, &visited),
            None => {
                self.fill_properties(&mut preview, value, first_level_keys, second_level, &visited);
            }
        }
        preview
    }

    fn preview_shell(&self, value: &H::Value) -> ObjectPreview {
        let subtype = resolved_subtype(&self.host, value);
        ObjectPreview {
            kind: self.host.kind(value),
            subtype,
            description: self.preview_text(value),
            lossless: true,
            overflow: None,
            properties: Vec::new(),
            entries: None,
            size: size_of(&self.host, value, subtype),
        }
    }

    pub(crate) fn preview_text(&self, value: &H::Value) -> String {
        match self.host.primitive(value) {
            Some(Primitive::Undefined) => "undefined".to_string(),
            Some(Primitive::Null) => "null".to_string(),
            Some(Primitive::Bool(flag)) => flag.to_string(),
            Some(Primitive::Number(number)) => number_text(number),
            Some(Primitive::BigInt(digits)) => format!("{digits}n"),
            Some(Primitive::String(text)) => text,
            None => self.describe_text(value),
        }
    }

    fn fill_entries(
        &self,
        preview: &mut ObjectPreview,
        value: &H::Value,
        subtype: Subtype,
        visited: &FxHashSet<ObjectIdentity>,
    ) {
        match collections::entries(&self.host, value, subtype, 0, ENTRY_LIMIT + 1) {
            Ok(mut raw) => {
                if raw.len() > ENTRY_LIMIT {
                    raw.truncate(ENTRY_LIMIT);
                    preview.overflow = Some(true);
                    preview.lossless = false;
                }
                let mut entries = Vec::with_capacity(raw.len());
                for RawEntry { key, value: entry } in raw {
                    let key = key.map(|key| self.inline_preview(&key, visited));
                    let entry = self.inline_preview(&entry, visited);
                    if !entry.lossless || key.as_ref().is_some_and(|key| !key.lossless) {
                        preview.lossless = false;
                    }
                    entries.push(EntryPreview { key, value: entry });
                }
                preview.entries = Some(entries);
            }
            Err(_) => preview.lossless = false,
        }
    }

    /// Preview for a nested value: primitives inline, simple objects recurse
    /// one level shallower, everything else degrades to a description.
    fn inline_preview(
        &self,
        value: &H::Value,
        visited: &FxHashSet<ObjectIdentity>,
    ) -> ObjectPreview {
        if self.host.primitive(value).is_none()
            && previewable(&self.host, value, visited, PREVIEWABLE_DEPTH)
        {
            return self.preview_into(value, None, SecondLevel::Auto, visited);
        }
        let mut shell = self.preview_shell(value);
        if self.host.identity(value).is_some() {
            shell.lossless = false;
        }
        shell
    }

    fn fill_properties(
        &self,
        preview: &mut ObjectPreview,
        value: &H::Value,
        first_level_keys: Option<&[SmolStr]>,
        second_level: SecondLevel<'_>,
        visited: &FxHashSet<ObjectIdentity>,
    ) {
        let mut lossless = preview.lossless;
        let mut overflow = false;
        let mut properties = Vec::new();

        // Internal properties come first and bypass the budget.
        for (name, internal) in self.host.internal_properties(value) {
            let mut property =
                self.data_preview(name, &internal, second_level, visited, &mut lossless, &mut overflow);
            property.internal = Some(true);
            properties.push(property);
        }

        let requested = first_level_keys.map_or(0, |keys| keys.len());
        let mut budget = if second_level.is_table() {
            Budget {
                named: TABLE_THRESHOLD,
                indexed: TABLE_THRESHOLD,
            }
        } else {
            Budget {
                named: NAMED_THRESHOLD.max(requested),
                indexed: INDEXED_THRESHOLD.max(requested),
            }
        };

        let array_length = array_like_length(&self.host, value);
        let subtype = preview.subtype;
        let options = EnumerateOptions {
            filter: PropertyFilter::AllInChain,
            include_proto: true,
            native_getters_as_values: true,
            ..EnumerateOptions::default()
        };
        for property in enumerate(&self.host, value, options) {
            let name = property.key.display().clone();
            if name == "__proto__" {
                // A user prototype may hide useful behavior.
                if let PropertySlot::Data(proto) = &property.slot {
                    if self
                        .host
                        .constructor_name(proto)
                        .is_some_and(|constructor| constructor != "Object")
                    {
                        lossless = false;
                    }
                }
                continue;
            }
            let is_index = name.parse::<u64>().is_ok();
            if array_length.is_some() && !is_index {
                continue;
            }
            if !property.enumerable
                && !is_index
                && !(property.native_getter && subtype != Some(Subtype::Regexp))
            {
                continue;
            }
            if let Some(keys) = first_level_keys {
                if !keys.iter().any(|key| *key == name) {
                    continue;
                }
            }

            let exhausted = if is_index {
                budget.indexed == 0
            } else {
                budget.named == 0
            };
            if exhausted {
                overflow = true;
                lossless = false;
                break;
            }

            let built = match &property.slot {
                PropertySlot::Accessor { .. } => {
                    lossless = false;
                    PropertyPreview {
                        name,
                        kind: ValueKind::Accessor,
                        subtype: None,
                        value: None,
                        value_preview: None,
                        internal: None,
                    }
                }
                PropertySlot::Data(data) => {
                    self.data_preview(name, data, second_level, visited, &mut lossless, &mut overflow)
                }
            };
            properties.push(built);
            if is_index {
                budget.indexed -= 1;
            } else {
                budget.named -= 1;
            }
        }

        preview.lossless = lossless;
        if overflow {
            preview.overflow = Some(true);
        }
        preview.properties = properties;
    }

    fn data_preview(
        &self,
        name: SmolStr,
        value: &H::Value,
        second_level: SecondLevel<'_>,
        visited: &FxHashSet<ObjectIdentity>,
        lossless: &mut bool,
        overflow: &mut bool,
    ) -> PropertyPreview {
        let mut property = PropertyPreview {
            name,
            kind: self.host.kind(value),
            subtype: None,
            value: None,
            value_preview: None,
            internal: None,
        };
        match self.host.primitive(value) {
            Some(Primitive::Null) => {
                property.kind = ValueKind::Object;
                property.subtype = Some(Subtype::Null);
                property.value = Some("null".to_string());
            }
            Some(Primitive::Undefined) => property.value = Some("undefined".to_string()),
            Some(Primitive::Bool(flag)) => property.value = Some(flag.to_string()),
            Some(Primitive::Number(number)) => property.value = Some(number_text(number)),
            Some(Primitive::BigInt(digits)) => {
                let (text, truncated) = abbreviate(&format!("{digits}n"), STRING_LIMIT, false);
                if truncated {
                    *lossless = false;
                }
                property.value = Some(text);
            }
            Some(Primitive::String(text)) => {
                let (text, truncated) = abbreviate(&text, STRING_LIMIT, true);
                if truncated {
                    *lossless = false;
                }
                property.value = Some(text.replace('\n', NEWLINE_MARK));
            }
            None if property.kind == ValueKind::Symbol => {
                let (text, truncated) =
                    abbreviate(&self.coerce_or_placeholder(value), STRING_LIMIT, false);
                if truncated {
                    *lossless = false;
                }
                property.value = Some(text);
            }
            None => {
                let subtype = resolved_subtype(&self.host, value);
                property.subtype = subtype;
                let recurse = second_level.is_table()
                    || previewable(&self.host, value, visited, PREVIEWABLE_DEPTH);
                if recurse && property.kind == ValueKind::Object {
                    let nested =
                        self.preview_into(value, second_level.row_keys(), SecondLevel::Auto, visited);
                    if !nested.lossless {
                        *lossless = false;
                    }
                    if nested.overflow == Some(true) {
                        *overflow = true;
                    }
                    property.value_preview = Some(nested);
                } else {
                    *lossless = false;
                    if property.kind != ValueKind::Function {
                        let (text, _) = abbreviate(
                            &self.describe_text(value),
                            STRING_LIMIT,
                            subtype == Some(Subtype::Regexp),
                        );
                        property.value = Some(text);
                    }
                }
            }
        }
        property
    }
}

/// Whether `value` is simple enough to inline as a nested preview.
///
/// Pure and bounded: cycles are cut by `visited`, nesting by `depth`. Kept
/// separate from preview building so the budget can be tested in isolation.
pub fn previewable<H: Host>(
    host: &H,
    value: &H::Value,
    visited: &FxHashSet<ObjectIdentity>,
    depth: usize,
) -> bool {
    if host.primitive(value).is_some() {
        return true;
    }
    let Some(identity) = host.identity(value) else {
        return true;
    };
    if visited.contains(&identity) {
        return false;
    }
    if depth == 0 {
        return false;
    }
    let mut visited = visited.clone();
    visited.insert(identity);
    match resolved_subtype(host, value) {
        Some(Subtype::Array) => {
            let Some(length) = host.array_length(value) else {
                return false;
            };
            if length > PREVIEWABLE_ELEMENTS {
                return false;
            }
            (0..length).all(|index| match host.indexed_property(value, index) {
                Some(OwnProperty {
                    slot: PropertySlot::Data(element),
                    ..
                }) => previewable(host, &element, &visited, depth - 1),
                Some(_) => false,
                // Holes read back as undefined.
                None => true,
            })
        }
        Some(_) => false,
        None => {
            if host.kind(value) != ValueKind::Object {
                return false;
            }
            let plain = host
                .prototype_of(value)
                .map_or(true, |proto| host.prototype_of(&proto).is_none());
            if !plain {
                return false;
            }
            let properties = host.own_properties(value);
            if properties.len() > PREVIEWABLE_PROPERTIES {
                return false;
            }
            properties.iter().all(|property| match &property.slot {
                PropertySlot::Data(data) => previewable(host, data, &visited, depth - 1),
                PropertySlot::Accessor { .. } => false,
            })
        }
    }
}

/// Truncates to `max` characters with an ellipsis, in the middle when
/// `middle` is set. Returns whether truncation happened.
pub(crate) fn abbreviate(text: &str, max: usize, middle: bool) -> (String, bool) {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max {
        return (text.to_string(), false);
    }
    let out = if middle {
        let left = max / 2;
        let right = max - left - 1;
        let mut out: String = chars[..left].iter().collect();
        out.push(ELLIPSIS);
        out.extend(&chars[chars.len() - right..]);
        out
    } else {
        let mut out: String = chars[..max].iter().collect();
        out.push(ELLIPSIS);
        out
    };
    (out, true)
}
