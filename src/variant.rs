//! Schema-less JSON value.
//!
//! A [`Variant`] holds any JSON shape plus the Undefined state. Reads never
//! fail: indexing a missing element or member yields the shared [`ABSENT`]
//! sentinel, which reports Undefined and can be indexed further. Writes
//! through [`VariantMut`] chain the same way; on a missing target they do
//! nothing.
pub mod convert;
pub mod interop;

use std::fmt;
use std::ops::Index;

use indexmap::IndexMap;

use crate::field::{Field, Node, NodeMut, State};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variant {
    value: Value,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Int(i64),
    Num(f64),
    Str(String),
    Object(IndexMap<String, Variant>),
    Array(Vec<Variant>),
}

/// Dynamic type of a [`Variant`]. Undefined and Null variants are `Unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subtype {
    Unset,
    Bool,
    Int,
    Float,
    String,
    Object,
    Array,
}

/// The one absent value every failed lookup points at.
pub static ABSENT: Variant = Variant { value: Value::Undefined };

/// Mutable handle that may point at nothing. Every operation on an empty
/// handle is a no-op, so paths can be written without checks:
///
/// ```
/// use json_field::{Json, Variant};
///
/// let mut doc = Variant::new();
/// doc.from_json(r#"{"a": [0, 0, {"b": 1}]}"#).unwrap();
/// doc.field_mut("a").item(2).field("b").set(5);
/// doc.field_mut("missing").item(9).set(5);
/// assert_eq!(doc.to_json(), r#"{"a":[0,0,{"b":5}]}"#);
/// ```
pub struct VariantMut<'a>(Option<&'a mut Variant>);

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Variant {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn null() -> Self {
        Self { value: Value::Null }
    }
    pub fn absent() -> &'static Variant {
        &ABSENT
    }
    /// True only for the shared sentinel itself, not for any Undefined value.
    pub fn is_absent(&self) -> bool {
        std::ptr::eq(self, &ABSENT)
    }

    pub(crate) fn value(&self) -> &Value {
        &self.value
    }

    pub fn subtype(&self) -> Subtype {
        match self.value {
            Value::Undefined | Value::Null => Subtype::Unset,
            Value::Bool(_) => Subtype::Bool,
            Value::Int(_) => Subtype::Int,
            Value::Num(_) => Subtype::Float,
            Value::Str(_) => Subtype::String,
            Value::Object(_) => Subtype::Object,
            Value::Array(_) => Subtype::Array,
        }
    }

    /// Element or member count; 0 for scalars.
    pub fn len(&self) -> usize {
        match &self.value {
            Value::Array(items) => items.len(),
            Value::Object(fields) => fields.len(),
            _ => 0,
        }
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    pub fn has_field(&self, name: &str) -> bool {
        matches!(&self.value, Value::Object(fields) if fields.contains_key(name))
    }

    /// Switches a non-container to an empty array or object. A container
    /// keeps its content and kind. Other subtypes are ignored.
    pub fn define(&mut self, subtype: Subtype) {
        match subtype {
            Subtype::Array => {
                self.items_mut();
            }
            Subtype::Object => {
                self.members_mut();
            }
            _ => {}
        }
    }

    pub fn set(&mut self, value: impl Into<Variant>) {
        *self = value.into();
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            Value::Bool(value) => Some(value),
            _ => None,
        }
    }
    pub fn as_int(&self) -> Option<i64> {
        match self.value {
            Value::Int(value) => Some(value),
            _ => None,
        }
    }
    /// Integers widen.
    pub fn as_float(&self) -> Option<f64> {
        match self.value {
            Value::Num(value) => Some(value),
            Value::Int(value) => Some(value as f64),
            _ => None,
        }
    }
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            Value::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn get(&self, index: usize) -> Option<&Variant> {
        match &self.value {
            Value::Array(items) => items.get(index),
            _ => None,
        }
    }
    pub fn field(&self, name: &str) -> Option<&Variant> {
        match &self.value {
            Value::Object(fields) => fields.get(name),
            _ => None,
        }
    }

    /// Elements of an array; empty for anything else.
    pub fn items(&self) -> &[Variant] {
        match &self.value {
            Value::Array(items) => items,
            _ => &[],
        }
    }
    /// Members of an object in insertion order; empty for anything else.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Variant)> + '_ {
        let fields = match &self.value {
            Value::Object(fields) => Some(fields),
            _ => None,
        };
        fields.into_iter().flatten().map(|(name, value)| (name.as_str(), value))
    }

    pub fn for_each_item(&self, mut visit: impl FnMut(usize, &Variant)) {
        for (index, item) in self.items().iter().enumerate() {
            visit(index, item);
        }
    }
    pub fn for_each_field(&self, mut visit: impl FnMut(&str, &Variant)) {
        for (name, value) in self.fields() {
            visit(name, value);
        }
    }

    /// Appends an Undefined element, turning a non-container into an empty
    /// array first. On an object nothing changes and the handle is empty.
    pub fn new_item(&mut self) -> VariantMut<'_> {
        let Some(items) = self.items_mut() else {
            return VariantMut(None);
        };
        items.push(Variant::default());
        VariantMut(items.last_mut())
    }

    /// Returns a reset member `name`, turning a non-container into an empty
    /// object first. An existing member keeps its position. On an array
    /// nothing changes and the handle is empty.
    pub fn new_field(&mut self, name: &str) -> VariantMut<'_> {
        VariantMut(self.members_mut().map(|fields| {
            let member = fields.entry(name.to_owned()).or_default();
            *member = Variant::default();
            member
        }))
    }

    /// Returns member `name` as is, creating it Undefined if missing. Same
    /// container rules as [`new_field`](Self::new_field).
    pub fn entry(&mut self, name: &str) -> VariantMut<'_> {
        VariantMut(self.members_mut().map(|fields| fields.entry(name.to_owned()).or_default()))
    }

    pub fn remove_field(&mut self, name: &str) -> Option<Variant> {
        match &mut self.value {
            Value::Object(fields) => fields.shift_remove(name),
            _ => None,
        }
    }

    pub fn at_mut(&mut self, index: usize) -> VariantMut<'_> {
        VariantMut(Some(self)).item(index)
    }
    pub fn field_mut(&mut self, name: &str) -> VariantMut<'_> {
        VariantMut(Some(self)).field(name)
    }

    fn is_container(&self) -> bool {
        matches!(self.value, Value::Array(_) | Value::Object(_))
    }

    /// `None` for an object.
    fn items_mut(&mut self) -> Option<&mut Vec<Variant>> {
        if !self.is_container() {
            self.value = Value::Array(Vec::new());
        }
        match &mut self.value {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// `None` for an array.
    fn members_mut(&mut self) -> Option<&mut IndexMap<String, Variant>> {
        if !self.is_container() {
            self.value = Value::Object(IndexMap::new());
        }
        match &mut self.value {
            Value::Object(fields) => Some(fields),
            _ => None,
        }
    }
}

impl<'a> VariantMut<'a> {
    pub fn item(self, index: usize) -> VariantMut<'a> {
        VariantMut(self.0.and_then(|variant| match &mut variant.value {
            Value::Array(items) => items.get_mut(index),
            _ => None,
        }))
    }
    pub fn field(self, name: &str) -> VariantMut<'a> {
        VariantMut(self.0.and_then(|variant| match &mut variant.value {
            Value::Object(fields) => fields.get_mut(name),
            _ => None,
        }))
    }
    pub fn new_item(&mut self) -> VariantMut<'_> {
        VariantMut(self.0.as_deref_mut().and_then(|variant| variant.new_item().0))
    }
    pub fn new_field(&mut self, name: &str) -> VariantMut<'_> {
        VariantMut(self.0.as_deref_mut().and_then(|variant| variant.new_field(name).0))
    }
    pub fn entry(&mut self, name: &str) -> VariantMut<'_> {
        VariantMut(self.0.as_deref_mut().and_then(|variant| variant.entry(name).0))
    }
    pub fn set(self, value: impl Into<Variant>) {
        if let Some(variant) = self.0 {
            variant.set(value);
        }
    }
    pub fn set_null(self) {
        if let Some(variant) = self.0 {
            variant.set_null();
        }
    }
    pub fn clear(self) {
        if let Some(variant) = self.0 {
            variant.clear();
        }
    }
    pub fn is_absent(&self) -> bool {
        self.0.is_none()
    }
    /// The target, or the sentinel.
    pub fn get(&self) -> &Variant {
        self.0.as_deref().unwrap_or(&ABSENT)
    }
    pub fn into_inner(self) -> Option<&'a mut Variant> {
        self.0
    }
}

impl Field for Variant {
    fn node(&self) -> Node<'_> {
        Node::Variant(self)
    }
    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Variant(self)
    }
    fn state(&self) -> State {
        match self.value {
            Value::Undefined => State::Undefined,
            Value::Null => State::Null,
            _ => State::HasValue,
        }
    }
    fn clear(&mut self) {
        self.value = Value::Undefined;
    }
    fn set_null(&mut self) {
        self.value = Value::Null;
    }
}

impl Index<usize> for Variant {
    type Output = Variant;
    fn index(&self, index: usize) -> &Variant {
        self.get(index).unwrap_or(&ABSENT)
    }
}

impl Index<&str> for Variant {
    type Output = Variant;
    fn index(&self, name: &str) -> &Variant {
        self.field(name).unwrap_or(&ABSENT)
    }
}

macro_rules! variant_from {
    ($($ty:ty => |$value:ident| $build:expr),* $(,)?) => {
        $(
            impl From<$ty> for Variant {
                fn from($value: $ty) -> Self {
                    Self { value: $build }
                }
            }
        )*
    };
}

variant_from! {
    bool => |value| Value::Bool(value),
    i32 => |value| Value::Int(value.into()),
    i64 => |value| Value::Int(value),
    u32 => |value| Value::Int(value.into()),
    f32 => |value| Value::Num(value.into()),
    f64 => |value| Value::Num(value),
    &str => |value| Value::Str(value.to_owned()),
    String => |value| Value::Str(value),
}

impl<V: Into<Variant>> FromIterator<V> for Variant {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self { value: Value::Array(iter.into_iter().map(Into::into).collect()) }
    }
}

impl fmt::Display for Subtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Subtype::Unset => "unset",
            Subtype::Bool => "bool",
            Subtype::Int => "int",
            Subtype::Float => "float",
            Subtype::String => "string",
            Subtype::Object => "object",
            Subtype::Array => "array",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn misses_point_at_the_sentinel() {
        let mut variant = Variant::new();
        variant.new_field("a").new_item().set(1);
        assert!(variant["b"].is_absent());
        assert!(variant["a"][3].is_absent());
        assert!(variant["a"][0]["x"][1].is_absent());
        assert!(variant["a"][0]["x"].is_undefined());
        assert!(!variant["a"].is_absent());
        assert!(!Variant::new().is_absent());
        assert_eq!(variant["a"][0].as_int(), Some(1));
    }

    #[test]
    fn new_item_redefines_scalars() {
        let mut variant = Variant::from("text");
        variant.new_item().set(true);
        assert_eq!(variant.subtype(), Subtype::Array);
        assert_eq!(variant.len(), 1);
        assert_eq!(variant[0].as_bool(), Some(true));
    }

    #[test]
    fn writes_never_switch_a_populated_container() {
        let mut object = Variant::new();
        object.new_field("keep").set(1);
        let mut item = object.new_item();
        assert!(item.is_absent());
        item.new_field("x").set(2);
        item.set(2);
        assert_eq!(object.subtype(), Subtype::Object);
        assert_eq!(object["keep"].as_int(), Some(1));
        assert_eq!(object.len(), 1);

        let mut array: Variant = [1, 2, 3].into_iter().collect();
        array.new_field("x").set(1);
        array.entry("y").set(1);
        array.define(Subtype::Object);
        assert_eq!(array.subtype(), Subtype::Array);
        assert_eq!(array.len(), 3);
        assert_eq!(array[2].as_int(), Some(3));

        let mut empty = Variant::new();
        empty.define(Subtype::Array);
        assert!(empty.new_field("x").is_absent());
        assert_eq!(empty.subtype(), Subtype::Array);
    }

    #[test]
    fn handle_hands_back_its_target() {
        let mut variant = Variant::null();
        if let Some(member) = variant.new_field("n").into_inner() {
            member.set(5);
        }
        assert_eq!(variant["n"].as_int(), Some(5));
        assert!(variant.at_mut(0).into_inner().is_none());
    }

    #[test]
    fn new_field_resets_entry_keeps() {
        let mut variant = Variant::new();
        variant.new_field("a").set(1);
        variant.new_field("b").set(2);
        assert!(variant.new_field("a").get().is_undefined());
        variant.entry("b").new_item();
        assert_eq!(variant.fields().map(|(name, _)| name).collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(variant["b"].subtype(), Subtype::Array);
    }

    #[test]
    fn define_only_switches_containers() {
        let mut variant = Variant::from(3);
        variant.define(Subtype::Int);
        assert_eq!(variant.as_int(), Some(3));
        variant.define(Subtype::Object);
        assert_eq!(variant.subtype(), Subtype::Object);
        assert!(variant.has_value());
        assert!(variant.is_empty());
        variant.entry("k").set(1);
        variant.define(Subtype::Object);
        assert!(variant.has_field("k"));
    }

    #[test]
    fn chaining_on_missing_targets_is_absorbed() {
        let mut variant: Variant = [1, 2, 3].into_iter().collect();
        variant.at_mut(1).set("two");
        variant.at_mut(7).set("nowhere");
        variant.field_mut("nope").new_field("x").set(1);
        assert!(variant.at_mut(7).is_absent());
        assert!(variant.at_mut(7).get().is_absent());
        assert_eq!(variant[1].as_str(), Some("two"));
        assert_eq!(variant.len(), 3);
    }

    #[test]
    fn float_reads_widen_ints() {
        assert_eq!(Variant::from(2).as_float(), Some(2.0));
        assert_eq!(Variant::from(2.5).as_int(), None);
        assert_eq!(Variant::from(u32::MAX).as_int(), Some(4_294_967_295));
    }
}
