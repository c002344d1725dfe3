//! Bridge between [`Variant`] trees and statically typed fields.
use indexmap::IndexMap;

use crate::date;
use crate::error::{Error, Result};
use crate::field::{ArrayField, Field, FieldType, Node, NodeMut, ObjectField, State};

use super::{Value, Variant};

impl Variant {
    /// Converts an array variant into `target`.
    ///
    /// The conversion runs against a fresh value that replaces `target` only
    /// once every element converted; on error `target` is untouched.
    pub fn to_array<A: ArrayField + Default>(&self, target: &mut A) -> Result<()> {
        let mut staged = A::default();
        self.convert(&mut staged, FieldType::Arr)?;
        *target = staged;
        Ok(())
    }

    /// Converts an object variant into `target`, matching members by name.
    /// Unknown members are ignored. Atomic like [`Variant::to_array`].
    pub fn to_object<O: ObjectField + Default>(&self, target: &mut O) -> Result<()> {
        let mut staged = O::default();
        self.convert(&mut staged, FieldType::Obj)?;
        *target = staged;
        Ok(())
    }

    fn convert(&self, staged: &mut dyn Field, expected: FieldType) -> Result<()> {
        let converted = match self.value() {
            Value::Undefined | Value::Null => assign(self, staged, "<root>"),
            Value::Array(_) if expected == FieldType::Arr => assign(self, staged, "<root>"),
            Value::Object(_) if expected == FieldType::Obj => assign(self, staged, "<root>"),
            _ => Err(Error::ConversionTypeMismatch {
                field: "<root>".to_owned(),
                expected,
                actual: self.subtype(),
            }),
        };
        if let Err(error) = &converted {
            log::debug!("variant conversion failed: {error}");
        }
        converted
    }

    /// Builds a variant mirroring `field`.
    pub fn from_field(field: &dyn Field) -> Variant {
        let mut variant = Variant::new();
        variant.assign_field(field);
        variant
    }

    /// Copies `field` into this variant. An Undefined source changes nothing;
    /// Undefined elements and members are skipped. Dates become ISO-8601
    /// strings.
    pub fn assign_field(&mut self, field: &dyn Field) {
        match field.state() {
            State::Undefined => return,
            State::Null => {
                self.set_null();
                return;
            }
            State::HasValue => {}
        }
        match field.node() {
            Node::Int(leaf) => {
                if let Some(value) = leaf.get() {
                    self.set(*value);
                }
            }
            Node::Num(leaf) => {
                if let Some(value) = leaf.get() {
                    self.set(*value);
                }
            }
            Node::Str(leaf) => {
                if let Some(value) = leaf.get() {
                    self.set(value.as_str());
                }
            }
            Node::Bool(leaf) => {
                if let Some(value) = leaf.get() {
                    self.set(*value);
                }
            }
            Node::Date(leaf) => {
                if let Some(timestamp) = leaf.get() {
                    match timestamp.to_iso8601() {
                        Some(text) => self.set(text),
                        None => {
                            log::warn!("timestamp {} is outside the calendar range", timestamp.secs());
                            self.set_null();
                        }
                    }
                }
            }
            Node::Array(array) => {
                let mut items = Vec::with_capacity(array.len());
                for index in 0..array.len() {
                    if let Some(item) = array.item(index).filter(|item| !item.is_undefined()) {
                        items.push(Variant::from_field(item));
                    }
                }
                self.value = Value::Array(items);
            }
            Node::Object(object) => {
                let mut fields = IndexMap::new();
                object.for_each_field(&mut |name, member| {
                    if !member.is_undefined() {
                        fields.insert(name.to_owned(), Variant::from_field(member));
                    }
                });
                self.value = Value::Object(fields);
            }
            Node::Variant(variant) => self.clone_from(variant),
        }
    }
}

/// Writes `source` into `target`, recursing through containers. Int widens to
/// Num and a String fills a Date; any other pairing is a conversion error
/// naming `name`.
fn assign(source: &Variant, target: &mut dyn Field, name: &str) -> Result<()> {
    match source.value() {
        Value::Undefined => return Ok(()),
        Value::Null => {
            target.set_null();
            return Ok(());
        }
        _ => {}
    }
    match (target.node_mut(), source.value()) {
        (NodeMut::Int(leaf), Value::Int(value)) => leaf.set(*value),
        (NodeMut::Num(leaf), Value::Num(value)) => leaf.set(*value),
        (NodeMut::Num(leaf), Value::Int(value)) => leaf.set(*value as f64),
        (NodeMut::Str(leaf), Value::Str(value)) => leaf.set(value.as_str()),
        (NodeMut::Bool(leaf), Value::Bool(value)) => leaf.set(*value),
        (NodeMut::Date(leaf), Value::Str(value)) => leaf.set(date::parse(value)?),
        (NodeMut::Array(array), Value::Array(items)) => {
            array.define();
            for (index, item) in items.iter().enumerate() {
                if item.is_undefined() {
                    continue;
                }
                assign(item, array.new_item(), &format!("{name}[{index}]"))?;
            }
        }
        (NodeMut::Object(object), Value::Object(fields)) => {
            object.define();
            for (key, member) in fields {
                if member.is_undefined() {
                    continue;
                }
                if let Some(slot) = object.field_mut(key) {
                    assign(member, slot, key)?;
                }
            }
        }
        (NodeMut::Variant(variant), _) => variant.clone_from(source),
        (node, _) => {
            return Err(Error::ConversionTypeMismatch {
                field: name.to_owned(),
                expected: node.field_type(),
                actual: source.subtype(),
            });
        }
    }
    Ok(())
}
