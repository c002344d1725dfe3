//! Static value model: tri-state leaves, homogeneous arrays and schema objects.
//!
//! Every node implements [`Field`]. The parser and serializer never look at
//! concrete storage; they dispatch on the typed views [`Node`] / [`NodeMut`]
//! a field hands out, so a closed set of shapes can still be nested freely
//! (`Array<Array<Int>>`, objects inside arrays, variants anywhere).
pub mod array;
pub mod leaf;
pub mod object;

use std::fmt;

use crate::variant::Variant;

pub use array::{Array, ArrayField};
pub use leaf::{Bool, Date, Int, Leaf, Num, Scalar, Slot, Str, Timestamp};
pub use object::{Accessor, BaseAccessor, ObjectField, Registry, Schema};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Declared type of a field. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Int,
    Num,
    Str,
    Bool,
    Date,
    Obj,
    Arr,
    Var,
}

/// Kind of JSON literal met in the input, used in mismatch diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonKind {
    Object,
    Array,
    String,
    Bool,
    Number,
}

/// What a field reports: exactly one holds at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum State {
    #[default]
    Undefined,
    Null,
    HasValue,
}

/// Raw presence flag of containers. Arrays and objects derive their reported
/// [`State`] from this flag *and* their content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Presence {
    #[default]
    Undefined,
    Null,
    Defined,
}

/// Read-only typed view of a field.
pub enum Node<'a> {
    Int(&'a Int),
    Num(&'a Num),
    Str(&'a Str),
    Bool(&'a Bool),
    Date(&'a Date),
    Array(&'a dyn ArrayField),
    Object(&'a dyn ObjectField),
    Variant(&'a Variant),
}

/// Mutable typed view of a field.
pub enum NodeMut<'a> {
    Int(&'a mut Int),
    Num(&'a mut Num),
    Str(&'a mut Str),
    Bool(&'a mut Bool),
    Date(&'a mut Date),
    Array(&'a mut dyn ArrayField),
    Object(&'a mut dyn ObjectField),
    Variant(&'a mut Variant),
}

/// A node of a typed JSON tree.
pub trait Field {
    fn node(&self) -> Node<'_>;
    fn node_mut(&mut self) -> NodeMut<'_>;
    fn state(&self) -> State;
    /// Recursively resets to Undefined.
    fn clear(&mut self);
    /// Transitions to Null, dropping any nested content.
    fn set_null(&mut self);

    fn field_type(&self) -> FieldType {
        self.node().field_type()
    }
    fn is_undefined(&self) -> bool {
        self.state() == State::Undefined
    }
    fn is_null(&self) -> bool {
        self.state() == State::Null
    }
    fn has_value(&self) -> bool {
        self.state() == State::HasValue
    }
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Node<'_> {
    pub fn field_type(&self) -> FieldType {
        match self {
            Node::Int(_) => FieldType::Int,
            Node::Num(_) => FieldType::Num,
            Node::Str(_) => FieldType::Str,
            Node::Bool(_) => FieldType::Bool,
            Node::Date(_) => FieldType::Date,
            Node::Array(_) => FieldType::Arr,
            Node::Object(_) => FieldType::Obj,
            Node::Variant(_) => FieldType::Var,
        }
    }
}

impl NodeMut<'_> {
    pub fn field_type(&self) -> FieldType {
        match self {
            NodeMut::Int(_) => FieldType::Int,
            NodeMut::Num(_) => FieldType::Num,
            NodeMut::Str(_) => FieldType::Str,
            NodeMut::Bool(_) => FieldType::Bool,
            NodeMut::Date(_) => FieldType::Date,
            NodeMut::Array(_) => FieldType::Arr,
            NodeMut::Object(_) => FieldType::Obj,
            NodeMut::Variant(_) => FieldType::Var,
        }
    }
}

impl Presence {
    /// Reported state of a container; having content overrides a stale flag.
    pub(crate) fn with_content(self, has_content: bool) -> State {
        match self {
            _ if has_content => State::HasValue,
            Presence::Undefined => State::Undefined,
            Presence::Null => State::Null,
            Presence::Defined => State::HasValue,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Int => "int",
            FieldType::Num => "num",
            FieldType::Str => "str",
            FieldType::Bool => "bool",
            FieldType::Date => "date",
            FieldType::Obj => "obj",
            FieldType::Arr => "arr",
            FieldType::Var => "var",
        };
        f.write_str(name)
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JsonKind::Object => "object",
            JsonKind::Array => "array",
            JsonKind::String => "string",
            JsonKind::Bool => "bool",
            JsonKind::Number => "number",
        };
        f.write_str(name)
    }
}
