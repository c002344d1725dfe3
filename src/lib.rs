//! Typed JSON data binding.
//!
//! Two in-memory shapes share one parser and one serializer:
//!
//! - a static tree of tri-state fields ([`Leaf`], [`Array`] and schema
//!   objects declared with [`json_object!`]), where the schema steers parsing;
//! - the schema-less [`Variant`].
//!
//! Every value is Undefined, Null or holds a value. Undefined parts are left
//! out of the written text, so `{"a":null}` and `{}` stay distinguishable.
//!
//! ```
//! use json_field::{Array, Int, Json};
//!
//! let mut numbers = Array::<Int>::new();
//! numbers.from_json("[0, 1, 0x1F]").unwrap();
//! assert_eq!(numbers[2].get(), Some(&31));
//! assert_eq!(numbers.to_json(), "[0,1,31]");
//! ```
pub mod codec;
pub mod date;
pub mod error;
pub mod field;
mod macros;
pub mod variant;

use std::io;

pub use codec::{from_str, to_string};
pub use error::{Error, ParseError, Result};
pub use field::{
    Accessor, Array, ArrayField, BaseAccessor, Bool, Date, Field, FieldType, Int, JsonKind, Leaf,
    Node, NodeMut, Num, ObjectField, Presence, Registry, Schema, Slot, State, Str, Timestamp,
};
pub use variant::{ABSENT, Subtype, Variant, VariantMut};

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;
}

/// Text conversion for any field, sized or behind `dyn Field`.
pub trait Json {
    /// Compact JSON text; empty when the value is Undefined.
    fn to_json(&self) -> String;
    fn write_json<W: io::Write>(&self, writer: W) -> io::Result<()>;
    /// Clears `self` and parses `text` into it. On error `self` is left
    /// Undefined and the error carries the byte offset.
    fn from_json(&mut self, text: &str) -> Result<(), ParseError>;
    fn from_json_reader<R: io::Read>(&mut self, reader: R) -> Result<(), ParseError>;
}

impl<T: Field> Json for T {
    fn to_json(&self) -> String {
        codec::to_string(self)
    }
    fn write_json<W: io::Write>(&self, writer: W) -> io::Result<()> {
        codec::to_writer(writer, self)
    }
    fn from_json(&mut self, text: &str) -> Result<(), ParseError> {
        codec::from_str(text, self)
    }
    fn from_json_reader<R: io::Read>(&mut self, reader: R) -> Result<(), ParseError> {
        codec::from_reader(reader, self)
    }
}

impl Json for dyn Field + '_ {
    fn to_json(&self) -> String {
        codec::to_string(self)
    }
    fn write_json<W: io::Write>(&self, writer: W) -> io::Result<()> {
        codec::to_writer(writer, self)
    }
    fn from_json(&mut self, text: &str) -> Result<(), ParseError> {
        codec::from_str(text, self)
    }
    fn from_json_reader<R: io::Read>(&mut self, reader: R) -> Result<(), ParseError> {
        codec::from_reader(reader, self)
    }
}
