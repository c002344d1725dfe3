//! Text entry points over the parser and serializer.
pub mod number;
pub mod parse;
pub mod write;

use std::io;

use crate::error::{Error, ParseError};
use crate::field::Field;

/// Containers nested deeper than this are rejected with
/// [`Error::NestingTooDeep`].
pub const MAX_DEPTH: usize = 256;

/// Compact JSON text of `field`. An Undefined root yields `""`.
pub fn to_string(field: &dyn Field) -> String {
    let mut out = String::new();
    write::write_value(&mut out, field);
    out
}

pub fn to_writer<W: io::Write>(mut writer: W, field: &dyn Field) -> io::Result<()> {
    writer.write_all(to_string(field).as_bytes())?;
    writer.flush()
}

/// Clears `target`, then parses `text` into it. On failure `target` is left
/// Undefined.
pub fn from_str(text: &str, target: &mut dyn Field) -> Result<(), ParseError> {
    target.clear();
    let outcome = parse::Parser::new(text).document(target);
    if let Err(error) = &outcome {
        log::debug!("deserialize into {} failed: {error}", target.field_type());
        target.clear();
    }
    outcome
}

/// Buffers the whole stream, then behaves like [`from_str`].
pub fn from_reader<R: io::Read>(mut reader: R, target: &mut dyn Field) -> Result<(), ParseError> {
    let mut bytes = Vec::new();
    if let Err(error) = reader.read_to_end(&mut bytes) {
        target.clear();
        return Err(Error::Io(error.to_string()).at(0));
    }
    match String::from_utf8(bytes) {
        Ok(text) => from_str(&text, target),
        Err(error) => {
            target.clear();
            Err(Error::InvalidUtf8.at(error.utf8_error().valid_up_to()))
        }
    }
}
