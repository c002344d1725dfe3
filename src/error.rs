use thiserror::Error;

use crate::field::{FieldType, JsonKind};
use crate::variant::Subtype;

/// Everything that can go wrong while reading JSON text or bridging a
/// [`Variant`](crate::Variant) into a static tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,

    #[error("unexpected character")]
    UnexpectedCharacter,

    #[error("type mismatch on `{field}`: expected {expected}, found {actual}")]
    TypeMismatch {
        field: String,
        expected: FieldType,
        actual: JsonKind,
    },

    #[error("cannot convert `{field}`: expected {expected}, found {actual}")]
    ConversionTypeMismatch {
        field: String,
        expected: FieldType,
        actual: Subtype,
    },

    #[error("malformed number `{0}`")]
    MalformedNumber(String),

    #[error("malformed date `{0}`")]
    MalformedDate(String),

    #[error("nesting deeper than {0} levels")]
    NestingTooDeep(usize),

    #[error("read failed: {0}")]
    Io(String),

    #[error("input is not valid UTF-8")]
    InvalidUtf8,
}

impl Error {
    pub(crate) fn at(self, offset: usize) -> ParseError {
        ParseError { error: self, offset }
    }
}

/// A failed deserialization: what went wrong and the byte offset where it was
/// detected. Running out of input reports the length of the text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{error} at byte {offset}")]
pub struct ParseError {
    error: Error,
    offset: usize,
}

impl ParseError {
    pub fn error(&self) -> &Error {
        &self.error
    }
    pub fn offset(&self) -> usize {
        self.offset
    }
    pub fn into_error(self) -> Error {
        self.error
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
