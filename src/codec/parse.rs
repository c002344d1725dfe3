//! Recursive-descent, type-directed parser.
//!
//! The parser walks the text once with a byte cursor while holding an
//! optional destination. The destination's declared type decides which
//! literal kinds are legal and how numbers are lexed; with no destination the
//! value is consumed and dropped. Every failure carries the byte offset where
//! it was detected.
use std::fmt;

use crate::date;
use crate::error::{Error, ParseError};
use crate::field::{ArrayField, Field, FieldType, JsonKind, NodeMut, ObjectField};
use crate::variant::{Subtype, Variant};

use super::MAX_DEPTH;
use super::number::{self, is_float, is_hex};

type Parsed<T = ()> = Result<T, ParseError>;

/// Where a value sits in the document, rendered only when a diagnostic
/// needs it.
enum Label<'n> {
    Root,
    Key(&'n str),
    Item(&'n Label<'n>, usize),
}

impl fmt::Display for Label<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Root => f.write_str("<root>"),
            Label::Key(key) => f.write_str(key),
            Label::Item(parent, index) => write!(f, "{parent}[{index}]"),
        }
    }
}

pub struct Parser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
}

enum Members<'t> {
    Discard,
    Schema(&'t mut dyn ObjectField),
    Variant(&'t mut Variant),
}

enum Items<'t> {
    Discard,
    Array(&'t mut dyn ArrayField),
    Variant(&'t mut Variant),
}

impl<'a> Parser<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, bytes: text.as_bytes(), pos: 0, depth: 0 }
    }

    /// Parses one complete document into `target`. Empty (or all-whitespace)
    /// input succeeds and leaves `target` untouched.
    pub fn document(&mut self, target: &mut dyn Field) -> Parsed {
        self.skip_whitespace();
        if self.at_end() {
            return Ok(());
        }
        self.value(&Label::Root, Some(target))?;
        self.skip_whitespace();
        if !self.at_end() {
            return Err(Error::UnexpectedCharacter.at(self.pos));
        }
        Ok(())
    }

    fn value(&mut self, label: &Label<'_>, target: Option<&mut dyn Field>) -> Parsed {
        self.skip_whitespace();
        let start = self.pos;
        let Some(byte) = self.peek() else {
            return Err(self.end_of_input());
        };
        match byte {
            b'n' => {
                self.keyword("null")?;
                if let Some(target) = target {
                    target.set_null();
                }
                Ok(())
            }
            b'{' => self.object(label, target, start),
            b'[' => self.array(label, target, start),
            b'"' => self.string_value(label, target, start),
            b't' | b'f' => self.bool_value(label, target, start),
            b'-' | b'+' | b'.' | b'0'..=b'9' => self.number_value(label, target, start),
            _ => Err(Error::UnexpectedCharacter.at(start)),
        }
    }

    fn object(&mut self, label: &Label<'_>, target: Option<&mut dyn Field>, start: usize) -> Parsed {
        let mut members = match target {
            None => Members::Discard,
            Some(field) => match field.node_mut() {
                NodeMut::Object(object) => {
                    object.clear();
                    object.define();
                    Members::Schema(object)
                }
                NodeMut::Variant(variant) => {
                    variant.clear();
                    variant.define(Subtype::Object);
                    Members::Variant(variant)
                }
                other => return Err(mismatch(label, other.field_type(), JsonKind::Object, start)),
            },
        };
        self.enter(start)?;
        self.pos += 1;
        self.skip_whitespace();
        if self.eat(b'}') {
            self.depth -= 1;
            return Ok(());
        }
        loop {
            self.skip_whitespace();
            let key_at = self.pos;
            match self.peek() {
                Some(b'"') => {}
                Some(_) => return Err(Error::UnexpectedCharacter.at(key_at)),
                None => return Err(self.end_of_input()),
            }
            let key = self.string()?;
            self.skip_whitespace();
            self.expect(b':')?;
            match &mut members {
                Members::Discard => self.value(&Label::Key(&key), None)?,
                Members::Schema(object) => {
                    let member = resolve(&mut **object, &key, key_at)?;
                    self.value(&Label::Key(&key), member)?;
                }
                Members::Variant(variant) => {
                    let member = variant.new_field(&key).into_inner();
                    self.value(&Label::Key(&key), member.map(|member| member as &mut dyn Field))?;
                }
            }
            self.skip_whitespace();
            match self.next_byte() {
                Some(b',') => continue,
                Some(b'}') => break,
                Some(_) => return Err(Error::UnexpectedCharacter.at(self.pos - 1)),
                None => return Err(self.end_of_input()),
            }
        }
        self.depth -= 1;
        Ok(())
    }

    fn array(&mut self, label: &Label<'_>, target: Option<&mut dyn Field>, start: usize) -> Parsed {
        let mut items = match target {
            None => Items::Discard,
            Some(field) => match field.node_mut() {
                NodeMut::Array(array) => {
                    array.clear();
                    array.define();
                    Items::Array(array)
                }
                NodeMut::Variant(variant) => {
                    variant.clear();
                    variant.define(Subtype::Array);
                    Items::Variant(variant)
                }
                other => return Err(mismatch(label, other.field_type(), JsonKind::Array, start)),
            },
        };
        self.enter(start)?;
        self.pos += 1;
        self.skip_whitespace();
        if self.eat(b']') {
            self.depth -= 1;
            return Ok(());
        }
        let mut index = 0usize;
        loop {
            let item_label = Label::Item(label, index);
            match &mut items {
                Items::Discard => self.value(&item_label, None)?,
                Items::Array(array) => {
                    let item = array.new_item();
                    self.value(&item_label, Some(item))?;
                }
                Items::Variant(variant) => {
                    let item = variant.new_item().into_inner();
                    self.value(&item_label, item.map(|item| item as &mut dyn Field))?;
                }
            }
            index += 1;
            self.skip_whitespace();
            match self.next_byte() {
                Some(b',') => continue,
                Some(b']') => break,
                Some(_) => return Err(Error::UnexpectedCharacter.at(self.pos - 1)),
                None => return Err(self.end_of_input()),
            }
        }
        self.depth -= 1;
        Ok(())
    }

    fn string_value(&mut self, label: &Label<'_>, target: Option<&mut dyn Field>, start: usize) -> Parsed {
        let Some(field) = target else {
            self.string()?;
            return Ok(());
        };
        match field.node_mut() {
            NodeMut::Str(leaf) => leaf.set(self.string()?),
            NodeMut::Date(leaf) => {
                let text = self.string()?;
                leaf.set(date::parse(&text).map_err(|error| error.at(start))?);
            }
            NodeMut::Variant(variant) => variant.set(self.string()?),
            other => return Err(mismatch(label, other.field_type(), JsonKind::String, start)),
        }
        Ok(())
    }

    fn bool_value(&mut self, label: &Label<'_>, target: Option<&mut dyn Field>, start: usize) -> Parsed {
        let lex = |parser: &mut Self| -> Parsed<bool> {
            if parser.peek() == Some(b't') {
                parser.keyword("true").map(|_| true)
            } else {
                parser.keyword("false").map(|_| false)
            }
        };
        let Some(field) = target else {
            lex(self)?;
            return Ok(());
        };
        match field.node_mut() {
            NodeMut::Bool(leaf) => leaf.set(lex(self)?),
            NodeMut::Variant(variant) => variant.set(lex(self)?),
            other => return Err(mismatch(label, other.field_type(), JsonKind::Bool, start)),
        }
        Ok(())
    }

    fn number_value(&mut self, label: &Label<'_>, target: Option<&mut dyn Field>, start: usize) -> Parsed {
        let Some(field) = target else {
            self.number_token()?;
            return Ok(());
        };
        match field.node_mut() {
            NodeMut::Int(leaf) => {
                let token = self.integer_token()?;
                leaf.set(number::parse_integer(token).map_err(|error| error.at(start))?);
            }
            NodeMut::Num(leaf) => {
                let token = self.number_token()?;
                leaf.set(number::parse_float(token).map_err(|error| error.at(start))?);
            }
            NodeMut::Variant(variant) => {
                let token = self.number_token()?;
                if is_float(token) {
                    variant.set(number::parse_float(token).map_err(|error| error.at(start))?);
                } else {
                    match number::parse_integer(token) {
                        Ok(value) => variant.set(value),
                        // decimal beyond i64 degrades to a float
                        Err(_) if !is_hex(token) => {
                            variant.set(number::parse_float(token).map_err(|error| error.at(start))?)
                        }
                        Err(error) => return Err(error.at(start)),
                    }
                }
            }
            other => return Err(mismatch(label, other.field_type(), JsonKind::Number, start)),
        }
        Ok(())
    }

    // ————————————————————————————————————————————————————————————————————————
    // LEXING
    // ————————————————————————————————————————————————————————————————————————

    /// Reads a quoted string starting at the opening quote.
    fn string(&mut self) -> Parsed<String> {
        self.pos += 1;
        let mut out = String::new();
        loop {
            let run = self.pos;
            while let Some(byte) = self.peek() {
                if byte == b'"' || byte == b'\\' {
                    break;
                }
                self.pos += 1;
            }
            out.push_str(&self.text[run..self.pos]);
            match self.next_byte() {
                Some(b'"') => return Ok(out),
                Some(_) => out.push(self.escape()?),
                None => return Err(self.end_of_input()),
            }
        }
    }

    fn escape(&mut self) -> Parsed<char> {
        let Some(code) = self.next_byte() else {
            return Err(self.end_of_input());
        };
        let decoded = match code {
            b'"' => '"',
            b'\\' => '\\',
            b'/' => '/',
            b'b' => '\u{8}',
            b'f' => '\u{c}',
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            b'u' => self.unicode()?,
            _ => return Err(Error::UnexpectedCharacter.at(self.pos - 1)),
        };
        Ok(decoded)
    }

    /// Decodes the digits of a `\u` escape. A high surrogate followed by a
    /// `\u` low surrogate yields one supplementary code point; an unpaired
    /// surrogate yields U+FFFD.
    fn unicode(&mut self) -> Parsed<char> {
        let unit = self.hex4()?;
        if !(0xD800..0xDC00).contains(&unit) {
            return Ok(char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER));
        }
        if self.bytes[self.pos..].starts_with(b"\\u") {
            let resume = self.pos;
            self.pos += 2;
            let low = self.hex4()?;
            if (0xDC00..0xE000).contains(&low) {
                let code = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                return Ok(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            self.pos = resume;
        }
        Ok(char::REPLACEMENT_CHARACTER)
    }

    fn hex4(&mut self) -> Parsed<u32> {
        let mut unit = 0;
        for _ in 0..4 {
            let Some(byte) = self.peek() else {
                return Err(self.end_of_input());
            };
            let digit = char::from(byte)
                .to_digit(16)
                .ok_or_else(|| Error::UnexpectedCharacter.at(self.pos))?;
            unit = unit * 16 + digit;
            self.pos += 1;
        }
        Ok(unit)
    }

    fn keyword(&mut self, word: &str) -> Parsed {
        for expected in word.bytes() {
            match self.peek() {
                Some(byte) if byte == expected => self.pos += 1,
                Some(_) => return Err(Error::UnexpectedCharacter.at(self.pos)),
                None => return Err(self.end_of_input()),
            }
        }
        Ok(())
    }

    /// Lexes any numeric literal: `0x` hex, or a decimal with at most one
    /// `.` and one exponent. Signs are legal first or right after the
    /// exponent marker.
    fn number_token(&mut self) -> Parsed<&'a str> {
        let start = self.pos;
        if self.at_hex_prefix() {
            return Ok(self.hex_token());
        }
        let mut seen_dot = false;
        let mut seen_exponent = false;
        while let Some(byte) = self.peek() {
            match byte {
                b'0'..=b'9' => {}
                b'+' | b'-' => {
                    let after_marker = self.pos > start && matches!(self.bytes[self.pos - 1], b'e' | b'E');
                    if self.pos != start && !after_marker {
                        return Err(Error::UnexpectedCharacter.at(self.pos));
                    }
                }
                b'.' => {
                    if seen_dot || seen_exponent {
                        return Err(Error::UnexpectedCharacter.at(self.pos));
                    }
                    seen_dot = true;
                }
                b'e' | b'E' => {
                    if seen_exponent {
                        return Err(Error::UnexpectedCharacter.at(self.pos));
                    }
                    seen_exponent = true;
                }
                _ => break,
            }
            self.pos += 1;
        }
        Ok(&self.text[start..self.pos])
    }

    /// Lexes an optionally signed run of digits, or a hex literal. Anything
    /// after the digits is left for the enclosing context.
    fn integer_token(&mut self) -> Parsed<&'a str> {
        let start = self.pos;
        if self.at_hex_prefix() {
            return Ok(self.hex_token());
        }
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        let digits = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        if self.pos == digits {
            self.pos = start;
            let token = self.number_token()?;
            return Err(Error::MalformedNumber(token.to_owned()).at(start));
        }
        Ok(&self.text[start..self.pos])
    }

    fn at_hex_prefix(&self) -> bool {
        self.bytes[self.pos..].starts_with(b"0x") || self.bytes[self.pos..].starts_with(b"0X")
    }

    fn hex_token(&mut self) -> &'a str {
        let start = self.pos;
        self.pos += 2;
        while self.peek().is_some_and(|byte| byte.is_ascii_hexdigit()) {
            self.pos += 1;
        }
        &self.text[start..self.pos]
    }

    // ————————————————————————————————————————————————————————————————————————
    // CURSOR
    // ————————————————————————————————————————————————————————————————————————

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn next_byte(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    fn eat(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            return true;
        }
        false
    }

    fn expect(&mut self, expected: u8) -> Parsed {
        match self.peek() {
            Some(byte) if byte == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(_) => Err(Error::UnexpectedCharacter.at(self.pos)),
            None => Err(self.end_of_input()),
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.pos += 1;
        }
    }

    fn enter(&mut self, at: usize) -> Parsed {
        if self.depth >= MAX_DEPTH {
            return Err(Error::NestingTooDeep(MAX_DEPTH).at(at));
        }
        self.depth += 1;
        Ok(())
    }

    fn end_of_input(&self) -> ParseError {
        Error::UnexpectedEndOfInput.at(self.text.len())
    }
}

fn mismatch(name: impl fmt::Display, expected: FieldType, actual: JsonKind, at: usize) -> ParseError {
    Error::TypeMismatch { field: name.to_string(), expected, actual }.at(at)
}

/// Finds the member a key addresses inside a schema object.
///
/// A key registered verbatim wins. Otherwise a dotted key walks one segment
/// per level: schema objects are looked up by name, variants reached on the
/// way are nested on demand. An unknown segment yields `None` so the value is
/// skipped.
fn resolve<'o>(object: &'o mut dyn ObjectField, key: &str, at: usize) -> Parsed<Option<&'o mut dyn Field>> {
    if object.field(key).is_some() {
        return Ok(object.field_mut(key));
    }
    let Some((head, rest)) = key.split_once('.') else {
        return Ok(None);
    };
    log::trace!("resolving dotted key `{key}`");
    let Some(mut current) = object.field_mut(head) else {
        return Ok(None);
    };
    for segment in rest.split('.') {
        current = match current.node_mut() {
            NodeMut::Object(inner) => {
                if inner.is_null() {
                    inner.clear();
                }
                match inner.field_mut(segment) {
                    Some(member) => member,
                    None => return Ok(None),
                }
            }
            NodeMut::Variant(variant) => match variant.entry(segment).into_inner() {
                Some(member) => member as &mut dyn Field,
                None => return Ok(None),
            },
            other => return Err(mismatch(key, other.field_type(), JsonKind::Object, at)),
        };
    }
    Ok(Some(current))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Array, Int, Num, Str};
    use pretty_assertions::assert_eq;

    fn parse(text: &str, target: &mut dyn Field) -> Parsed {
        Parser::new(text).document(target)
    }

    #[test]
    fn escapes_decode() {
        let mut leaf = Str::default();
        parse(r#""a\"b\\c\/d\n\t\u0041\u00e9""#, &mut leaf).unwrap();
        assert_eq!(leaf.as_str(), Some("a\"b\\c/d\n\tAé"));
    }

    #[test]
    fn surrogate_pairs_combine() {
        let mut leaf = Str::default();
        parse(r#""\ud83d\ude00""#, &mut leaf).unwrap();
        assert_eq!(leaf.as_str(), Some("\u{1F600}"));

        parse(r#""\ud83dx""#, &mut leaf).unwrap();
        assert_eq!(leaf.as_str(), Some("\u{FFFD}x"));

        parse(r#""\ude00""#, &mut leaf).unwrap();
        assert_eq!(leaf.as_str(), Some("\u{FFFD}"));
    }

    #[test]
    fn unknown_escape_is_rejected() {
        let error = parse(r#""a\qb""#, &mut Str::default()).unwrap_err();
        assert_eq!(error.error(), &Error::UnexpectedCharacter);
        assert_eq!(error.offset(), 3);
    }

    #[test]
    fn int_destination_lexes_integers_only() {
        let mut leaf = Int::default();
        let error = parse("1.5", &mut leaf).unwrap_err();
        assert_eq!(error.error(), &Error::UnexpectedCharacter);
        assert_eq!(error.offset(), 1);

        let error = parse("-", &mut leaf).unwrap_err();
        assert_eq!(error.error(), &Error::MalformedNumber("-".into()));
        assert_eq!(error.offset(), 0);
    }

    #[test]
    fn sign_only_at_start_or_after_exponent() {
        let mut leaf = Num::default();
        parse("-1.5E-3", &mut leaf).unwrap();
        assert_eq!(leaf.get(), Some(&-0.0015));

        let error = parse("1-2", &mut leaf).unwrap_err();
        assert_eq!(error.error(), &Error::UnexpectedCharacter);
        assert_eq!(error.offset(), 1);

        let error = parse("1.2.3", &mut leaf).unwrap_err();
        assert_eq!(error.offset(), 3);

        let error = parse("1e5.0", &mut leaf).unwrap_err();
        assert_eq!(error.offset(), 3);
    }

    #[test]
    fn failure_deep_inside_aborts_the_parse() {
        let mut variant = Variant::new();
        let error = parse(r#"{"a": [1, {"b": tru}]}"#, &mut variant).unwrap_err();
        assert_eq!(error.error(), &Error::UnexpectedCharacter);
        assert_eq!(error.offset(), 19);
    }

    #[test]
    fn depth_is_bounded() {
        let deep = "[".repeat(MAX_DEPTH + 1);
        let mut variant = Variant::new();
        let error = parse(&deep, &mut variant).unwrap_err();
        assert_eq!(error.error(), &Error::NestingTooDeep(MAX_DEPTH));
        assert_eq!(error.offset(), MAX_DEPTH);

        let fits = format!("{}{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        parse(&fits, &mut variant).unwrap();
    }

    #[test]
    fn nested_arrays_label_elements() {
        let mut array = Array::<Array<Int>>::new();
        let error = parse(r#"[[1], [2, "x"]]"#, &mut array).unwrap_err();
        assert_eq!(
            error.error(),
            &Error::TypeMismatch {
                field: "<root>[1][1]".into(),
                expected: FieldType::Int,
                actual: JsonKind::String,
            }
        );
        assert_eq!(error.offset(), 10);
    }

    #[test]
    fn labels_render_keys_and_indices() {
        let root = Label::Root;
        let key = Label::Key("list");
        let item = Label::Item(&key, 3);
        let nested = Label::Item(&item, 0);
        assert_eq!(root.to_string(), "<root>");
        assert_eq!(nested.to_string(), "list[3][0]");
        assert_eq!(Label::Item(&root, 12).to_string(), "<root>[12]");
    }
}
