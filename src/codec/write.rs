//! Compact serializer.
//!
//! Undefined values produce no text at all: an Undefined root writes the empty
//! string, Undefined members and elements are skipped together with their
//! separating comma. Strings escape `\` and `"` only.
use crate::field::{Field, Node, State};
use crate::variant::{Value, Variant};

use super::number::write_float;

pub fn write_value(out: &mut String, field: &dyn Field) {
    match field.state() {
        State::Undefined => return,
        State::Null => {
            out.push_str("null");
            return;
        }
        State::HasValue => {}
    }
    match field.node() {
        Node::Int(leaf) => {
            if let Some(value) = leaf.get() {
                out.push_str(&value.to_string());
            }
        }
        Node::Num(leaf) => {
            if let Some(value) = leaf.get() {
                write_float(out, *value);
            }
        }
        Node::Str(leaf) => {
            if let Some(value) = leaf.get() {
                write_str(out, value);
            }
        }
        Node::Bool(leaf) => {
            if let Some(value) = leaf.get() {
                out.push_str(if *value { "true" } else { "false" });
            }
        }
        Node::Date(leaf) => {
            if let Some(timestamp) = leaf.get() {
                match timestamp.to_iso8601() {
                    Some(text) => write_str(out, &text),
                    None => {
                        log::warn!("timestamp {} is outside the calendar range, writing null", timestamp.secs());
                        out.push_str("null");
                    }
                }
            }
        }
        Node::Array(array) => {
            out.push('[');
            let mut first = true;
            for index in 0..array.len() {
                let Some(item) = array.item(index) else { continue };
                if item.is_undefined() {
                    continue;
                }
                if !first {
                    out.push(',');
                }
                first = false;
                write_value(out, item);
            }
            out.push(']');
        }
        Node::Object(object) => {
            out.push('{');
            let mut first = true;
            object.for_each_field(&mut |name, member| {
                if member.is_undefined() {
                    return;
                }
                if !first {
                    out.push(',');
                }
                first = false;
                write_str(out, name);
                out.push(':');
                write_value(out, member);
            });
            out.push('}');
        }
        Node::Variant(variant) => write_variant(out, variant),
    }
}

fn write_variant(out: &mut String, variant: &Variant) {
    match variant.value() {
        Value::Undefined => {}
        Value::Null => out.push_str("null"),
        Value::Bool(value) => out.push_str(if *value { "true" } else { "false" }),
        Value::Int(value) => out.push_str(&value.to_string()),
        Value::Num(value) => write_float(out, *value),
        Value::Str(value) => write_str(out, value),
        Value::Array(items) => {
            out.push('[');
            let mut first = true;
            for item in items.iter().filter(|item| !item.is_undefined()) {
                if !first {
                    out.push(',');
                }
                first = false;
                write_variant(out, item);
            }
            out.push(']');
        }
        Value::Object(fields) => {
            out.push('{');
            let mut first = true;
            for (name, member) in fields.iter().filter(|(_, member)| !member.is_undefined()) {
                if !first {
                    out.push(',');
                }
                first = false;
                write_str(out, name);
                out.push(':');
                write_variant(out, member);
            }
            out.push('}');
        }
    }
}

/// Quotes `text`, escaping backslash and double quote. Control characters
/// pass through verbatim.
pub fn write_str(out: &mut String, text: &str) {
    out.push('"');
    let mut rest = text;
    while let Some(at) = rest.find(['"', '\\']) {
        out.push_str(&rest[..at]);
        out.push('\\');
        out.push_str(&rest[at..at + 1]);
        rest = &rest[at + 1..];
    }
    out.push_str(rest);
    out.push('"');
}
