//! Conversions between [`Variant`] and the serde ecosystem.
use serde::ser::{Serialize, Serializer};
use serde_json::{Map, Number};

use crate::field::Field;

use super::{Value, Variant};

impl From<serde_json::Value> for Variant {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Variant::null(),
            serde_json::Value::Bool(value) => value.into(),
            serde_json::Value::Number(number) => match number.as_i64() {
                Some(value) => value.into(),
                None => number.as_f64().map_or_else(Variant::null, Variant::from),
            },
            serde_json::Value::String(value) => value.into(),
            serde_json::Value::Array(items) => items.into_iter().collect(),
            serde_json::Value::Object(fields) => Variant {
                value: Value::Object(
                    fields
                        .into_iter()
                        .map(|(name, value)| (name, Variant::from(value)))
                        .collect(),
                ),
            },
        }
    }
}

/// Undefined becomes `null` at the top and is dropped inside containers.
impl From<&Variant> for serde_json::Value {
    fn from(variant: &Variant) -> Self {
        match variant.value() {
            Value::Undefined | Value::Null => serde_json::Value::Null,
            Value::Bool(value) => serde_json::Value::Bool(*value),
            Value::Int(value) => serde_json::Value::Number((*value).into()),
            Value::Num(value) => Number::from_f64(*value)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::Str(value) => serde_json::Value::String(value.clone()),
            Value::Array(items) => items
                .iter()
                .filter(|item| !item.is_undefined())
                .map(serde_json::Value::from)
                .collect(),
            Value::Object(fields) => {
                let map: Map<String, serde_json::Value> = fields
                    .iter()
                    .filter(|(_, member)| !member.is_undefined())
                    .map(|(name, member)| (name.clone(), member.into()))
                    .collect();
                serde_json::Value::Object(map)
            }
        }
    }
}

impl Serialize for Variant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value() {
            Value::Undefined | Value::Null => serializer.serialize_unit(),
            Value::Bool(value) => serializer.serialize_bool(*value),
            Value::Int(value) => serializer.serialize_i64(*value),
            Value::Num(value) => serializer.serialize_f64(*value),
            Value::Str(value) => serializer.serialize_str(value),
            Value::Array(items) => serializer.collect_seq(items.iter().filter(|item| !item.is_undefined())),
            Value::Object(fields) => {
                serializer.collect_map(fields.iter().filter(|(_, member)| !member.is_undefined()))
            }
        }
    }
}
