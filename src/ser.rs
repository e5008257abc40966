//! Serialization into configuration trees and ISC text.
//!
//! Two layers live here:
//!
//! - [`ValueSerializer`], a serde `Serializer` that turns any `Serialize`
//!   type into a [`Value`] tree (see [`to_value`](crate::to_value));
//! - the text writer behind [`to_string`](crate::to_string) and
//!   `Display for Value`.
//!
//! ## Type Mapping
//!
//! | Rust | Value |
//! |---|---|
//! | integers | `Integer` (`u64` above `i64::MAX` is an error) |
//! | `bool` | `Integer(1)` / `Integer(0)` |
//! | `String`, `&str`, `char` | `Text` |
//! | `None`, `()`, unit structs | `Empty`, and skipped as a map entry |
//! | sequences, tuples, bytes | `List` |
//! | maps, structs | `Map` |
//! | unit variants | `Text(variant)` |
//! | other variants | `Map` with the variant name as its only key |
//! | `f32`, `f64` | [`Error::UnsupportedType`] |
//!
//! ## Usage
//!
//! ```rust
//! use serde::Serialize;
//! use serde_isc::{to_string, to_value, Value};
//!
//! #[derive(Serialize)]
//! struct Server { host: String, port: u16, secret: Option<String> }
//!
//! let server = Server { host: "radius".to_string(), port: 1812, secret: None };
//!
//! let value = to_value(&server).unwrap();
//! assert_eq!(value.lookup("port"), Some(&Value::Integer(1812)));
//! assert_eq!(value.get("secret"), None);
//!
//! assert_eq!(to_string(&server).unwrap(), "host \"radius\";\nport 1812;\n");
//! ```

use crate::{Error, Map, Result, Value};
use serde::{ser, Serialize};
use std::fmt::Write;

/// Serializer producing a [`Value`] tree.
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
    variant: Option<&'static str>,
}

pub struct SerializeMap {
    map: Map,
    current_key: Option<String>,
    variant: Option<&'static str>,
}

/// Wraps the payload of a non-unit enum variant as `{ variant payload; }`.
fn tag_variant(variant: Option<&'static str>, payload: Value) -> Value {
    match variant {
        Some(name) => {
            let mut map = Map::with_capacity(1);
            map.insert(name.to_string(), payload);
            Value::Map(map)
        }
        None => payload,
    }
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeMap;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Integer(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        i64::try_from(v)
            .map(Value::Integer)
            .map_err(|_| Error::custom(format!("integer {} does not fit in 64 signed bits", v)))
    }

    fn serialize_f32(self, _v: f32) -> Result<Value> {
        Err(Error::unsupported_type("f32"))
    }

    fn serialize_f64(self, _v: f64) -> Result<Value> {
        Err(Error::unsupported_type("f64"))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::Text(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::Text(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::List(
            v.iter().map(|&b| Value::Integer(i64::from(b))).collect(),
        ))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Empty)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Empty)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Empty)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::Text(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Ok(tag_variant(Some(variant), to_value(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0), None))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, Some(variant)))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len.unwrap_or(0), None))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len, None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len, Some(variant)))
    }
}

impl SerializeVec {
    fn new(capacity: usize, variant: Option<&'static str>) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
            variant,
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn finish(self) -> Value {
        tag_variant(self.variant, Value::List(self.vec))
    }
}

impl SerializeMap {
    fn new(capacity: usize, variant: Option<&'static str>) -> Self {
        SerializeMap {
            map: Map::with_capacity(capacity),
            current_key: None,
            variant,
        }
    }

    // Empty values have no textual form; a missing key reads back as `None`.
    fn insert<T: ?Sized + Serialize>(&mut self, key: String, value: &T) -> Result<()> {
        let value = to_value(value)?;
        if value != Value::Empty {
            self.map.insert(key, value);
        }
        Ok(())
    }

    fn finish(self) -> Value {
        tag_variant(self.variant, Value::Map(self.map))
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match to_value(key)? {
            Value::Text(s) => {
                self.current_key = Some(s);
                Ok(())
            }
            Value::Integer(i) => {
                self.current_key = Some(i.to_string());
                Ok(())
            }
            _ => Err(Error::custom("Map keys must be strings")),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.insert(key, value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.insert(key.to_string(), value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.insert(key.to_string(), value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    value.serialize(ValueSerializer)
}

/// Renders a tree as ISC text, rejecting trees the grammar cannot express
/// so that the output always parses back to the same tree. The one lossy
/// case is an empty list: `{ }` parses as an empty map, which
/// [`ValueDeserializer`](crate::ValueDeserializer) accepts as an empty
/// sequence.
pub(crate) fn render(value: &Value) -> Result<String> {
    let map = match value {
        Value::Map(map) => map,
        other => {
            return Err(Error::unsupported_type(&format!(
                "top-level {} (the root must be a map)",
                other.kind()
            )))
        }
    };

    check_map(map)?;

    let mut output = String::with_capacity(256);
    write_entries(&mut output, map, 0);
    Ok(output)
}

fn check_map(map: &Map) -> Result<()> {
    for (key, value) in map {
        if !is_keyword(key) {
            return Err(Error::unsupported_type(&format!(
                "key `{}` is not a keyword",
                key.escape_debug()
            )));
        }
        let checked = match value {
            Value::List(elements) => check_list(elements),
            Value::Map(inner) => check_map(inner),
            scalar => check_scalar(scalar),
        };
        checked.map_err(|e| match e {
            Error::UnsupportedType(msg) => Error::UnsupportedType(format!("{} at `{}`", msg, key)),
            other => other,
        })?;
    }
    Ok(())
}

fn check_list(elements: &[Value]) -> Result<()> {
    if let Some(Value::Integer(_)) = elements.first() {
        return Err(Error::unsupported_type("list starting with an integer"));
    }
    for element in elements {
        if *element == Value::Empty {
            return Err(Error::unsupported_type("empty value inside a list"));
        }
        if element.is_list() || element.is_map() {
            return Err(Error::unsupported_type(&format!(
                "{} inside a list",
                element.kind()
            )));
        }
        check_scalar(element)?;
    }
    Ok(())
}

fn check_scalar(value: &Value) -> Result<()> {
    match value {
        Value::Integer(i) if *i < 0 => Err(Error::unsupported_type("negative integer")),
        Value::Text(s) if s.contains('"') => {
            Err(Error::unsupported_type("text containing a double quote"))
        }
        _ => Ok(()),
    }
}

fn is_keyword(key: &str) -> bool {
    let mut bytes = key.bytes();
    matches!(bytes.next(), Some(b) if b.is_ascii_alphabetic() || b == b'_')
        && bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

fn indent(output: &mut String, depth: usize) {
    for _ in 0..depth {
        output.push('\t');
    }
}

/// Writes `key value;` lines for every non-empty entry.
fn write_entries(output: &mut String, map: &Map, depth: usize) {
    for (key, value) in map {
        if *value == Value::Empty {
            continue;
        }
        indent(output, depth);
        output.push_str(key);
        output.push(' ');
        write_value(output, value, depth);
        output.push_str(";\n");
    }
}

/// Writes a single value; containers open a braced block whose closing
/// brace is indented to `depth`. Nothing is validated here.
pub(crate) fn write_value(output: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Empty => {}
        Value::Integer(i) => {
            let _ = write!(output, "{}", i);
        }
        Value::Text(s) => {
            output.push('"');
            output.push_str(s);
            output.push('"');
        }
        Value::List(elements) if elements.is_empty() => output.push_str("{ }"),
        Value::Map(map) if map.is_empty() => output.push_str("{ }"),
        Value::List(elements) => {
            output.push_str("{\n");
            for element in elements.iter().filter(|e| **e != Value::Empty) {
                indent(output, depth + 1);
                write_value(output, element, depth + 1);
                output.push_str(";\n");
            }
            indent(output, depth);
            output.push('}');
        }
        Value::Map(map) => {
            output.push_str("{\n");
            write_entries(output, map, depth + 1);
            indent(output, depth);
            output.push('}');
        }
    }
}
