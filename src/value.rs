//! Typed configuration trees.
//!
//! This module provides the [`Value`] enum, the node type of every parsed
//! configuration, and [`Kind`], its type tag.
//!
//! ## Core Types
//!
//! - [`Value`]: `Empty`, `Integer`, `Text`, `List` or `Map`
//! - [`Kind`]: the tag of a value, compared during type-checked merges
//!
//! ## Usage Patterns
//!
//! ### Reading Parsed Values
//!
//! ```rust
//! use serde_isc::parse;
//!
//! let config = parse(b"RADIUS { server { port 1812; }; };").unwrap();
//!
//! assert_eq!(config.lookup("RADIUS/server/port").and_then(|v| v.as_i64()), Some(1812));
//! assert!(config.lookup("RADIUS/client").is_none());
//! ```
//!
//! ### Checked Access
//!
//! The `try_*` accessors report reads through the wrong tag as
//! [`Error::InvalidAccess`](crate::Error::InvalidAccess):
//!
//! ```rust
//! use serde_isc::{Error, Value};
//!
//! let value = Value::from("1812");
//! assert!(matches!(value.try_i64(), Err(Error::InvalidAccess { .. })));
//! assert_eq!(value.try_str().unwrap(), "1812");
//! ```

use crate::{Error, Map, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A node of a configuration tree.
///
/// Every `List` and `Map` exclusively owns its children.
///
/// # Examples
///
/// ```rust
/// use serde_isc::{Kind, Value};
///
/// let port = Value::Integer(1812);
/// let dir = Value::Text("/var/log".to_string());
///
/// assert_eq!(port.kind(), Kind::Integer);
/// assert!(dir.is_text());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Value {
    /// No payload. Only used as a placeholder before a value is assigned.
    #[default]
    Empty,
    Integer(i64),
    Text(String),
    List(Vec<Value>),
    Map(Map),
}

/// The type tag of a [`Value`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Empty,
    Integer,
    Text,
    List,
    Map,
}

impl Kind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Kind::Empty => "empty",
            Kind::Integer => "integer",
            Kind::Text => "text",
            Kind::List => "list",
            Kind::Map => "map",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    /// Creates a value of the given kind holding its zero payload: `0`, `""`,
    /// an empty list or an empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_isc::{Kind, Value};
    ///
    /// assert_eq!(Value::empty_of(Kind::List), Value::List(Vec::new()));
    /// assert_eq!(Value::empty_of(Kind::Empty), Value::Empty);
    /// ```
    #[must_use]
    pub fn empty_of(kind: Kind) -> Self {
        match kind {
            Kind::Empty => Value::Empty,
            Kind::Integer => Value::Integer(0),
            Kind::Text => Value::Text(String::new()),
            Kind::List => Value::List(Vec::new()),
            Kind::Map => Value::Map(Map::new()),
        }
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Value::Empty => Kind::Empty,
            Value::Integer(_) => Kind::Integer,
            Value::Text(_) => Kind::Text,
            Value::List(_) => Kind::List,
            Value::Map(_) => Kind::Map,
        }
    }

    /// Drops the payload and resets the value to [`Value::Empty`].
    pub fn clear(&mut self) {
        *self = Value::Empty;
    }

    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// If the value is an integer, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// If the value is text, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Reads an integer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAccess`] if the value is not an integer.
    pub fn try_i64(&self) -> Result<i64> {
        self.as_i64()
            .ok_or_else(|| Error::invalid_access(Kind::Integer, self.kind()))
    }

    /// Reads text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAccess`] if the value is not text.
    pub fn try_str(&self) -> Result<&str> {
        self.as_str()
            .ok_or_else(|| Error::invalid_access(Kind::Text, self.kind()))
    }

    /// Reads the elements of a list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAccess`] if the value is not a list.
    pub fn try_list(&self) -> Result<&[Value]> {
        self.as_list()
            .ok_or_else(|| Error::invalid_access(Kind::List, self.kind()))
    }

    /// Reads the entries of a map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAccess`] if the value is not a map.
    pub fn try_map(&self) -> Result<&Map> {
        self.as_map()
            .ok_or_else(|| Error::invalid_access(Kind::Map, self.kind()))
    }

    /// Looks up a key in a map. Returns `None` for missing keys and non-maps.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Looks up a key in a map, distinguishing a wrong tag from a missing key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAccess`] if the value is not a map.
    pub fn try_get(&self, key: &str) -> Result<Option<&Value>> {
        Ok(self.try_map()?.get(key))
    }

    /// Returns the list element at `index`. Returns `None` when out of bounds
    /// or when the value is not a list.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&Value> {
        self.as_list().and_then(|list| list.get(index))
    }

    /// Walks nested maps along a `/`-separated key path.
    ///
    /// An empty path returns the value itself.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_isc::parse;
    ///
    /// let config = parse(b"CGI { logdir \"/var/log/cgi\"; };").unwrap();
    /// assert_eq!(
    ///     config.lookup("CGI/logdir").and_then(|v| v.as_str()),
    ///     Some("/var/log/cgi")
    /// );
    /// ```
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |node, key| node.get(key))
    }
}

impl fmt::Display for Value {
    /// Renders the value as it would appear after a key in a configuration
    /// file: `1812`, `"text"` or a braced block.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        crate::ser::write_value(&mut out, self, 0);
        f.write_str(&out)
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Empty => serializer.serialize_unit(),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Text(s) => serializer.serialize_str(s),
            Value::List(list) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(list.len()))?;
                for element in list {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Map(map) => {
                use serde::ser::SerializeMap;
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an integer, string, sequence or map")
            }

            fn visit_bool<E>(self, value: bool) -> std::result::Result<Value, E> {
                Ok(Value::Integer(i64::from(value)))
            }

            fn visit_i64<E>(self, value: i64) -> std::result::Result<Value, E> {
                Ok(Value::Integer(value))
            }

            fn visit_u64<E>(self, value: u64) -> std::result::Result<Value, E>
            where
                E: de::Error,
            {
                i64::try_from(value)
                    .map(Value::Integer)
                    .map_err(|_| E::custom(format!("integer {} does not fit in 64 bits", value)))
            }

            fn visit_f64<E>(self, value: f64) -> std::result::Result<Value, E>
            where
                E: de::Error,
            {
                Err(E::invalid_type(de::Unexpected::Float(value), &self))
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Value, E> {
                Ok(Value::Text(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> std::result::Result<Value, E> {
                Ok(Value::Text(value))
            }

            fn visit_unit<E>(self) -> std::result::Result<Value, E> {
                Ok(Value::Empty)
            }

            fn visit_none<E>(self) -> std::result::Result<Value, E> {
                Ok(Value::Empty)
            }

            fn visit_some<D>(self, deserializer: D) -> std::result::Result<Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::List(vec))
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = Map::new();
                while let Some((key, value)) = map.next_entry()? {
                    values.insert(key, value);
                }
                Ok(Value::Map(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl TryFrom<Value> for i64 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Integer(i) => Ok(i),
            other => Err(Error::invalid_access(Kind::Integer, other.kind())),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(Error::invalid_access(Kind::Text, other.kind())),
        }
    }
}

impl TryFrom<Value> for Vec<Value> {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::List(list) => Ok(list),
            other => Err(Error::invalid_access(Kind::List, other.kind())),
        }
    }
}

impl TryFrom<Value> for Map {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Map(map) => Ok(map),
            other => Err(Error::invalid_access(Kind::Map, other.kind())),
        }
    }
}

macro_rules! from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Integer(i64::from(value))
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Value::Map(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Value {
        let mut server = Map::new();
        server.insert("port".to_string(), Value::from(1812));
        let mut radius = Map::new();
        radius.insert("server".to_string(), Value::Map(server));
        radius.insert(
            "hosts".to_string(),
            Value::List(vec![Value::from("a"), Value::from("b")]),
        );
        let mut root = Map::new();
        root.insert("RADIUS".to_string(), Value::Map(radius));
        Value::Map(root)
    }

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(Value::Empty.kind(), Kind::Empty);
        assert_eq!(Value::from(1).kind(), Kind::Integer);
        assert_eq!(Value::from("x").kind(), Kind::Text);
        assert_eq!(Value::List(vec![]).kind(), Kind::List);
        assert_eq!(Value::Map(Map::new()).kind(), Kind::Map);
    }

    #[test]
    fn test_try_accessors_report_invalid_access() {
        let value = Value::from(7);
        assert_eq!(value.try_i64().unwrap(), 7);
        assert_eq!(
            value.try_str().unwrap_err(),
            Error::invalid_access("text", "integer")
        );
        assert_eq!(
            value.try_list().unwrap_err(),
            Error::invalid_access("list", "integer")
        );
        assert_eq!(
            value.try_get("x").unwrap_err(),
            Error::invalid_access("map", "integer")
        );
    }

    #[test]
    fn test_lookup_paths() {
        let config = sample();
        assert_eq!(
            config.lookup("RADIUS/server/port").and_then(Value::as_i64),
            Some(1812)
        );
        assert_eq!(config.lookup(""), Some(&config));
        assert!(config.lookup("RADIUS/server/port/deeper").is_none());
        assert!(config.lookup("RADIUS/missing").is_none());
        assert_eq!(
            config.lookup("RADIUS/hosts").and_then(|v| v.at(1)),
            Some(&Value::from("b"))
        );
    }

    #[test]
    fn test_clear_resets_to_empty() {
        let mut value = sample();
        value.clear();
        assert_eq!(value, Value::Empty);
    }

    #[test]
    fn test_tryfrom() {
        assert_eq!(i64::try_from(Value::from(3)).unwrap(), 3);
        assert_eq!(String::try_from(Value::from("s")).unwrap(), "s");
        assert!(i64::try_from(Value::from("s")).is_err());
        assert!(Map::try_from(Value::List(vec![])).is_err());
    }

    #[test]
    fn test_serialize_to_json() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"RADIUS": {"server": {"port": 1812}, "hosts": ["a", "b"]}})
        );
    }

    #[test]
    fn test_deserialize_from_json() {
        let value: Value =
            serde_json::from_str(r#"{"on": true, "n": null, "xs": [1, "two"]}"#).unwrap();
        assert_eq!(value.get("on"), Some(&Value::Integer(1)));
        assert_eq!(value.get("n"), Some(&Value::Empty));
        assert_eq!(
            value.get("xs"),
            Some(&Value::List(vec![Value::from(1), Value::from("two")]))
        );
        assert!(serde_json::from_str::<Value>("1.5").is_err());
    }
}
