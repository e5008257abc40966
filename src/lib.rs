//! # serde_isc
//!
//! A reader, merger and Serde bridge for ISC-style configuration files, the
//! brace-and-semicolon format used by BIND and the ISC DHCP daemons.
//!
//! ## What does ISC configuration look like?
//!
//! ```text
//! CGI {
//!     logdir "/var/log/cgi";
//! };
//! RADIUS {
//!     server { port 1812; };
//!     hosts { "10.0.0.1"; "10.0.0.2"; };
//! };
//! ```
//!
//! A file is an implicit map of keywords to values. A value is a quoted
//! string, an integer, or a `{ ... };` section. A section holding keywords
//! is a map; a section starting with a quoted string is a list.
//!
//! ## Key Features
//!
//! - **Positioned Errors**: every lexical and syntax error carries the byte
//!   offset, line and column of the offending token
//! - **Layered Configuration**: merge a user file onto built-in defaults with
//!   type checking, reporting mismatches by key path
//! - **Serde Compatible**: read and write your own types via
//!   `#[derive(Serialize, Deserialize)]`
//! - **Streaming Pipeline**: scanner, token classifier and parser are
//!   separate pieces that can be driven by hand
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! serde_isc = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! ```
//!
//! ### Reading a Configuration Tree
//!
//! ```rust
//! use serde_isc::parse;
//!
//! let config = parse(b"CGI { logdir \"/var/log/cgi\"; };").unwrap();
//! assert_eq!(
//!     config.lookup("CGI/logdir").and_then(|v| v.as_str()),
//!     Some("/var/log/cgi")
//! );
//! ```
//!
//! ### Defaults
//!
//! ```rust
//! use serde_isc::{isc, parse};
//!
//! let defaults = isc!({ "RADIUS": { "server": { "port": 1812 } } });
//! let mut config = parse(b"CGI { logdir \"/tmp\"; };").unwrap();
//!
//! config.fill_defaults(&defaults).unwrap();
//! assert_eq!(config.lookup("RADIUS/server/port").and_then(|v| v.as_i64()), Some(1812));
//! assert_eq!(config.lookup("CGI/logdir").and_then(|v| v.as_str()), Some("/tmp"));
//! ```
//!
//! ### Basic Serialization and Deserialization
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_isc::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Server {
//!     host: String,
//!     port: u16,
//!     enabled: bool,
//! }
//!
//! let server = Server { host: "radius".to_string(), port: 1812, enabled: true };
//!
//! let text = to_string(&server).unwrap();
//! assert_eq!(text, "host \"radius\";\nport 1812;\nenabled 1;\n");
//!
//! let back: Server = from_str(&text).unwrap();
//! assert_eq!(server, back);
//! ```
//!
//! ## Logging
//!
//! The scanner, parser and merge engine emit `tracing` events (`trace` per
//! token and state transition, `debug` per section and merge). The crate
//! never installs a subscriber.
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Integer literals are range-checked, never wrapped
//! - No panics in the public API; every failure is an [`Error`]
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`defaults.rs`** - Layering a configuration file over defaults
//! - **`typed_config.rs`** - Reading a configuration into Rust structs
//!
//! Run any example with: `cargo run --example <name>`

pub mod classify;
pub mod de;
pub mod error;
pub mod macros;
pub mod map;
pub mod merge;
pub mod options;
pub mod parser;
pub mod scanner;
pub mod ser;
pub mod span;
pub mod value;

pub use classify::TokenHandler;
pub use de::ValueDeserializer;
pub use error::{Error, Result};
pub use map::Map;
pub use options::MergeOptions;
pub use parser::{parse, parse_str, Parser, State};
pub use scanner::{Scanner, Token, TokenKind};
pub use ser::ValueSerializer;
pub use span::{Position, Span};
pub use value::{Kind, Value};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Serialize any `T: Serialize` to ISC configuration text.
///
/// `T` must serialize to a map (a struct, a map, or a [`Value::Map`]); its
/// entries become the top-level statements.
///
/// # Examples
///
/// ```rust
/// use serde_isc::to_string;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Cgi { logdir: String }
///
/// let cgi = Cgi { logdir: "/var/log".to_string() };
/// assert_eq!(to_string(&cgi).unwrap(), "logdir \"/var/log\";\n");
/// ```
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] if the value has no ISC text form,
/// e.g. floats, a non-map root, or keys that are not keywords.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    ser::render(&to_value(value)?)
}

/// Convert any `T: Serialize` to a [`Value`] tree.
///
/// Useful for building defaults from typed structs before merging.
///
/// # Examples
///
/// ```rust
/// use serde_isc::{to_value, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Server { port: u16 }
///
/// let value: Value = to_value(&Server { port: 1812 }).unwrap();
/// assert_eq!(value.get("port"), Some(&Value::Integer(1812)));
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be represented (e.g. floats or
/// integers above `i64::MAX`).
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// Serialize any `T: Serialize` to a writer as ISC configuration text.
///
/// # Examples
///
/// ```rust
/// use serde_isc::{isc, to_writer};
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &isc!({ "port": 1812 })).unwrap();
/// assert_eq!(buffer, b"port 1812;\n");
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(mut writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string(value)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Deserialize an instance of type `T` from a parsed [`Value`] tree.
///
/// # Examples
///
/// ```rust
/// use serde_isc::{from_value, isc};
///
/// let ports: Vec<u16> = from_value(isc!([1812, 1813])).unwrap();
/// assert_eq!(ports, vec![1812, 1813]);
/// ```
///
/// # Errors
///
/// Returns an error if the tree's shape does not match `T`.
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(ValueDeserializer::new(value))
}

/// Deserialize an instance of type `T` from ISC configuration text.
///
/// # Examples
///
/// ```rust
/// use serde_isc::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Server { port: u16 }
///
/// let server: Server = from_str("port 1812;").unwrap();
/// assert_eq!(server, Server { port: 1812 });
/// ```
///
/// # Errors
///
/// Returns an error if the input is not valid ISC configuration text or
/// cannot be deserialized to type `T`.
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_slice(s.as_bytes())
}

/// Deserialize an instance of type `T` from an I/O stream of ISC text.
///
/// # Examples
///
/// ```rust
/// use serde_isc::from_reader;
/// use serde::Deserialize;
/// use std::io::Cursor;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Cgi { logdir: String }
///
/// let reader = Cursor::new(b"logdir \"/var/log\";".to_vec());
/// let cgi: Cgi = from_reader(reader).unwrap();
/// assert_eq!(cgi.logdir, "/var/log");
/// ```
///
/// # Errors
///
/// Returns an error if reading fails, the input is not valid ISC text, or
/// it cannot be deserialized to type `T`.
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut buffer = Vec::new();
    reader
        .read_to_end(&mut buffer)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_slice(&buffer)
}

/// Deserialize an instance of type `T` from bytes of ISC text.
///
/// Quoted strings need not be UTF-8; invalid sequences are replaced.
///
/// # Examples
///
/// ```rust
/// use serde_isc::from_slice;
///
/// let hosts: std::collections::BTreeMap<String, Vec<String>> =
///     from_slice(b"hosts { \"a\"; \"b\"; };").unwrap();
/// assert_eq!(hosts["hosts"], vec!["a", "b"]);
/// ```
///
/// # Errors
///
/// Returns an error if the input is not valid ISC text or cannot be
/// deserialized to type `T`.
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value(parse(v)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Server {
        host: String,
        port: u16,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Radius {
        server: Server,
        accounting: bool,
        clients: Vec<String>,
        secret: Option<String>,
    }

    fn sample() -> Radius {
        Radius {
            server: Server {
                host: "localhost".to_string(),
                port: 1812,
            },
            accounting: false,
            clients: vec!["nas1".to_string(), "nas2".to_string()],
            secret: None,
        }
    }

    #[test]
    fn test_serialize_deserialize_struct() {
        let radius = sample();
        let text = to_string(&radius).unwrap();
        let back: Radius = from_str(&text).unwrap();
        assert_eq!(radius, back);
    }

    #[test]
    fn test_rendered_text() {
        let text = to_string(&sample()).unwrap();
        assert_eq!(
            text,
            "server {\n\thost \"localhost\";\n\tport 1812;\n};\naccounting 0;\nclients {\n\t\"nas1\";\n\t\"nas2\";\n};\n"
        );
    }

    #[test]
    fn test_to_value_matches_parse() {
        let text = to_string(&sample()).unwrap();
        assert_eq!(to_value(&sample()).unwrap(), parse_str(&text).unwrap());
    }

    #[test]
    fn test_top_level_must_be_map() {
        assert!(matches!(
            to_string(&vec![1, 2]),
            Err(Error::UnsupportedType(_))
        ));
        assert!(matches!(to_string(&5), Err(Error::UnsupportedType(_))));
    }

    #[test]
    fn test_parse_errors_surface_through_from_str() {
        let err = from_str::<Radius>("server { port 1812;").unwrap_err();
        assert!(matches!(err, Error::UnexpectedEndOfInput { .. }));
    }

    #[test]
    fn test_from_reader() {
        let input = io::Cursor::new(b"host \"a\"; port 1;".to_vec());
        let server: Server = from_reader(input).unwrap();
        assert_eq!(
            server,
            Server {
                host: "a".to_string(),
                port: 1
            }
        );
    }

    #[test]
    fn test_from_slice_lossy_text() {
        let server: Server = from_slice(b"host \"r\xffs\"; port 7;").unwrap();
        assert_eq!(server.host, "r\u{fffd}s");
    }
}
