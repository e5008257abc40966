//! Error types for ISC configuration parsing, merging and access.
//!
//! This module provides error reporting with enough context to produce a
//! precise diagnostic for every failure the crate can raise.
//!
//! ## Error Categories
//!
//! - **Lexical/Parse Errors**: unterminated input, integer overflow, tokens that
//!   are invalid in the current parser state, stray root closes. All carry a
//!   [`Position`] (byte offset, line and column).
//! - **Merge Errors**: type mismatches between corresponding entries, carrying the
//!   `/`-joined key path at which the mismatch occurred.
//! - **Access Errors**: reading a value through the wrong type tag.
//! - **I/O and serde Errors**: reader failures, types that have no ISC
//!   representation, and messages raised by serde.
//!
//! ## Examples
//!
//! ```rust
//! use serde_isc::{parse, Error};
//!
//! let err = parse(b"foo { bar \"baz\";").unwrap_err();
//! assert!(matches!(err, Error::UnexpectedEndOfInput { .. }));
//! assert!(err.to_string().contains("line 1"));
//! ```

use crate::span::Position;
use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised while reading, merging or accessing
/// ISC configuration data.
///
/// Every error is terminal for the operation in progress; nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The input ended in the middle of a token or a section.
    #[error("Unexpected end of input at {position}: {context}")]
    UnexpectedEndOfInput { position: Position, context: String },

    /// A numeric literal does not fit in a signed 64-bit integer.
    #[error("Integer overflow at {position}: `{literal}` does not fit in 64 bits")]
    IntegerOverflow { position: Position, literal: String },

    /// A token is not valid in the current parser state.
    #[error("Unexpected {found} at {position} (parser state: {state})")]
    UnexpectedToken {
        position: Position,
        found: String,
        state: String,
    },

    /// A `};` tried to close the implicit root section.
    #[error("Cannot close the root section at {position}")]
    UnexpectedRootClose { position: Position },

    /// Two corresponding entries have different types during a type-checked merge.
    #[error("Type mismatch at `{path}`: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    /// A value was read through the wrong type tag.
    #[error("Invalid access: {expected}-style access on {found} data")]
    InvalidAccess { expected: String, found: String },

    /// A Rust type with no ISC counterpart was serialized, e.g. a float.
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// IO error while reading input
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates an unexpected end-of-input error.
    pub fn unexpected_end(position: Position, context: &str) -> Self {
        Error::UnexpectedEndOfInput {
            position,
            context: context.to_string(),
        }
    }

    /// Creates an integer overflow error for the literal found at `position`.
    pub fn integer_overflow(position: Position, literal: &str) -> Self {
        Error::IntegerOverflow {
            position,
            literal: literal.to_string(),
        }
    }

    /// Creates an unexpected token error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_isc::{Error, Position};
    ///
    /// let err = Error::unexpected_token(Position::new(4, 1, 5), "integer `3`", "InSection");
    /// assert!(err.to_string().contains("integer `3`"));
    /// ```
    pub fn unexpected_token(position: Position, found: &str, state: impl fmt::Display) -> Self {
        Error::UnexpectedToken {
            position,
            found: found.to_string(),
            state: state.to_string(),
        }
    }

    /// Creates an error for an attempt to close the root section.
    pub fn root_close(position: Position) -> Self {
        Error::UnexpectedRootClose { position }
    }

    /// Creates a type mismatch error with an empty key path.
    ///
    /// The path is filled in by [`Error::with_context`] as the error travels
    /// back out through the maps that were being merged.
    pub fn type_mismatch(expected: impl fmt::Display, found: impl fmt::Display) -> Self {
        Error::TypeMismatch {
            path: String::new(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates an invalid access error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_isc::Error;
    ///
    /// let err = Error::invalid_access("integer", "text");
    /// assert_eq!(err.to_string(), "Invalid access: integer-style access on text data");
    /// ```
    pub fn invalid_access(expected: impl fmt::Display, found: impl fmt::Display) -> Self {
        Error::InvalidAccess {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates an unsupported type error for values that cannot be represented.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reader failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Prepends a parent key to the path of a [`Error::TypeMismatch`].
    ///
    /// Other variants are returned unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_isc::Error;
    ///
    /// let err = Error::type_mismatch("integer", "text")
    ///     .with_context("port")
    ///     .with_context("server")
    ///     .with_context("RADIUS");
    /// assert_eq!(err.path(), Some("RADIUS/server/port"));
    /// ```
    #[must_use]
    pub fn with_context(self, key: &str) -> Self {
        match self {
            Error::TypeMismatch {
                path,
                expected,
                found,
            } => Error::TypeMismatch {
                path: if path.is_empty() {
                    key.to_string()
                } else {
                    format!("{}/{}", key, path)
                },
                expected,
                found,
            },
            other => other,
        }
    }

    /// Returns the input position for lexical and parse errors.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        match self {
            Error::UnexpectedEndOfInput { position, .. }
            | Error::IntegerOverflow { position, .. }
            | Error::UnexpectedToken { position, .. }
            | Error::UnexpectedRootClose { position } => Some(*position),
            _ => None,
        }
    }

    /// Returns the key path of a type mismatch.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Error::TypeMismatch { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
