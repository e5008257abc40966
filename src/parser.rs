//! State-machine parser for ISC configuration text.
//!
//! The [`Parser`] receives classified tokens one at a time (it implements
//! [`TokenHandler`]) and builds the configuration tree incrementally. Instead
//! of recursive descent it keeps two explicit stacks:
//!
//! - the **context stack**: the chain of sections currently open for
//!   writing, with the root map at its base;
//! - the **pending stack**: keywords still waiting for their value.
//!
//! Whether a section is a map or a list is only known once its first token
//! arrives: a keyword opens a map, a quoted string opens a list. A bare
//! integer cannot start a list, so `items { 3; };` is rejected while
//! `items { "a"; 3; };` is accepted.
//!
//! ```rust
//! use serde_isc::{isc, parse};
//!
//! let config = parse(b"foo { bar \"baz\"; };\nitems { \"a\"; \"b\"; 3; };").unwrap();
//! assert_eq!(config, isc!({ "foo": { "bar": "baz" }, "items": ["a", "b", 3] }));
//! ```

use crate::classify::{self, TokenHandler};
use crate::scanner::Scanner;
use crate::span::Position;
use crate::{Error, Kind, Result, Value};
use std::fmt;
use tracing::{debug, trace};

/// Parser states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// A section was opened but its type is not known yet
    InSection,
    /// Inside a map, awaiting a keyword or the end of the section
    InMap,
    /// Inside a map, got a keyword, awaiting its value or `{`
    InMapKeyword,
    /// Inside a map, awaiting the `;` ending an entry
    InMapNeedTerminator,
    /// Inside a list, awaiting a value or the end of the section
    InList,
    /// Inside a list, awaiting the `;` ending an element
    InListNeedTerminator,
    /// A section was closed with `}`, awaiting its `;`
    EndingSection,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// An open section: the value being filled and the key it will be stored
/// under in the enclosing map. The root has no key.
#[derive(Debug)]
struct Frame {
    key: Option<String>,
    node: Value,
}

/// The ISC configuration parser.
///
/// Most callers want [`parse`]; driving a `Parser` by hand is useful when
/// tokens come from somewhere other than [`Scanner`].
///
/// ```rust
/// use serde_isc::classify::TokenHandler;
/// use serde_isc::parser::{Parser, State};
/// use serde_isc::Position;
///
/// let mut parser = Parser::new();
/// let at = Position::start();
/// parser.handle_keyword("port".to_string(), at).unwrap();
/// parser.handle_integer(1812, at).unwrap();
/// assert_eq!(parser.state(), State::InMapNeedTerminator);
/// parser.handle_character(b';', at).unwrap();
/// parser.handle_end_of_input(at).unwrap();
///
/// let config = parser.finish().unwrap();
/// assert_eq!(config.get("port").and_then(|v| v.as_i64()), Some(1812));
/// ```
#[derive(Debug)]
pub struct Parser {
    state: State,
    pending: Vec<String>,
    contexts: Vec<Frame>,
    position: Position,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Creates a parser holding an empty root map, in state [`State::InMap`].
    pub fn new() -> Self {
        Parser {
            state: State::InMap,
            pending: Vec::new(),
            contexts: vec![Frame {
                key: None,
                node: Value::empty_of(Kind::Map),
            }],
            position: Position::start(),
        }
    }

    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    /// Number of open sections, counting the root.
    #[inline]
    pub fn depth(&self) -> usize {
        self.contexts.len()
    }

    /// Returns the parsed tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedEndOfInput`] unless the input ended at the
    /// top level with no entry or section left open.
    pub fn finish(mut self) -> Result<Value> {
        self.check_complete(self.position)?;
        match self.contexts.pop() {
            Some(root) => Ok(root.node),
            None => Err(Error::unexpected_end(self.position, "no root section")),
        }
    }

    fn transition(&mut self, next: State) {
        trace!(from = %self.state, to = %next, "transition");
        self.state = next;
    }

    fn reject(&self, found: &str) -> Error {
        Error::unexpected_token(self.position, found, self.state)
    }

    fn pop_pending(&mut self) -> Result<String> {
        self.pending
            .pop()
            .ok_or_else(|| Error::custom(format!("no pending keyword at {}", self.position)))
    }

    fn top(&mut self) -> Result<&mut Value> {
        match self.contexts.last_mut() {
            Some(frame) => Ok(&mut frame.node),
            None => Err(Error::custom("context stack is empty")),
        }
    }

    /// Stores `value` under the pending keyword in the current map.
    fn attach(&mut self, value: Value) -> Result<()> {
        let key = self.pop_pending()?;
        match self.top()? {
            Value::Map(map) => {
                map.insert(key, value);
                Ok(())
            }
            other => Err(Error::invalid_access(Kind::Map, other.kind())),
        }
    }

    /// Appends `value` to the current list.
    fn append(&mut self, value: Value) -> Result<()> {
        match self.top()? {
            Value::List(list) => {
                list.push(value);
                Ok(())
            }
            other => Err(Error::invalid_access(Kind::List, other.kind())),
        }
    }

    /// Opens a section of `kind` under the pending keyword.
    fn open_section(&mut self, kind: Kind) -> Result<()> {
        let key = self.pop_pending()?;
        debug!(%key, %kind, depth = self.contexts.len(), "opening section");
        self.contexts.push(Frame {
            key: Some(key),
            node: Value::empty_of(kind),
        });
        Ok(())
    }

    /// Closes the innermost section and stores it in its enclosing map.
    fn close_section(&mut self) -> Result<()> {
        if self.contexts.len() <= 1 {
            return Err(Error::root_close(self.position));
        }
        let Some(Frame {
            key: Some(key),
            node,
        }) = self.contexts.pop()
        else {
            return Err(Error::root_close(self.position));
        };
        debug!(%key, kind = %node.kind(), depth = self.contexts.len(), "closing section");
        match self.top()? {
            Value::Map(map) => {
                map.insert(key, node);
                Ok(())
            }
            other => Err(Error::invalid_access(Kind::Map, other.kind())),
        }
    }

    fn check_complete(&self, position: Position) -> Result<()> {
        if !self.pending.is_empty() || self.state != State::InMap || self.contexts.len() > 1 {
            let open = self
                .contexts
                .iter()
                .filter_map(|frame| frame.key.as_deref())
                .collect::<Vec<_>>()
                .join("/");
            let context = if open.is_empty() {
                format!("input ended in state {}", self.state)
            } else {
                format!("input ended in state {} inside `{}`", self.state, open)
            };
            return Err(Error::unexpected_end(position, &context));
        }
        Ok(())
    }
}

impl TokenHandler for Parser {
    fn handle_keyword(&mut self, keyword: String, position: Position) -> Result<()> {
        self.position = position;
        match self.state {
            State::InSection => {
                self.open_section(Kind::Map)?;
                self.pending.push(keyword);
                self.transition(State::InMapKeyword);
            }
            State::InMap => {
                self.pending.push(keyword);
                self.transition(State::InMapKeyword);
            }
            _ => return Err(self.reject(&format!("keyword `{}`", keyword))),
        }
        Ok(())
    }

    fn handle_string(&mut self, text: String, position: Position) -> Result<()> {
        self.position = position;
        match self.state {
            State::InMapKeyword => {
                self.attach(Value::Text(text))?;
                self.transition(State::InMapNeedTerminator);
            }
            State::InSection => {
                self.open_section(Kind::List)?;
                self.append(Value::Text(text))?;
                self.transition(State::InListNeedTerminator);
            }
            State::InList => {
                self.append(Value::Text(text))?;
                self.transition(State::InListNeedTerminator);
            }
            _ => return Err(self.reject(&format!("string \"{}\"", text))),
        }
        Ok(())
    }

    fn handle_integer(&mut self, value: i64, position: Position) -> Result<()> {
        self.position = position;
        match self.state {
            State::InMapKeyword => {
                self.attach(Value::Integer(value))?;
                self.transition(State::InMapNeedTerminator);
            }
            State::InList => {
                self.append(Value::Integer(value))?;
                self.transition(State::InListNeedTerminator);
            }
            // No transition from InSection: a list cannot start with an integer.
            _ => return Err(self.reject(&format!("integer `{}`", value))),
        }
        Ok(())
    }

    fn handle_character(&mut self, byte: u8, position: Position) -> Result<()> {
        self.position = position;
        let next = match (byte, self.state) {
            (b'{', State::InMapKeyword) => State::InSection,
            (b'}', State::InSection) => {
                self.open_section(Kind::Map)?;
                State::EndingSection
            }
            (b'}', State::InMap | State::InList) => State::EndingSection,
            (b';', State::InMapNeedTerminator) => State::InMap,
            (b';', State::InListNeedTerminator) => State::InList,
            (b';', State::EndingSection) => {
                self.close_section()?;
                State::InMap
            }
            _ => return Err(self.reject(&format!("character `{}`", byte.escape_ascii()))),
        };
        self.transition(next);
        Ok(())
    }

    fn handle_end_of_input(&mut self, position: Position) -> Result<()> {
        self.position = position;
        self.check_complete(position)
    }
}

/// Parses a configuration buffer into its root map.
///
/// # Errors
///
/// Returns the first lexical or syntax error: [`Error::UnexpectedEndOfInput`],
/// [`Error::IntegerOverflow`], [`Error::UnexpectedToken`] or
/// [`Error::UnexpectedRootClose`]. No partial tree is returned.
///
/// # Examples
///
/// ```rust
/// use serde_isc::{parse, Error};
///
/// let config = parse(b"CGI { logdir \"/var/log\"; };").unwrap();
/// assert!(config.is_map());
///
/// assert!(matches!(parse(b"items { 3; };"), Err(Error::UnexpectedToken { .. })));
/// assert!(matches!(parse(b"};"), Err(Error::UnexpectedRootClose { .. })));
/// ```
pub fn parse(input: &[u8]) -> Result<Value> {
    let mut scanner = Scanner::new(input);
    let mut parser = Parser::new();
    classify::drive(&mut scanner, &mut parser)?;
    let config = parser.finish()?;
    debug!(
        bytes = input.len(),
        entries = config.as_map().map_or(0, |m| m.len()),
        "parsed configuration"
    );
    Ok(config)
}

/// Parses configuration text. See [`parse`].
///
/// # Errors
///
/// See [`parse`].
pub fn parse_str(input: &str) -> Result<Value> {
    parse(input.as_bytes())
}
