//! Lexical scanner for ISC configuration text.
//!
//! The [`Scanner`] splits a byte buffer into classified [`Token`]s, one per
//! call to [`Scanner::next_token`], and finishes with exactly one
//! [`TokenKind::EndOfInput`]. It is single-pass, never backtracks, looks at
//! most one byte ahead and keeps no state besides its cursor.
//!
//! ```rust
//! use serde_isc::scanner::{Scanner, TokenKind};
//!
//! let kinds: Vec<TokenKind> = Scanner::new(b"port 1812;")
//!     .map(|token| token.map(|t| t.kind))
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//!
//! assert_eq!(
//!     kinds,
//!     vec![
//!         TokenKind::Keyword,
//!         TokenKind::Whitespace,
//!         TokenKind::Integer,
//!         TokenKind::Character,
//!         TokenKind::EndOfInput,
//!     ]
//! );
//! ```

use crate::span::{Position, Span};
use crate::{Error, Result};
use std::fmt;
use tracing::trace;

/// The lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Maximal run of decimal digits: `1812`
    Integer,
    /// Bytes between a pair of double quotes: `"/var/log"`
    QuotedString,
    /// Maximal run of whitespace bytes
    Whitespace,
    /// A letter or underscore followed by letters, digits or underscores
    Keyword,
    /// Any other single byte, e.g. `{`, `}` or `;`
    Character,
    /// Emitted once, after the last byte has been consumed
    EndOfInput,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Integer => "integer",
            TokenKind::QuotedString => "quoted string",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Keyword => "keyword",
            TokenKind::Character => "character",
            TokenKind::EndOfInput => "end of input",
        };
        f.write_str(name)
    }
}

/// A scanned token: its kind, where it was found and the bytes it carries.
///
/// For [`TokenKind::QuotedString`] the `text` excludes the surrounding quotes
/// while the `span` includes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub span: Span,
    pub position: Position,
    pub text: &'a [u8],
}

/// A scanner over an immutable byte buffer.
#[derive(Clone)]
pub struct Scanner<'a> {
    input: &'a [u8],
    /// Position of the next unread byte.
    pos: Position,
    finished: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Scanner {
            input,
            pos: Position::start(),
            finished: false,
        }
    }

    /// The position of the next unread byte.
    #[inline]
    pub fn position(&self) -> Position {
        self.pos
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos.offset >= self.input.len()
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos.offset).copied()
    }

    #[inline]
    fn advance(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos = self.pos.advance(byte);
        Some(byte)
    }

    fn advance_while(&mut self, pred: impl Fn(u8) -> bool) {
        while let Some(byte) = self.peek() {
            if !pred(byte) {
                break;
            }
            self.advance();
        }
    }

    fn token(&self, kind: TokenKind, start: Position, text: Span) -> Token<'a> {
        let span = Span::new(start.offset, self.pos.offset);
        trace!(%kind, ?span, "token");
        Token {
            kind,
            span,
            position: start,
            text: text.slice(self.input),
        }
    }

    /// Scans the next token.
    ///
    /// Once the input is exhausted this keeps returning
    /// [`TokenKind::EndOfInput`]; the [`Iterator`] impl stops after the first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedEndOfInput`] when a quoted string is not
    /// closed before the input ends.
    pub fn next_token(&mut self) -> Result<Token<'a>> {
        let start = self.pos;
        let Some(byte) = self.advance() else {
            return Ok(self.token(TokenKind::EndOfInput, start, Span::empty(start.offset)));
        };

        let kind = match byte {
            b'0'..=b'9' => {
                self.advance_while(|b| b.is_ascii_digit());
                TokenKind::Integer
            }
            b'"' => {
                let content = self.pos.offset;
                self.advance_while(|b| b != b'"');
                if self.advance().is_none() {
                    return Err(Error::unexpected_end(
                        self.pos,
                        &format!("unterminated quoted string starting at {}", start),
                    ));
                }
                let text = Span::new(content, self.pos.offset - 1);
                return Ok(self.token(TokenKind::QuotedString, start, text));
            }
            b if is_space(b) => {
                self.advance_while(is_space);
                TokenKind::Whitespace
            }
            b if b.is_ascii_alphabetic() || b == b'_' => {
                self.advance_while(|b| b.is_ascii_alphanumeric() || b == b'_');
                TokenKind::Keyword
            }
            _ => TokenKind::Character,
        };

        Ok(self.token(kind, start, Span::new(start.offset, self.pos.offset)))
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        match &token {
            Ok(t) if t.kind != TokenKind::EndOfInput => {}
            _ => self.finished = true,
        }
        Some(token)
    }
}

/// The C `isspace` set.
#[inline]
fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(input: &[u8]) -> Vec<(TokenKind, &[u8])> {
        Scanner::new(input)
            .map(|t| t.map(|t| (t.kind, t.text)))
            .collect::<Result<_>>()
            .unwrap()
    }

    #[test]
    fn test_statement() {
        assert_eq!(
            scan(b"logdir \"/var/log\";"),
            vec![
                (TokenKind::Keyword, &b"logdir"[..]),
                (TokenKind::Whitespace, &b" "[..]),
                (TokenKind::QuotedString, &b"/var/log"[..]),
                (TokenKind::Character, &b";"[..]),
                (TokenKind::EndOfInput, &b""[..]),
            ]
        );
    }

    #[test]
    fn test_maximal_runs() {
        assert_eq!(
            scan(b"0755abc_1 \t\n"),
            vec![
                (TokenKind::Integer, &b"0755"[..]),
                (TokenKind::Keyword, &b"abc_1"[..]),
                (TokenKind::Whitespace, &b" \t\n"[..]),
                (TokenKind::EndOfInput, &b""[..]),
            ]
        );
    }

    #[test]
    fn test_last_byte_is_scanned() {
        let tokens = scan(b"}");
        assert_eq!(tokens[0], (TokenKind::Character, &b"}"[..]));
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_empty_quoted_string() {
        assert_eq!(scan(b"\"\"")[0], (TokenKind::QuotedString, &b""[..]));
    }

    #[test]
    fn test_quotes_keep_raw_bytes() {
        assert_eq!(
            scan(b"\"a\\b { ;\"")[0],
            (TokenKind::QuotedString, &b"a\\b { ;"[..])
        );
    }

    #[test]
    fn test_unterminated_string() {
        let err = Scanner::new(b"name \"abc")
            .collect::<Result<Vec<_>>>()
            .unwrap_err();
        match err {
            Error::UnexpectedEndOfInput { position, .. } => assert_eq!(position.offset, 9),
            other => panic!("expected end of input, got {other:?}"),
        }
    }

    #[test]
    fn test_other_bytes_are_characters() {
        let tokens = scan(b"=\xff");
        assert_eq!(tokens[0], (TokenKind::Character, &b"="[..]));
        assert_eq!(tokens[1], (TokenKind::Character, &b"\xff"[..]));
    }

    #[test]
    fn test_positions() {
        let mut scanner = Scanner::new(b"a\n  b");
        scanner.next_token().unwrap();
        scanner.next_token().unwrap();
        let b = scanner.next_token().unwrap();
        assert_eq!(b.position, Position::new(4, 2, 3));
        assert_eq!(b.span, Span::new(4, 5));
    }

    #[test]
    fn test_end_of_input_emitted_once() {
        let mut scanner = Scanner::new(b"");
        assert_eq!(scanner.next().unwrap().unwrap().kind, TokenKind::EndOfInput);
        assert!(scanner.next().is_none());
    }
}
