//! Conversion of raw tokens into typed values.
//!
//! The scanner works on bytes; the parser works on integers, strings and
//! single structural characters. This module sits between the two: it decodes
//! each [`Token`] and hands the result to a [`TokenHandler`], dropping
//! whitespace along the way. It does no tokenizing of its own.

use crate::scanner::{Scanner, Token, TokenKind};
use crate::span::Position;
use crate::{Error, Result};

/// Receiver of classified tokens.
///
/// [`crate::parser::Parser`] is the implementation used by this crate; the
/// trait exists so other consumers (linters, pretty printers) can be driven by
/// the same scanner.
pub trait TokenHandler {
    /// An unquoted word such as `server` or `log_dir`.
    fn handle_keyword(&mut self, keyword: String, position: Position) -> Result<()>;

    /// The contents of a quoted string, without the quotes.
    fn handle_string(&mut self, text: String, position: Position) -> Result<()>;

    fn handle_integer(&mut self, value: i64, position: Position) -> Result<()>;

    /// Any single byte that is not part of another token.
    fn handle_character(&mut self, byte: u8, position: Position) -> Result<()>;

    /// Whitespace carries no meaning in the grammar.
    fn handle_whitespace(&mut self, _position: Position) -> Result<()> {
        Ok(())
    }

    fn handle_end_of_input(&mut self, position: Position) -> Result<()>;
}

/// Decodes one token and passes it to `handler`.
///
/// # Errors
///
/// Returns [`Error::IntegerOverflow`] for out-of-range integer literals, and
/// whatever the handler rejects.
pub fn dispatch<H>(token: Token<'_>, handler: &mut H) -> Result<()>
where
    H: TokenHandler + ?Sized,
{
    let position = token.position;
    match token.kind {
        TokenKind::Integer => handler.handle_integer(parse_integer(token.text, position)?, position),
        TokenKind::QuotedString => handler.handle_string(decode_text(token.text), position),
        TokenKind::Keyword => handler.handle_keyword(decode_text(token.text), position),
        TokenKind::Whitespace => handler.handle_whitespace(position),
        TokenKind::Character => match token.text {
            [byte] => handler.handle_character(*byte, position),
            other => Err(Error::custom(format!(
                "character token of {} bytes at {}",
                other.len(),
                position
            ))),
        },
        TokenKind::EndOfInput => handler.handle_end_of_input(position),
    }
}

/// Runs `scanner` to completion, feeding every token to `handler`.
///
/// Stops at the first error from either side.
pub fn drive<H>(scanner: &mut Scanner<'_>, handler: &mut H) -> Result<()>
where
    H: TokenHandler + ?Sized,
{
    loop {
        let token = scanner.next_token()?;
        let done = token.kind == TokenKind::EndOfInput;
        dispatch(token, handler)?;
        if done {
            return Ok(());
        }
    }
}

/// Copies token bytes into a `String` without any escape processing.
///
/// Invalid UTF-8 sequences are replaced with U+FFFD.
fn decode_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Parses an integer literal with C `strtol(s, NULL, 0)` semantics.
///
/// - an optional `+` or `-` sign,
/// - `0x`/`0X` followed by a hex digit selects base 16,
/// - any other leading `0` selects base 8,
/// - otherwise base 10.
///
/// Like `strtol`, parsing stops at the first byte that is not a digit of the
/// selected base, so `09` yields `0`.
///
/// # Errors
///
/// Returns [`Error::IntegerOverflow`] if the value does not fit in an `i64`.
///
/// # Examples
///
/// ```rust
/// use serde_isc::classify::parse_integer;
/// use serde_isc::Position;
///
/// let at = Position::start();
/// assert_eq!(parse_integer(b"1812", at).unwrap(), 1812);
/// assert_eq!(parse_integer(b"0755", at).unwrap(), 0o755);
/// assert_eq!(parse_integer(b"0x1F", at).unwrap(), 31);
/// assert!(parse_integer(b"99999999999999999999", at).is_err());
/// ```
pub fn parse_integer(literal: &[u8], position: Position) -> Result<i64> {
    let (negative, unsigned) = match literal.split_first() {
        Some((b'-', rest)) => (true, rest),
        Some((b'+', rest)) => (false, rest),
        _ => (false, literal),
    };

    let (radix, digits) = match unsigned {
        [b'0', b'x' | b'X', rest @ ..] if rest.first().is_some_and(u8::is_ascii_hexdigit) => {
            (16, rest)
        }
        [b'0', rest @ ..] => (8, rest),
        _ => (10, unsigned),
    };

    let overflow = || Error::integer_overflow(position, &String::from_utf8_lossy(literal));
    let mut value: i64 = 0;
    for &byte in digits {
        let Some(digit) = char::from(byte).to_digit(radix) else {
            break;
        };
        let digit = i64::from(digit);
        // Accumulating negatives directly keeps i64::MIN reachable.
        value = value
            .checked_mul(i64::from(radix))
            .and_then(|v| {
                if negative {
                    v.checked_sub(digit)
                } else {
                    v.checked_add(digit)
                }
            })
            .ok_or_else(overflow)?;
    }

    Ok(value)
}
