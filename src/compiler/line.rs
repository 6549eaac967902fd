//! Config line grammar.
//!
//! ```text
//! txt <mode> [<text>]
//! cmd <mode> [<size>] <command>
//! # comment
//! // comment
//! ```
//!
//! Fields are separated by spaces. The text or command is everything after the
//! single space that follows the previous field, so extra leading spaces are
//! part of the content. Lines are raw bytes; text passes through to the
//! transcoder untouched, so Latin-1 content works.

use std::borrow::Cow;

use crate::error::{Result, SignError};
use crate::protocol::modes::SPECIAL_MODE_PREFIX;
use crate::protocol::{MAX_STRING_GROUP_SIZE, NO_SPECIAL};

/// A normalized display mode: first char lower-case, special upper-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Mode {
    pub mode: u8,
    pub special: u8,
}

impl Mode {
    pub fn special(&self) -> Option<u8> {
        (self.special != NO_SPECIAL).then_some(self.special)
    }
}

/// One parsed config line.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Statement<'a> {
    /// Blank or comment line.
    Skip,
    Text {
        mode: Mode,
        text: Option<&'a [u8]>,
    },
    Command {
        mode: Mode,
        size: Option<usize>,
        command: Cow<'a, str>,
    },
}

/// Parse one line (already stripped of `\r`/`\n`).
pub(crate) fn parse_line(line: &[u8], line_no: usize) -> Result<Statement<'_>> {
    let (keyword, rest) = next_field(line);
    let Some(keyword) = keyword else {
        return Ok(Statement::Skip);
    };

    match keyword {
        b"txt" => {
            let (mode, text) = next_field(rest);
            let text = non_empty(text);
            let mode = check_mode(mode, text.is_some(), line_no)?;
            Ok(Statement::Text { mode, text })
        }
        b"cmd" => {
            let (mode, rest) = next_field(rest);
            let rest = non_empty(rest);
            let mode = check_mode(mode, rest.is_some(), line_no)?;
            let Some(rest) = rest else {
                return Err(SignError::syntax(line_no, "Command field isn't specified."));
            };
            let (size, command) = split_size(rest, line_no)?;
            Ok(Statement::Command {
                mode,
                size,
                command: String::from_utf8_lossy(command),
            })
        }
        k if k.starts_with(b"//") || k.starts_with(b"#") => Ok(Statement::Skip),
        _ => Err(SignError::syntax(line_no, "Unknown command.")),
    }
}

/// Split off the next space-delimited field, skipping leading spaces.
///
/// The remainder starts right after the single delimiter.
fn next_field(s: &[u8]) -> (Option<&[u8]>, &[u8]) {
    let start = s.iter().position(|&b| b != b' ').unwrap_or(s.len());
    let s = &s[start..];
    if s.is_empty() {
        return (None, s);
    }
    match s.iter().position(|&b| b == b' ') {
        Some(i) => (Some(&s[..i]), &s[i + 1..]),
        None => (Some(s), &s[s.len()..]),
    }
}

fn non_empty(s: &[u8]) -> Option<&[u8]> {
    (!s.is_empty()).then_some(s)
}

fn check_mode(mode: Option<&[u8]>, has_content: bool, line_no: usize) -> Result<Mode> {
    match *mode.unwrap_or_default() {
        [] => Err(SignError::syntax(line_no, "Mode field isn't specified.")),
        [_] if !has_content => Err(SignError::syntax(
            line_no,
            "2-char special mode required to omit content field.",
        )),
        [m] if m.to_ascii_lowercase() == SPECIAL_MODE_PREFIX => Err(SignError::syntax(
            line_no,
            "Mode 'n' must be accompanied with 2nd char specifying a special mode.",
        )),
        [m] => Ok(Mode {
            mode: m.to_ascii_lowercase(),
            special: NO_SPECIAL,
        }),
        [m, s] if m.to_ascii_lowercase() == SPECIAL_MODE_PREFIX => Ok(Mode {
            mode: SPECIAL_MODE_PREFIX,
            special: s.to_ascii_uppercase(),
        }),
        [_, _] => Err(SignError::syntax(
            line_no,
            "Mode may only be 2 chars long if the first char is \"n\".",
        )),
        _ => Err(SignError::syntax(
            line_no,
            "Mode may only be 1 to 2 chars long.",
        )),
    }
}

/// Peel an optional allocation size off a `cmd` remainder.
///
/// The size variant is selected when the first field is an integer, however
/// large.
fn split_size(rest: &[u8], line_no: usize) -> Result<(Option<usize>, &[u8])> {
    let (first, command) = next_field(rest);
    let Some(first) = first.filter(|f| is_integer(f)) else {
        return Ok((None, rest));
    };

    let size = std::str::from_utf8(first)
        .ok()
        .and_then(|f| f.parse::<i64>().ok())
        .and_then(|s| usize::try_from(s).ok())
        .filter(|&s| s <= MAX_STRING_GROUP_SIZE)
        .ok_or_else(|| {
            SignError::syntax(
                line_no,
                format!("Size must be between 0 and {}.", MAX_STRING_GROUP_SIZE),
            )
        })?;

    match non_empty(command) {
        Some(command) => Ok((Some(size), command)),
        None => Err(SignError::syntax(line_no, "Command field isn't specified.")),
    }
}

/// An optional sign followed by at least one ASCII digit.
fn is_integer(field: &[u8]) -> bool {
    let digits = match field {
        [b'+' | b'-', rest @ ..] => rest,
        _ => field,
    };
    !digits.is_empty() && digits.iter().all(u8::is_ascii_digit)
}
