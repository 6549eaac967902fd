//! Markup transcoder - inline tags and entities to sign control bytes.
//!
//! Config text may carry a small HTML-like markup:
//!
//! - Formatting tags such as `<br>`, `<blink>`, `</blink>`, `<wide>`, `<shadow>`
//! - Character entities such as `&heart;`, `&copy;`, `&uparrow;`
//! - `<colorRGB>` / `<scolorRGB>` with `R,G,B` in `0..=3`
//! - `<speedN>` with `N` in `1..=6`
//!
//! Newlines and tabs become spaces, other control bytes are dropped, and
//! anything unrecognized passes through unchanged.
//!
//! # Example
//!
//! ```
//! use signwire::markup::transcode;
//!
//! let result = transcode(b"<color123>Hi", 64);
//! assert_eq!(&result.output[..], b"\x1cZ4080C0Hi");
//! assert_eq!(result.consumed, 12);
//! assert!(!result.truncated);
//! ```

mod table;

use bytes::Bytes;

use table::{
    color_level, speed_code, COLOR_CONTROL, COLOR_FOREGROUND, COLOR_SHADOW, SUBSTITUTIONS,
};

/// Result of transcoding one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcoded {
    /// Sign-encoded bytes, at most `max_output` long.
    pub output: Bytes,
    /// How many input bytes were scanned. Less than the input length only
    /// when `truncated` is set.
    pub consumed: usize,
    /// Output filled up before the input ran out.
    pub truncated: bool,
    /// Number of `<color>`/`<scolor>`/`<speed>` tags with bad digits that
    /// were passed through literally.
    pub invalid_tags: usize,
}

/// Replacement bytes for one recognized token.
enum Replacement {
    Fixed(&'static [u8]),
    Color([u8; 8]),
    Speed(u8),
}

impl Replacement {
    fn as_bytes(&self) -> &[u8] {
        match self {
            Replacement::Fixed(bytes) => bytes,
            Replacement::Color(bytes) => bytes,
            Replacement::Speed(code) => std::slice::from_ref(code),
        }
    }
}

/// Outcome of looking for a token at a `<` or `&`.
enum Lookup {
    Found { replacement: Replacement, len: usize },
    Invalid,
    NotFound,
}

/// Transcode `input` into at most `max_output` bytes.
///
/// Scanning stops early, with `truncated` set, when the output is full or
/// when the next substitution would not fit. `consumed` then tells the caller
/// where to resume; it can differ from the output length because tags expand
/// or shrink.
pub fn transcode(input: &[u8], max_output: usize) -> Transcoded {
    let mut out = Vec::with_capacity(max_output.min(input.len()));
    let mut pos = 0;
    let mut truncated = false;
    let mut invalid_tags = 0;

    while pos < input.len() {
        if out.len() == max_output {
            truncated = true;
            break;
        }

        match input[pos] {
            b'\n' | b'\t' => {
                out.push(b' ');
                pos += 1;
            }
            c if c < 0x20 => pos += 1,
            b'<' | b'&' => match lookup(&input[pos..]) {
                Lookup::Found { replacement, len } => {
                    let bytes = replacement.as_bytes();
                    if out.len() + bytes.len() > max_output {
                        truncated = true;
                        break;
                    }
                    out.extend_from_slice(bytes);
                    pos += len;
                }
                other => {
                    if matches!(other, Lookup::Invalid) {
                        invalid_tags += 1;
                    }
                    out.push(input[pos]);
                    pos += 1;
                }
            },
            c => {
                out.push(c);
                pos += 1;
            }
        }
    }

    Transcoded {
        output: Bytes::from(out),
        consumed: pos,
        truncated,
        invalid_tags,
    }
}

/// Find the token starting at `input[0]`.
fn lookup(input: &[u8]) -> Lookup {
    if let Some((token, bytes)) = SUBSTITUTIONS
        .iter()
        .copied()
        .filter(|(token, _)| input.starts_with(token))
        .max_by_key(|(token, _)| token.len())
    {
        return Lookup::Found {
            replacement: Replacement::Fixed(bytes),
            len: token.len(),
        };
    }

    if let Some(digits) = parametric(input, b"<color", 3) {
        return color(digits, COLOR_FOREGROUND, 10);
    }
    if let Some(digits) = parametric(input, b"<scolor", 3) {
        return color(digits, COLOR_SHADOW, 11);
    }
    if let Some(digits) = parametric(input, b"<speed", 1) {
        return match speed_code(digits[0]) {
            Some(code) => Lookup::Found {
                replacement: Replacement::Speed(code),
                len: 8,
            },
            None => {
                tracing::warn!(
                    "Found invalid speed \"{}\" in <speedN> (N=1-6)",
                    char::from(digits[0])
                );
                Lookup::Invalid
            }
        };
    }

    Lookup::NotFound
}

/// Match `prefix` followed by exactly `n` non-`>` bytes and a closing `>`.
fn parametric<'a>(input: &'a [u8], prefix: &[u8], n: usize) -> Option<&'a [u8]> {
    let rest = input.strip_prefix(prefix)?;
    let close = rest.iter().position(|&b| b == b'>')?;
    (close == n).then(|| &rest[..n])
}

fn color(digits: &[u8], selector: u8, len: usize) -> Lookup {
    let mut bytes = [0u8; 8];
    bytes[0] = COLOR_CONTROL;
    bytes[1] = selector;
    for (i, &digit) in digits.iter().enumerate() {
        match color_level(digit) {
            Some(level) => bytes[2 + 2 * i..4 + 2 * i].copy_from_slice(&level),
            None => {
                tracing::warn!(
                    "Found invalid color \"{}\" in <scolorRGB>/<colorRGB> (R,G,B=0-3)",
                    char::from(digit)
                );
                return Lookup::Invalid;
            }
        }
    }
    Lookup::Found {
        replacement: Replacement::Color(bytes),
        len,
    }
}
