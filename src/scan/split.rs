//! Split functions - pluggable token boundary policies.
//!
//! A split function looks at the scanner's buffered bytes and decides one of:
//!
//! - [`Split::Token`] - a token was found; consume `consumed` bytes
//! - [`Split::Skip`] - drop some bytes (separators) without yielding
//! - [`Split::Need`] - not enough data; read more and call again
//!
//! `at_eof` is true once the stream has ended, and the function should then
//! emit whatever partial token remains. Returning `Need` at end-of-stream
//! finishes the scan.

use std::ops::Range;

use crate::error::SplitError;

/// Outcome of one call to a split function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Split {
    /// More input is required before a decision can be made.
    Need,

    /// Drop this many leading bytes and call again.
    Skip(usize),

    /// Yield `data[token]` and drop the first `consumed` bytes.
    Token {
        /// Bytes to remove from the front of the buffer.
        consumed: usize,
        /// Position of the token within the buffer.
        token: Range<usize>,
    },
}

/// A token boundary policy.
///
/// Implemented for any `FnMut(&[u8], bool) -> Result<Split, SplitError>`, so
/// closures work as split functions.
pub trait SplitFn {
    /// Inspects the buffered `data` and decides where the next token is.
    fn split(&mut self, data: &[u8], at_eof: bool) -> Result<Split, SplitError>;
}

impl<F> SplitFn for F
where
    F: FnMut(&[u8], bool) -> Result<Split, SplitError>,
{
    fn split(&mut self, data: &[u8], at_eof: bool) -> Result<Split, SplitError> {
        self(data, at_eof)
    }
}

/// Whitespace-separated words. Whitespace is Unicode `White_Space`; empty
/// words are never produced.
#[derive(Debug, Clone, Copy, Default)]
pub struct Words;

impl SplitFn for Words {
    fn split(&mut self, data: &[u8], at_eof: bool) -> Result<Split, SplitError> {
        let mut start = 0;
        while start < data.len() {
            let (c, width) = decode_char(&data[start..]);
            if !c.is_some_and(char::is_whitespace) {
                break;
            }
            start += width;
        }

        let mut i = start;
        while i < data.len() {
            let (c, width) = decode_char(&data[i..]);
            if c.is_some_and(char::is_whitespace) {
                return Ok(Split::Token {
                    consumed: i + width,
                    token: start..i,
                });
            }
            i += width;
        }

        if at_eof && data.len() > start {
            return Ok(Split::Token {
                consumed: data.len(),
                token: start..data.len(),
            });
        }

        if start > 0 {
            Ok(Split::Skip(start))
        } else {
            Ok(Split::Need)
        }
    }
}

/// Newline-terminated lines with the `\n` (and any `\r` before it) removed.
/// The last line is emitted at end-of-stream even without a terminator; an
/// empty trailing line is not.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lines;

impl SplitFn for Lines {
    fn split(&mut self, data: &[u8], at_eof: bool) -> Result<Split, SplitError> {
        if let Some(i) = data.iter().position(|&b| b == b'\n') {
            return Ok(Split::Token {
                consumed: i + 1,
                token: 0..trim_cr(data, i),
            });
        }

        if at_eof && !data.is_empty() {
            return Ok(Split::Token {
                consumed: data.len(),
                token: 0..trim_cr(data, data.len()),
            });
        }

        Ok(Split::Need)
    }
}

fn trim_cr(data: &[u8], end: usize) -> usize {
    if end > 0 && data[end - 1] == b'\r' {
        end - 1
    } else {
        end
    }
}

/// One UTF-8 encoded character per token. A byte that can't start or
/// complete a valid sequence comes through as a one-byte token.
#[derive(Debug, Clone, Copy, Default)]
pub struct Chars;

impl SplitFn for Chars {
    fn split(&mut self, data: &[u8], at_eof: bool) -> Result<Split, SplitError> {
        let Some(&first) = data.first() else {
            return Ok(Split::Need);
        };

        let width = utf8_width(first);
        if width > data.len() && !at_eof {
            // Could still complete once more bytes arrive
            return Ok(Split::Need);
        }

        let (_, width) = decode_char(data);
        Ok(Split::Token {
            consumed: width,
            token: 0..width,
        })
    }
}

/// Every byte is its own token.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleBytes;

impl SplitFn for SingleBytes {
    fn split(&mut self, data: &[u8], _at_eof: bool) -> Result<Split, SplitError> {
        if data.is_empty() {
            return Ok(Split::Need);
        }
        Ok(Split::Token {
            consumed: 1,
            token: 0..1,
        })
    }
}

/// Expected sequence length for a UTF-8 lead byte; 1 for invalid leads.
fn utf8_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 1,
    }
}

/// Decodes the character at the start of `data`.
///
/// Returns `(None, 1)` when the bytes aren't a complete, valid sequence.
fn decode_char(data: &[u8]) -> (Option<char>, usize) {
    let width = utf8_width(data[0]);
    if width > data.len() {
        return (None, 1);
    }
    match std::str::from_utf8(&data[..width]) {
        Ok(s) => (s.chars().next(), width),
        Err(_) => (None, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run<S: SplitFn>(mut split: S, input: &[u8]) -> Vec<Vec<u8>> {
        let mut data = input.to_vec();
        let mut out = Vec::new();
        loop {
            match split.split(&data, true).unwrap() {
                Split::Need => return out,
                Split::Skip(k) => {
                    data.drain(..k);
                }
                Split::Token { consumed, token } => {
                    out.push(data[token].to_vec());
                    data.drain(..consumed);
                }
            }
        }
    }

    #[test]
    fn test_words() {
        let words = run(Words, b"  hoge fuga\n\tfoo   bar ");
        assert_eq!(words, vec![b"hoge".to_vec(), b"fuga".to_vec(), b"foo".to_vec(), b"bar".to_vec()]);
    }

    #[test]
    fn test_words_unicode_space() {
        // U+3000 IDEOGRAPHIC SPACE
        let words = run(Words, "日本\u{3000}語".as_bytes());
        assert_eq!(words, vec!["日本".as_bytes().to_vec(), "語".as_bytes().to_vec()]);
    }

    #[test]
    fn test_words_need_more_without_eof() {
        assert_eq!(Words.split(b"partial", false).unwrap(), Split::Need);
        assert_eq!(Words.split(b"   ", false).unwrap(), Split::Skip(3));
        assert_eq!(Words.split(b"", true).unwrap(), Split::Need);
    }

    #[test]
    fn test_lines_strip_cr() {
        let lines = run(Lines, b"one\r\ntwo\n\nthree");
        assert_eq!(lines, vec![b"one".to_vec(), b"two".to_vec(), Vec::new(), b"three".to_vec()]);
    }

    #[test]
    fn test_lines_no_trailing_empty_line() {
        let lines = run(Lines, b"a\nb\n");
        assert_eq!(lines, vec![b"a".to_vec(), b"b".to_vec()]);
    }

    #[test]
    fn test_chars() {
        let chars = run(Chars, "aé語".as_bytes());
        assert_eq!(chars.len(), 3);
        assert_eq!(chars[2], "語".as_bytes());
    }

    #[test]
    fn test_chars_waits_for_split_sequence() {
        let bytes = "語".as_bytes();
        assert_eq!(Chars.split(&bytes[..2], false).unwrap(), Split::Need);
        // At end-of-stream the truncated sequence is flushed byte by byte
        let chars = run(Chars, &bytes[..2]);
        assert_eq!(chars, vec![vec![bytes[0]], vec![bytes[1]]]);
    }

    #[test]
    fn test_chars_invalid_byte() {
        let chars = run(Chars, &[0xFF, b'a']);
        assert_eq!(chars, vec![vec![0xFF], vec![b'a']]);
    }

    #[test]
    fn test_single_bytes() {
        assert_eq!(run(SingleBytes, b"abc").len(), 3);
    }

    #[test]
    fn test_closure_is_split_fn() {
        let mut comma = |data: &[u8], at_eof: bool| -> Result<Split, SplitError> {
            match data.iter().position(|&b| b == b',') {
                Some(i) => Ok(Split::Token { consumed: i + 1, token: 0..i }),
                None if at_eof && !data.is_empty() => Ok(Split::Token {
                    consumed: data.len(),
                    token: 0..data.len(),
                }),
                None => Ok(Split::Need),
            }
        };
        assert_eq!(
            comma.split(b"a,b", false).unwrap(),
            Split::Token { consumed: 2, token: 0..1 }
        );
    }
}
