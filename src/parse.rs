//! `.properties` text to [`Properties`].
//!
//! Two state machines run per input character. The decoding layer resolves
//! backslash escapes, `\uHHHH` sequences and line continuations, tagging each
//! resulting character as literal or escaped. The token layer assembles
//! comments, keys and values from those characters. Only literal characters
//! act as syntax, so an escaped `=` or line break is ordinary content.

use std::collections::BTreeMap;

use crate::error::{Error, ErrorKind};
use crate::hex;
use crate::path::Path;
use crate::properties::Properties;

pub(crate) const BACKSLASH: char = '\\';
pub(crate) const BACKSPACE: char = '\u{8}';
pub(crate) const FORMFEED: char = '\u{c}';
pub(crate) const CR: char = '\r';
pub(crate) const NL: char = '\n';
pub(crate) const TAB: char = '\t';

/// Parse `text`, failing on the first error. No partial result is returned.
pub fn parse(text: &str) -> crate::Result<Properties> {
    let mut decoder = Decoder::default();
    let mut assembler = Assembler::default();
    let mut length = 0;

    for (position, c) in text.chars().enumerate() {
        let decoded = decoder.next(c, position)?;
        assembler.accept(decoded, position)?;
        length = position + 1;
    }
    decoder.finish(length)?;
    let properties = assembler.finish()?;

    log::debug!(
        "parsed {} properties from {} characters",
        properties.len(),
        length
    );
    Ok(properties)
}

/// Whitespace skipped between tokens and trimmed around keys and values.
pub(crate) fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | TAB | CR | NL | FORMFEED | BACKSPACE | '\0')
}

fn is_line_end(c: char) -> bool {
    c == CR || c == NL
}

fn is_comment(c: char) -> bool {
    c == '#' || c == '!'
}

fn is_assignment(c: char) -> bool {
    c == '=' || c == ':'
}

/// What one input character decodes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Decoded {
    /// Part of an escape that is not complete yet.
    Pending,
    /// Read verbatim from the input.
    Literal(char),
    /// Produced by a backslash escape.
    Escaped(char),
    /// Backslash followed by a line break.
    Continuation,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum CharState {
    #[default]
    Plain,
    Escaping,
    /// After backslash CR; a following NL belongs to the same break.
    EscapingAfterCr,
    /// After backslash NL; a following CR belongs to the same break.
    EscapingAfterNl,
    /// Inside `\uHHHH`, `digit` hex digits read so far.
    Unicode { digit: u8, unit: u16 },
}

#[derive(Debug, Default)]
struct Decoder {
    state: CharState,
    high_surrogate: Option<u16>,
}

impl Decoder {
    fn next(&mut self, c: char, position: usize) -> crate::Result<Decoded> {
        if self.high_surrogate.is_some() && !self.continues_unicode_escape(c) {
            return Err(malformed_escape("unpaired surrogate in unicode escape", position));
        }

        match self.state {
            CharState::Plain => Ok(self.plain(c)),
            CharState::Escaping => {
                self.state = CharState::Plain;
                let decoded = match c {
                    'b' => Decoded::Escaped(BACKSPACE),
                    'f' => Decoded::Escaped(FORMFEED),
                    'n' => Decoded::Escaped(NL),
                    'r' => Decoded::Escaped(CR),
                    't' => Decoded::Escaped(TAB),
                    'u' => {
                        self.state = CharState::Unicode { digit: 0, unit: 0 };
                        Decoded::Pending
                    }
                    CR => {
                        self.state = CharState::EscapingAfterCr;
                        Decoded::Continuation
                    }
                    NL => {
                        self.state = CharState::EscapingAfterNl;
                        Decoded::Continuation
                    }
                    other => Decoded::Escaped(other),
                };
                Ok(decoded)
            }
            CharState::EscapingAfterCr => {
                self.state = CharState::Plain;
                Ok(if c == NL { Decoded::Pending } else { self.plain(c) })
            }
            CharState::EscapingAfterNl => {
                self.state = CharState::Plain;
                Ok(if c == CR { Decoded::Pending } else { self.plain(c) })
            }
            CharState::Unicode { digit, unit } => {
                let value = hex::digit_value(c).ok_or_else(|| {
                    malformed_escape(format!("invalid hex digit {c:?} in unicode escape"), position)
                })?;
                let unit = (unit << 4) | value;
                if digit < 3 {
                    self.state = CharState::Unicode {
                        digit: digit + 1,
                        unit,
                    };
                    return Ok(Decoded::Pending);
                }
                self.state = CharState::Plain;
                self.complete_unit(unit, position)
            }
        }
    }

    fn plain(&mut self, c: char) -> Decoded {
        if c == BACKSLASH {
            self.state = CharState::Escaping;
            Decoded::Pending
        } else {
            Decoded::Literal(c)
        }
    }

    /// A pending high surrogate may only be followed by another `\u` escape.
    fn continues_unicode_escape(&self, c: char) -> bool {
        match self.state {
            CharState::Plain => c == BACKSLASH,
            CharState::Escaping => c == 'u',
            CharState::Unicode { .. } => true,
            CharState::EscapingAfterCr | CharState::EscapingAfterNl => false,
        }
    }

    fn complete_unit(&mut self, unit: u16, position: usize) -> crate::Result<Decoded> {
        let is_high = (0xd800..0xdc00).contains(&unit);
        let is_low = (0xdc00..0xe000).contains(&unit);

        let code_point = match self.high_surrogate.take() {
            Some(high) if is_low => {
                0x10000 + ((u32::from(high) - 0xd800) << 10) + (u32::from(unit) - 0xdc00)
            }
            Some(_) => {
                return Err(malformed_escape("unpaired surrogate in unicode escape", position));
            }
            None if is_high => {
                self.high_surrogate = Some(unit);
                return Ok(Decoded::Pending);
            }
            None if is_low => {
                return Err(malformed_escape("unpaired surrogate in unicode escape", position));
            }
            None => u32::from(unit),
        };
        char::from_u32(code_point)
            .map(Decoded::Escaped)
            .ok_or_else(|| malformed_escape("invalid unicode escape", position))
    }

    /// A trailing lone backslash is a continuation to nothing; an unfinished
    /// `\u` escape is an error.
    fn finish(&self, length: usize) -> crate::Result<()> {
        if matches!(self.state, CharState::Unicode { .. }) || self.high_surrogate.is_some() {
            return Err(malformed_escape("unfinished unicode escape", length));
        }
        Ok(())
    }
}

fn malformed_escape(message: impl Into<String>, position: usize) -> Error {
    Error::new(ErrorKind::MalformedEscape)
        .with_message(message)
        .with_position(position)
}

#[derive(Debug, Default)]
enum TokenState {
    #[default]
    SeekingToken,
    InComment,
    InKey,
    InValue(Path),
}

#[derive(Debug, Default)]
struct Assembler {
    state: TokenState,
    token: String,
    /// Byte length of the key token without trailing literal whitespace.
    key_len: usize,
    /// Skip literal whitespace until the next content character.
    skip_whitespace: bool,
    entries: BTreeMap<Path, String>,
}

impl Assembler {
    fn accept(&mut self, decoded: Decoded, position: usize) -> crate::Result<()> {
        match decoded {
            Decoded::Pending => Ok(()),
            Decoded::Continuation => {
                if matches!(self.state, TokenState::InKey | TokenState::InValue(_)) {
                    self.skip_whitespace = true;
                }
                Ok(())
            }
            Decoded::Literal(c) => self.literal(c, position),
            Decoded::Escaped(c) => {
                match self.state {
                    TokenState::SeekingToken => self.start_key(c, false),
                    TokenState::InComment => {}
                    TokenState::InKey => self.push_key(c, false),
                    TokenState::InValue(_) => self.push_value(c, false),
                }
                Ok(())
            }
        }
    }

    fn literal(&mut self, c: char, position: usize) -> crate::Result<()> {
        match self.state {
            TokenState::SeekingToken => {
                if is_whitespace(c) {
                    // skip
                } else if is_comment(c) {
                    self.state = TokenState::InComment;
                } else if is_assignment(c) {
                    self.token.clear();
                    self.key_len = 0;
                    self.end_key(position)?;
                } else {
                    self.start_key(c, true);
                }
            }
            TokenState::InComment => {
                if is_line_end(c) {
                    self.state = TokenState::SeekingToken;
                }
            }
            TokenState::InKey => {
                if is_assignment(c) {
                    self.end_key(position)?;
                } else if is_line_end(c) {
                    return Err(Error::new(ErrorKind::MissingAssignment)
                        .with_message(format!(
                            "missing assignment following key \"{}\"",
                            self.token.trim_end_matches(is_whitespace)
                        ))
                        .with_position(position));
                } else {
                    self.push_key(c, true);
                }
            }
            TokenState::InValue(_) => {
                if is_line_end(c) {
                    self.commit();
                } else {
                    self.push_value(c, true);
                }
            }
        }
        Ok(())
    }

    fn start_key(&mut self, c: char, literal: bool) {
        self.token.clear();
        self.key_len = 0;
        self.skip_whitespace = false;
        self.state = TokenState::InKey;
        self.push_key(c, literal);
    }

    fn push_key(&mut self, c: char, literal: bool) {
        let blank = literal && is_whitespace(c);
        if blank && self.skip_whitespace {
            return;
        }
        self.skip_whitespace = false;
        self.token.push(c);
        if !blank {
            self.key_len = self.token.len();
        }
    }

    fn end_key(&mut self, position: usize) -> crate::Result<()> {
        let key = Path::parse(&self.token[..self.key_len]).map_err(|err| err.with_position(position))?;
        self.token.clear();
        self.skip_whitespace = true;
        self.state = TokenState::InValue(key);
        Ok(())
    }

    fn push_value(&mut self, c: char, literal: bool) {
        if self.skip_whitespace && literal && is_whitespace(c) {
            return;
        }
        self.skip_whitespace = false;
        self.token.push(c);
    }

    /// Store the pending pair; the terminating line break is not kept.
    fn commit(&mut self) {
        if let TokenState::InValue(key) = std::mem::take(&mut self.state) {
            let value = std::mem::take(&mut self.token);
            log::trace!("property {key} = {value:?}");
            self.entries.insert(key, value);
        }
        self.skip_whitespace = false;
    }

    fn finish(mut self) -> crate::Result<Properties> {
        match self.state {
            TokenState::SeekingToken | TokenState::InComment => {}
            TokenState::InKey => {
                return Err(Error::new(ErrorKind::MissingAssignment)
                    .with_message("Missing assignment following key"));
            }
            TokenState::InValue(_) => self.commit(),
        }
        Ok(self.entries.into_iter().collect())
    }
}
