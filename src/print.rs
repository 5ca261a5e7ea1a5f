//! [`Properties`] to `.properties` text.
//!
//! Values keep their line structure: a CR or LF inside a value is written as
//! `\r`/`\n` and the physical line is then broken with a backslash
//! continuation before the next character. Spaces that would start a
//! physical line are escaped so the parser's left-trim keeps them.

use std::fmt;
use std::str::FromStr;

use crate::hex;
use crate::parse::{BACKSLASH, BACKSPACE, CR, FORMFEED, NL, TAB};
use crate::path::Path;
use crate::properties::Properties;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineEnding {
    Cr,
    Nl,
    #[default]
    CrNl,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Cr => "\r",
            LineEnding::Nl => "\n",
            LineEnding::CrNl => "\r\n",
        }
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LineEnding::Cr => "cr",
            LineEnding::Nl => "nl",
            LineEnding::CrNl => "crnl",
        })
    }
}

impl FromStr for LineEnding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s.to_ascii_lowercase().as_str() {
            "cr" => Ok(LineEnding::Cr),
            "nl" | "lf" => Ok(LineEnding::Nl),
            "crnl" | "crlf" => Ok(LineEnding::CrNl),
            other => Err(format!("unknown line ending `{other}`; expected cr, nl or crnl")),
        }
    }
}

/// Canonical text for `properties`, one entry per line in path order.
pub fn to_text(properties: &Properties, line_ending: LineEnding) -> String {
    let mut out = String::new();
    for (path, value) in properties.entries() {
        encode_entry(path, value, &mut out);
        out.push_str(line_ending.as_str());
    }
    out
}

/// Print every entry on its own line through `printer`, with the same
/// escaping as [`to_text`].
pub fn print_tree<P: IndentingPrinter + ?Sized>(properties: &Properties, printer: &mut P) {
    let mut line = String::new();
    for (path, value) in properties.entries() {
        printer.line_start();
        line.clear();
        encode_entry(path, value, &mut line);
        printer.print(&line);
    }
    printer.line_start();
}

fn encode_entry(path: &Path, value: &str, out: &mut String) {
    encode_key(path, out);
    out.push('=');
    encode_value(value, out);
}

/// Keys never break lines, and escape everything the key syntax would eat.
pub(crate) fn encode_key(path: &Path, out: &mut String) {
    for c in path.value().chars() {
        match c {
            ' ' | '=' | ':' | '#' | '!' => {
                out.push(BACKSLASH);
                out.push(c);
            }
            CR => out.push_str("\\r"),
            NL => out.push_str("\\n"),
            other => push_escaped(out, other),
        }
    }
}

pub(crate) fn encode_value(value: &str, out: &mut String) {
    let mut pending: Option<LineEnding> = None;
    let mut line_start = true;

    for c in value.chars() {
        if c == NL && pending == Some(LineEnding::Cr) {
            out.push_str("\\n");
            pending = Some(LineEnding::CrNl);
            continue;
        }
        if let Some(line_ending) = pending.take() {
            out.push(BACKSLASH);
            out.push_str(line_ending.as_str());
            line_start = true;
        }
        match c {
            CR => {
                out.push_str("\\r");
                pending = Some(LineEnding::Cr);
            }
            NL => {
                out.push_str("\\n");
                pending = Some(LineEnding::Nl);
            }
            ' ' if line_start => out.push_str("\\ "),
            other => push_escaped(out, other),
        }
        line_start = false;
    }
    // a break still pending here is already carried by its \r or \n escape
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        BACKSPACE => out.push_str("\\b"),
        FORMFEED => out.push_str("\\f"),
        TAB => out.push_str("\\t"),
        BACKSLASH => out.push_str("\\\\"),
        c if c < ' ' || c >= '\u{80}' => {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                hex::push_unicode_escape(out, *unit);
            }
        }
        c => out.push(c),
    }
}

/// Line-oriented output with indentation.
pub trait IndentingPrinter {
    /// Print text; every line it starts is indented to the current depth.
    fn print(&mut self, text: &str);
    /// End the current line unless nothing has been printed on it.
    fn line_start(&mut self);
    fn indent(&mut self);
    fn outdent(&mut self);
}

/// [`IndentingPrinter`] collecting into a `String`.
#[derive(Debug)]
pub struct StringPrinter {
    out: String,
    indentation: String,
    line_ending: LineEnding,
    depth: usize,
    at_line_start: bool,
}

impl StringPrinter {
    pub fn new(indentation: impl Into<String>, line_ending: LineEnding) -> Self {
        Self {
            out: String::new(),
            indentation: indentation.into(),
            line_ending,
            depth: 0,
            at_line_start: true,
        }
    }

    pub fn finish(self) -> String {
        self.out
    }
}

impl IndentingPrinter for StringPrinter {
    fn print(&mut self, text: &str) {
        for c in text.chars() {
            let line_end = c == CR || c == NL;
            if self.at_line_start && !line_end {
                for _ in 0..self.depth {
                    self.out.push_str(&self.indentation);
                }
                self.at_line_start = false;
            }
            self.out.push(c);
            if line_end {
                self.at_line_start = true;
            }
        }
    }

    fn line_start(&mut self) {
        if !self.at_line_start {
            self.out.push_str(self.line_ending.as_str());
            self.at_line_start = true;
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn outdent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}
