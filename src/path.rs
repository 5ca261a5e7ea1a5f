//! Dotted hierarchical keys such as `server.http.port`.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind};
use crate::name::Name;

/// Separator between the names of a path.
pub const SEPARATOR: char = '.';

/// An immutable, non-empty sequence of [`Name`]s joined by `.`.
///
/// Equality and ordering are those of the full dotted text, so
/// `Path::parse(p.value())` always yields a path equal to `p`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Path {
    value: String,
}

impl Path {
    /// Parse dotted text, rejecting empty components (`a..b`, `.a`, `a.`, ``).
    pub fn parse(text: &str) -> crate::Result<Self> {
        if text.split(SEPARATOR).any(str::is_empty) {
            return Err(Error::new(ErrorKind::InvalidPath)
                .with_message(format!("path \"{text}\" contains an empty component")));
        }
        Ok(Path {
            value: text.to_string(),
        })
    }

    /// The full dotted text.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The last name.
    pub fn name(&self) -> Name {
        let leaf = match self.value.rfind(SEPARATOR) {
            Some(pos) => &self.value[pos + 1..],
            None => &self.value,
        };
        Name::from_segment(leaf)
    }

    /// Everything but the last name; `None` for a single-segment path.
    pub fn parent(&self) -> Option<Path> {
        self.value.rfind(SEPARATOR).map(|pos| Path {
            value: self.value[..pos].to_string(),
        })
    }

    pub fn is_root(&self) -> bool {
        !self.value.contains(SEPARATOR)
    }

    pub fn append_name(&self, name: &Name) -> Path {
        self.join(name.value())
    }

    /// Appends every name of `path`, so `a.b` + `c.d` is `a.b.c.d`.
    pub fn append_path(&self, path: &Path) -> Path {
        self.join(path.value())
    }

    pub fn names(&self) -> impl Iterator<Item = Name> + '_ {
        self.value.split(SEPARATOR).map(Name::from_segment)
    }

    /// Number of names; always at least one.
    pub fn len(&self) -> usize {
        self.value.matches(SEPARATOR).count() + 1
    }

    /// Segment-wise prefix test: `a.b` starts `a.b.c` but not `a.bc`.
    pub fn starts_with(&self, prefix: &Path) -> bool {
        match self.value.strip_prefix(prefix.value.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with(SEPARATOR),
            None => false,
        }
    }

    fn join(&self, tail: &str) -> Path {
        let mut value = String::with_capacity(self.value.len() + 1 + tail.len());
        value.push_str(&self.value);
        value.push(SEPARATOR);
        value.push_str(tail);
        Path { value }
    }
}

impl From<Name> for Path {
    fn from(name: Name) -> Self {
        Path {
            value: name.value().to_string(),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl FromStr for Path {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Path::parse(s)
    }
}

impl TryFrom<&str> for Path {
    type Error = Error;

    fn try_from(value: &str) -> crate::Result<Self> {
        Path::parse(value)
    }
}

impl TryFrom<String> for Path {
    type Error = Error;

    fn try_from(value: String) -> crate::Result<Self> {
        Path::parse(&value)
    }
}
