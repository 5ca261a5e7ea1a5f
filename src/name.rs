//! Single path segments.

use std::fmt;

use crate::error::{Error, ErrorKind};
use crate::path::SEPARATOR;

/// One non-empty component of a [`Path`](crate::Path). Never contains `.`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(String);

impl Name {
    pub fn new(name: impl Into<String>) -> crate::Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::new(ErrorKind::InvalidName).with_message("name cannot be empty"));
        }
        if name.contains(SEPARATOR) {
            return Err(Error::new(ErrorKind::InvalidName)
                .with_message(format!("name \"{name}\" cannot contain '{SEPARATOR}'")));
        }
        Ok(Name(name))
    }

    /// Wraps a segment the caller has already split on the separator.
    pub(crate) fn from_segment(segment: &str) -> Self {
        debug_assert!(!segment.is_empty() && !segment.contains(SEPARATOR));
        Name(segment.to_string())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Name {
    type Error = Error;

    fn try_from(value: &str) -> crate::Result<Self> {
        Name::new(value)
    }
}
