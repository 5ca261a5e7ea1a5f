//! Immutable, path-ordered key/value store.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::error::{Error, ErrorKind};
use crate::path::Path;
use crate::print::LineEnding;

static EMPTY: Lazy<Properties> = Lazy::new(|| Properties {
    entries: Arc::new(BTreeMap::new()),
});

/// An immutable map from [`Path`] to string value, iterated in path order.
///
/// Every "mutation" returns a new instance and leaves the receiver untouched.
/// A mutation that changes nothing returns the receiver itself (see
/// [`Properties::same_instance`]), and removing the last entry returns the
/// shared empty instance.
#[derive(Clone)]
pub struct Properties {
    entries: Arc<BTreeMap<Path, String>>,
}

impl Properties {
    /// The shared empty instance.
    pub fn empty() -> Properties {
        EMPTY.clone()
    }

    /// Parse `.properties` text; see [`parse`](crate::parse::parse).
    pub fn parse(text: &str) -> crate::Result<Properties> {
        crate::parse::parse(text)
    }

    pub fn get(&self, path: &Path) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    /// Like [`get`](Self::get) but a missing path is an error.
    pub fn get_or_fail(&self, path: &Path) -> crate::Result<&str> {
        self.get(path).ok_or_else(|| {
            Error::new(ErrorKind::MissingProperty)
                .with_message(format!("Missing property \"{path}\""))
        })
    }

    /// Set or replace the value at `path`.
    pub fn set(&self, path: Path, value: impl Into<String>) -> Properties {
        let value = value.into();
        if self.get(&path) == Some(value.as_str()) {
            return self.clone();
        }
        let mut entries = (*self.entries).clone();
        entries.insert(path, value);
        Properties {
            entries: Arc::new(entries),
        }
    }

    pub fn remove(&self, path: &Path) -> Properties {
        if !self.entries.contains_key(path) {
            return self.clone();
        }
        if self.entries.len() == 1 {
            return Properties::empty();
        }
        let mut entries = (*self.entries).clone();
        entries.remove(path);
        Properties {
            entries: Arc::new(entries),
        }
    }

    /// Entries whose key is `prefix` or lies below it. Keys are kept whole.
    pub fn children(&self, prefix: &Path) -> Properties {
        let selected: Properties = self
            .entries()
            .filter(|(path, _)| path.starts_with(prefix))
            .map(|(path, value)| (path.clone(), value.to_string()))
            .collect();
        if selected.len() == self.len() {
            self.clone()
        } else {
            selected
        }
    }

    pub fn entries(&self) -> impl ExactSizeIterator<Item = (&Path, &str)> + '_ {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = &Path> + '_ {
        self.entries.keys()
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.entries.values().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when both handles refer to the same underlying instance.
    pub fn same_instance(&self, other: &Properties) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }

    /// Canonical text using `line_ending` after every entry.
    pub fn to_text(&self, line_ending: LineEnding) -> String {
        crate::print::to_text(self, line_ending)
    }
}

impl Default for Properties {
    fn default() -> Self {
        Properties::empty()
    }
}

impl PartialEq for Properties {
    fn eq(&self, other: &Self) -> bool {
        self.same_instance(other) || self.entries == other.entries
    }
}

impl Eq for Properties {}

impl fmt::Debug for Properties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}

/// Canonical `.properties` text with CRLF line endings.
impl fmt::Display for Properties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text(LineEnding::default()))
    }
}

impl FromIterator<(Path, String)> for Properties {
    fn from_iter<I: IntoIterator<Item = (Path, String)>>(iter: I) -> Self {
        let entries: BTreeMap<Path, String> = iter.into_iter().collect();
        if entries.is_empty() {
            return Properties::empty();
        }
        Properties {
            entries: Arc::new(entries),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(text: &str) -> Path {
        Path::parse(text).expect("valid path")
    }

    #[test]
    fn get() {
        let props = Properties::empty().set(path("key.1"), "value1");
        assert_eq!(props.get(&path("key.1")), Some("value1"));
        assert_eq!(props.get(&path("unknown.key.404")), None);
    }

    #[test]
    fn get_or_fail_reports_missing_property() {
        let err = Properties::empty()
            .get_or_fail(&path("hello.world"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingProperty);
        assert_eq!(err.message(), Some("Missing property \"hello.world\""));
    }

    #[test]
    fn set_same_value_returns_same_instance() {
        let props = Properties::empty().set(path("key.123"), "value");
        let again = props.set(path("key.123"), "value".to_string());
        assert!(again.same_instance(&props));
    }

    #[test]
    fn set_leaves_original_unchanged() {
        let first = Properties::empty().set(path("key.111"), "111");
        let second = first.set(path("key.222"), "222");
        assert!(!second.same_instance(&first));
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 2);
        assert!(Properties::empty().is_empty());
    }

    #[test]
    fn set_replaces_value() {
        let props = Properties::empty()
            .set(path("key.111"), "111")
            .set(path("key.111"), "replaced");
        assert_eq!(props.get(&path("key.111")), Some("replaced"));
        assert_eq!(props.len(), 1);
    }

    #[test]
    fn remove_when_empty_returns_same_instance() {
        let empty = Properties::empty();
        assert!(empty.remove(&path("key.123")).same_instance(&empty));
    }

    #[test]
    fn remove_unknown_returns_same_instance() {
        let props = Properties::empty().set(path("key.111"), "111");
        assert!(props.remove(&path("unknown.404")).same_instance(&props));
    }

    #[test]
    fn remove_last_entry_returns_empty_singleton() {
        let props = Properties::empty()
            .set(path("key.111"), "111")
            .set(path("key.222"), "222");
        let removed = props.remove(&path("key.111")).remove(&path("key.222"));
        assert!(removed.same_instance(&Properties::empty()));
    }

    #[test]
    fn remove_keeps_other_entries() {
        let props = Properties::empty()
            .set(path("key.111"), "111")
            .set(path("key.222"), "222");
        let removed = props.remove(&path("key.111"));
        assert_eq!(removed.len(), 1);
        assert_eq!(removed.get(&path("key.222")), Some("222"));
        assert_eq!(props.len(), 2);
    }

    #[test]
    fn iteration_is_path_ordered() {
        let props = Properties::empty()
            .set(path("key.333"), "3")
            .set(path("key.111"), "1")
            .set(path("key.222"), "2");
        let keys: Vec<&str> = props.keys().map(Path::value).collect();
        assert_eq!(keys, ["key.111", "key.222", "key.333"]);
        let values: Vec<&str> = props.values().collect();
        assert_eq!(values, ["1", "2", "3"]);
        let entries: Vec<(&str, &str)> = props.entries().map(|(k, v)| (k.value(), v)).collect();
        assert_eq!(entries, [("key.111", "1"), ("key.222", "2"), ("key.333", "3")]);
    }

    #[test]
    fn equality_is_structural() {
        let a = Properties::empty().set(path("x"), "1");
        let b = Properties::empty().set(path("x"), "1");
        assert_eq!(a, b);
        assert!(!a.same_instance(&b));
        assert_ne!(a, b.set(path("y"), "2"));
    }

    #[test]
    fn children_selects_subtree() {
        let props = Properties::empty()
            .set(path("server.port"), "80")
            .set(path("server.host"), "localhost")
            .set(path("serverless"), "no")
            .set(path("client.port"), "81");
        let server = props.children(&path("server"));
        let keys: Vec<&str> = server.keys().map(Path::value).collect();
        assert_eq!(keys, ["server.host", "server.port"]);
        assert!(props.children(&path("nothing")).same_instance(&Properties::empty()));
    }

    #[test]
    fn collect_from_pairs() {
        let props: Properties = vec![
            (path("b"), "2".to_string()),
            (path("a"), "1".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(props.len(), 2);
        assert_eq!(props.keys().next(), Some(&path("a")));
    }

    #[test]
    fn shareable_across_threads() {
        let props = Properties::empty().set(path("a"), "1");
        let handle = {
            let props = props.clone();
            std::thread::spawn(move || props.get(&path("a")).map(str::to_string))
        };
        assert_eq!(handle.join().unwrap().as_deref(), Some("1"));
    }
}
