//! Reading and writing `.properties` text into an immutable store keyed by
//! dotted paths.

pub mod error;
mod hex;
pub mod json;
pub mod name;
pub mod parse;
pub mod path;
pub mod print;
pub mod properties;

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub use error::{Error, ErrorKind};
pub use json::{JsonCodec, JsonRegistry, from_json, to_json};
pub use name::Name;
pub use parse::parse;
pub use path::{Path, SEPARATOR};
pub use print::{IndentingPrinter, LineEnding, StringPrinter, print_tree, to_text};
pub use properties::Properties;
