mod edit;
mod format;
mod json;
mod util;

pub(crate) use edit::{cmd_get, cmd_keys, cmd_remove, cmd_set};
pub(crate) use format::{cmd_fmt, cmd_tree};
pub(crate) use json::{cmd_from_json, cmd_to_json};
