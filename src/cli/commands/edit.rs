use std::path::Path;

use anyhow::Result;

use super::util::{load_properties, parse_key, store_properties};
use dotprops::{LineEnding, Properties};

pub(crate) fn cmd_get(file: &Path, key: &str) -> Result<()> {
    let properties = load_properties(file)?;
    let value = properties.get_or_fail(&parse_key(key)?)?;
    println!("{value}");
    Ok(())
}

pub(crate) fn cmd_set(file: &Path, key: &str, value: &str, line_ending: LineEnding) -> Result<()> {
    let properties = load_properties(file)?;
    let updated = properties.set(parse_key(key)?, value);
    if save_if_changed(file, &properties, &updated, line_ending)? {
        println!("set `{key}` in {}", file.display());
    } else {
        println!("`{key}` already has that value");
    }
    Ok(())
}

pub(crate) fn cmd_remove(file: &Path, key: &str, line_ending: LineEnding) -> Result<()> {
    let properties = load_properties(file)?;
    let updated = properties.remove(&parse_key(key)?);
    if save_if_changed(file, &properties, &updated, line_ending)? {
        println!("removed `{key}` from {}", file.display());
    } else {
        println!("`{key}` not present");
    }
    Ok(())
}

pub(crate) fn cmd_keys(file: &Path, prefix: Option<&str>) -> Result<()> {
    let properties = load_properties(file)?;
    let keys = list_keys(&properties, prefix)?;
    if keys.is_empty() {
        println!("(empty)");
    }
    for key in keys {
        println!("{key}");
    }
    Ok(())
}

fn save_if_changed(
    file: &Path,
    original: &Properties,
    updated: &Properties,
    line_ending: LineEnding,
) -> Result<bool> {
    if updated.same_instance(original) {
        return Ok(false);
    }
    store_properties(file, updated, line_ending)?;
    Ok(true)
}

fn list_keys(properties: &Properties, prefix: Option<&str>) -> Result<Vec<String>> {
    let selected = match prefix {
        Some(prefix) => properties.children(&parse_key(prefix)?),
        None => properties.clone(),
    };
    Ok(selected.keys().map(|key| key.to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_file(dir: &tempfile::TempDir, text: &str) -> Result<std::path::PathBuf> {
        let file = dir.path().join("test.properties");
        fs::write(&file, text)?;
        Ok(file)
    }

    #[test]
    fn set_rewrites_canonically() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let file = write_file(&dir, "b = 2\n# note\na=1\n")?;
        cmd_set(&file, "c.d", "three 3", LineEnding::Nl)?;
        assert_eq!(fs::read_to_string(&file)?, "a=1\nb=2\nc.d=three 3\n");
        Ok(())
    }

    #[test]
    fn set_same_value_leaves_file_untouched() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let original = "# keep this comment\na = 1\n";
        let file = write_file(&dir, original)?;
        cmd_set(&file, "a", "1", LineEnding::Nl)?;
        assert_eq!(fs::read_to_string(&file)?, original);
        Ok(())
    }

    #[test]
    fn remove_missing_key_leaves_file_untouched() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let original = "a = 1\n";
        let file = write_file(&dir, original)?;
        cmd_remove(&file, "b", LineEnding::Nl)?;
        assert_eq!(fs::read_to_string(&file)?, original);
        cmd_remove(&file, "a", LineEnding::CrNl)?;
        assert_eq!(fs::read_to_string(&file)?, "");
        Ok(())
    }

    #[test]
    fn get_missing_key_fails() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let file = write_file(&dir, "a=1\n")?;
        let err = cmd_get(&file, "b").unwrap_err();
        assert!(err.to_string().contains("Missing property \"b\""));
        Ok(())
    }

    #[test]
    fn keys_filtered_by_prefix() -> Result<()> {
        let properties = dotprops::parse("db.url=x\ndb.user=y\ndbx=z\napp=1\n")?;
        assert_eq!(list_keys(&properties, Some("db"))?, ["db.url", "db.user"]);
        assert_eq!(list_keys(&properties, None)?.len(), 4);
        assert!(list_keys(&properties, Some("a..b")).is_err());
        Ok(())
    }
}
