use std::path::Path;

use anyhow::{Context, Result};

use super::util::{load_properties, read_text};
use dotprops::{LineEnding, Properties};

pub(crate) fn cmd_to_json(file: &Path, pretty: bool) -> Result<()> {
    let properties = load_properties(file)?;
    let node = dotprops::to_json(&properties);
    let text = if pretty {
        serde_json::to_string_pretty(&node)?
    } else {
        serde_json::to_string(&node)?
    };
    println!("{text}");
    Ok(())
}

pub(crate) fn cmd_from_json(file: &Path, line_ending: LineEnding) -> Result<()> {
    let properties = load_json(file)?;
    print!("{}", properties.to_text(line_ending));
    Ok(())
}

fn load_json(file: &Path) -> Result<Properties> {
    let text = read_text(file)?;
    let node: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse JSON in {}", file.display()))?;
    let properties = dotprops::from_json(&node)
        .with_context(|| format!("invalid properties object in {}", file.display()))?;
    Ok(properties)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn load_json_validates_paths() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("props.json");

        fs::write(&file, r#"{"b.c": "2", "a": "1\n"}"#)?;
        let properties = load_json(&file)?;
        assert_eq!(properties.to_text(LineEnding::Nl), "a=1\\n\nb.c=2\n");

        fs::write(&file, r#"{"b..c": "2"}"#)?;
        let err = load_json(&file).unwrap_err();
        assert!(format!("{err:#}").contains("InvalidPath"));
        Ok(())
    }
}
