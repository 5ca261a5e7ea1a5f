use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use dotprops::{LineEnding, Properties};

pub(crate) fn read_text(file: &Path) -> Result<String> {
    fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))
}

pub(crate) fn load_properties(file: &Path) -> Result<Properties> {
    let text = read_text(file)?;
    let properties =
        dotprops::parse(&text).with_context(|| format!("failed to parse {}", file.display()))?;
    log::debug!("loaded {} properties from {}", properties.len(), file.display());
    Ok(properties)
}

pub(crate) fn store_properties(
    file: &Path,
    properties: &Properties,
    line_ending: LineEnding,
) -> Result<()> {
    fs::write(file, properties.to_text(line_ending))
        .with_context(|| format!("failed to write {}", file.display()))
}

pub(crate) fn parse_key(key: &str) -> Result<dotprops::Path> {
    dotprops::Path::parse(key).with_context(|| format!("invalid key `{key}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_and_store_round_trip() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("app.properties");
        fs::write(&file, "# settings\nserver.port = 8080\nserver.host=localhost\n")?;

        let properties = load_properties(&file)?;
        assert_eq!(properties.get(&parse_key("server.port")?), Some("8080"));

        store_properties(&file, &properties, LineEnding::Nl)?;
        assert_eq!(
            read_text(&file)?,
            "server.host=localhost\nserver.port=8080\n"
        );
        Ok(())
    }

    #[test]
    fn load_reports_file_in_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("broken.properties");
        fs::write(&file, "no-assignment\n")?;
        let err = load_properties(&file).unwrap_err();
        assert!(format!("{err:#}").contains("broken.properties"));
        Ok(())
    }

    #[test]
    fn parse_key_rejects_empty_component() {
        assert!(parse_key("a..b").is_err());
    }
}
