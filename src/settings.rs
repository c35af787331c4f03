use std::path::{Path, PathBuf};
use miniucd_base::EnumFromNameT;
use miniucd_logging::LogLevel;
use miniucd_toml::{self as toml, Toml};
use miniucd_ucd::{read_file, UcdError, UcdResult};

/// miniucd settings, loaded from `miniucd.toml`
///
/// Relative paths are relative to the directory of the settings file.
#[derive(Clone, Debug)]
pub struct Settings {
    /// UCD version all inputs must declare, e.g. `16.0.0`
    pub version    : String,
    /// Directory containing the alias files and the grouped XML
    pub ucd_root   : PathBuf,
    /// Flattened data written by the parse stage and read by the generate stage
    pub data_file  : PathBuf,
    /// Directory the generated tables are written to
    pub output_dir : PathBuf,

    pub log_level  : LogLevel,
    /// Additional log file
    pub log_file   : Option<PathBuf>,
}

impl Settings {
    pub const FILE_NAME: &'static str = "miniucd.toml";

    pub fn load(path: &Path) -> UcdResult<Settings> {
        let source = read_file(path)?;
        let base_dir = path.parent().unwrap_or(Path::new(""));
        Self::parse(&source, base_dir).map_err(|msg| UcdError::Settings(format!("{}: {msg}", path.display())))
    }

    pub fn parse(source: &str, base_dir: &Path) -> Result<Settings, String> {
        let toml = Toml::parse(source).map_err(|err| err.to_string())?;

        let required = |key: &str| match toml.get(key) {
            Some(toml::Item::String(value)) if !value.is_empty() => Ok(value.as_str()),
            Some(_) => Err(format!("'{key}' must be a non-empty string")),
            None => Err(format!("'{key}' is missing")),
        };
        let path = |key: &str| required(key).map(|value| base_dir.join(value));

        let mut settings = Settings {
            version: required("version")?.to_string(),
            ucd_root: path("ucd-root")?,
            data_file: path("data-file")?,
            output_dir: path("output-dir")?,
            log_level: LogLevel::Info,
            log_file: None,
        };

        match toml.get("log") {
            Some(toml::Item::Table(log)) => {
                match log.get_item("level") {
                    Some(toml::Item::String(level)) => {
                        settings.log_level = LogLevel::parse(level).ok_or_else(|| format!("unknown log level '{level}'"))?;
                    },
                    Some(_) => return Err("'log.level' must be a string".to_string()),
                    None => (),
                }
                match log.get_item("file") {
                    Some(toml::Item::String(file)) => settings.log_file = Some(base_dir.join(file)),
                    Some(_) => return Err("'log.file' must be a string".to_string()),
                    None => (),
                }
            },
            Some(_) => return Err("'log' must be a table".to_string()),
            None => (),
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETTINGS: &str = r#"
version     = "16.0.0"
ucd-root    = "ucd"
data-file   = "ucd.json"
output-dir  = "generated"

[log]
level       = "verbose"
file        = "miniucd.log"
"#;

    #[test]
    fn paths_are_relative_to_settings() {
        let settings = Settings::parse(SETTINGS, Path::new("data")).unwrap();
        assert_eq!(settings.version, "16.0.0");
        assert_eq!(settings.ucd_root, Path::new("data/ucd"));
        assert_eq!(settings.data_file, Path::new("data/ucd.json"));
        assert_eq!(settings.output_dir, Path::new("data/generated"));
        assert_eq!(settings.log_level, LogLevel::Verbose);
        assert_eq!(settings.log_file.as_deref(), Some(Path::new("data/miniucd.log")));
    }

    #[test]
    fn log_table_is_optional() {
        let settings = Settings::parse("version = \"15.1.0\"\nucd-root = \"ucd\"\ndata-file = \"a.json\"\noutput-dir = \"out\"\n", Path::new("")).unwrap();
        assert_eq!(settings.log_level, LogLevel::Info);
        assert!(settings.log_file.is_none());
    }

    #[test]
    fn invalid_settings() {
        let err = Settings::parse("version = \"16.0.0\"\nucd-root = \"ucd\"\ndata-file = \"a.json\"\n", Path::new("")).unwrap_err();
        assert_eq!(err, "'output-dir' is missing");

        let err = Settings::parse("version = 16\n", Path::new("")).unwrap_err();
        assert_eq!(err, "'version' must be a non-empty string");

        let err = Settings::parse(&SETTINGS.replace("verbose", "loud"), Path::new("")).unwrap_err();
        assert_eq!(err, "unknown log level 'loud'");

        assert!(Settings::parse("version = ", Path::new("")).unwrap_err().starts_with("Failed to parse toml"));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(Settings::FILE_NAME);
        std::fs::write(&path, SETTINGS).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.ucd_root, dir.path().join("ucd"));

        let missing = Settings::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(missing, UcdError::MissingFile { .. }));
    }
}
