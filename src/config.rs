//! Optional user configuration (`config.toml`).
//!
//! ```toml
//! precision = 3
//! max_depth = 2048
//! format = "csv"
//! ```

use directories::ProjectDirs;
use rpngrid_core::OutputFormat;
use rpngrid_core::storage::DEFAULT_PRECISION;
use rpngrid_engine::engine::DEFAULT_MAX_DEPTH;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    precision: Option<usize>,
    max_depth: Option<usize>,
    format: Option<String>,
}

/// Effective settings after merging the config file over the defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub precision: usize,
    pub max_depth: usize,
    pub format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            precision: DEFAULT_PRECISION,
            max_depth: DEFAULT_MAX_DEPTH,
            format: OutputFormat::Text,
        }
    }
}

pub fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "rpngrid")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

/// Load settings from `explicit` or the user config path.
///
/// Problems never abort the run; they are returned as warnings and the
/// defaults are used for anything that could not be read.
pub fn load_config(explicit: Option<&Path>) -> (Config, Vec<String>) {
    let mut warnings = Vec::new();
    let path = explicit.map(Path::to_path_buf).or_else(user_config_path);

    let file = match path.as_ref() {
        Some(path) if path.exists() => read_config_file(path, &mut warnings),
        Some(path) if explicit.is_some() => {
            warnings.push(format!("Config file not found: {}", path.display()));
            None
        }
        _ => None,
    };

    let mut config = Config::default();
    if let Some(file) = file {
        apply(&mut config, file, &mut warnings);
    }
    (config, warnings)
}

fn read_config_file(path: &Path, warnings: &mut Vec<String>) -> Option<ConfigFile> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.len() > MAX_CONFIG_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ));
            None
        }
        Ok(_) => match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<ConfigFile>(&content) {
                Ok(parsed) => Some(parsed),
                Err(err) => {
                    warnings.push(format!("Failed to parse {}: {}", path.display(), err));
                    None
                }
            },
            Err(err) => {
                warnings.push(format!("Failed to read {}: {}", path.display(), err));
                None
            }
        },
        Err(err) => {
            warnings.push(format!(
                "Failed to read metadata for {}: {}",
                path.display(),
                err
            ));
            None
        }
    }
}

fn apply(config: &mut Config, file: ConfigFile, warnings: &mut Vec<String>) {
    if let Some(precision) = file.precision {
        config.precision = precision;
    }
    match file.max_depth {
        Some(0) => warnings.push("max_depth must be at least 1; using default".to_string()),
        Some(depth) => config.max_depth = depth,
        None => {}
    }
    if let Some(format) = file.format {
        match format.parse::<OutputFormat>() {
            Ok(format) => config.format = format,
            Err(err) => warnings.push(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn user_config_path_is_deterministic() {
        let first = user_config_path();
        assert_eq!(first, user_config_path());
        if let Some(path) = first {
            assert!(path.ends_with("config.toml"), "{}", path.display());
            let dir = path.parent().expect("config file has a parent directory");
            assert!(
                dir.to_string_lossy().to_lowercase().contains("rpngrid"),
                "{}",
                dir.display()
            );
        }
    }

    #[test]
    fn test_load_full_config() {
        let (_dir, path) = write_config("precision = 2\nmax_depth = 16\nformat = \"csv\"\n");
        let (config, warnings) = load_config(Some(&path));
        assert!(warnings.is_empty(), "{:?}", warnings);
        assert_eq!(
            config,
            Config {
                precision: 2,
                max_depth: 16,
                format: OutputFormat::Csv
            }
        );
    }

    #[test]
    fn test_unknown_key_warns_and_keeps_defaults() {
        let (_dir, path) = write_config("colour = \"red\"\n");
        let (config, warnings) = load_config(Some(&path));
        assert_eq!(config, Config::default());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Failed to parse"));
    }

    #[test]
    fn test_invalid_values_warn() {
        let (_dir, path) = write_config("max_depth = 0\nformat = \"xml\"\nprecision = 1\n");
        let (config, warnings) = load_config(Some(&path));
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.format, OutputFormat::Text);
        assert_eq!(config.precision, 1);
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_missing_explicit_file_warns() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(Some(&dir.path().join("nope.toml")));
        assert_eq!(config, Config::default());
        assert_eq!(warnings.len(), 1);
    }
}
