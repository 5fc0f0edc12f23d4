// Configuration loading and parsing (ballplayer.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the single config file under `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "ballplayer.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// ballplayer.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Folder with the Lahman CSVs.
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub regular_font: Option<PathBuf>,
    #[serde(default)]
    pub bold_font: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    "info".to_string()
}

impl Config {
    /// Resolve the data and output folders against `base_dir` when relative.
    pub fn resolve_paths(mut self, base_dir: &Path) -> Self {
        if self.data.dir.is_relative() {
            self.data.dir = base_dir.join(&self.data.dir);
        }
        if self.output.dir.is_relative() {
            self.output.dir = base_dir.join(&self.output.dir);
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/ballplayer.toml` relative to `base_dir`.
///
/// Does not copy defaults; see `load_config()`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config.resolve_paths(base_dir))
}

/// Copy `defaults/ballplayer.toml` into `config/` when `config/` has none.
/// Returns the path written, or `None` when an existing config was kept.
pub fn ensure_config_files(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let default_file = base_dir.join("defaults").join(CONFIG_FILE);
    let config_dir = base_dir.join("config");
    let target = config_dir.join(CONFIG_FILE);

    if !default_file.is_file() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/{CONFIG_FILE} nor config/ found in {}; \
                     run from the crate root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(None);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(mut dest) => {
            let content =
                std::fs::read(&default_file).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", default_file.display()),
                })?;
            std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                ConfigError::DefaultsCopyError {
                    message: format!("failed to write {}: {e}", target.display()),
                }
            })?;
            Ok(Some(target))
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(None),
        Err(e) => Err(ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", target.display()),
        }),
    }
}

/// Load config relative to the current working directory, copying defaults
/// first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    let dirs: &[(&str, &Path)] = &[
        ("data.dir", config.data.dir.as_path()),
        ("output.dir", config.output.dir.as_path()),
    ];
    for (name, dir) in dirs {
        if dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must not be empty".into(),
            });
        }
    }

    if config.render.bold_font.is_some() && config.render.regular_font.is_none() {
        return Err(ConfigError::ValidationError {
            field: "render.bold_font".into(),
            message: "requires render.regular_font".into(),
        });
    }

    if config.logging.filter.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "logging.filter".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Returns the ballplayer-cli crate root (works from the crate or the
    /// workspace root).
    fn project_root() -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        if cwd.join("defaults").exists() {
            cwd
        } else if cwd.join("crates/ballplayer-cli/defaults").exists() {
            cwd.join("crates/ballplayer-cli")
        } else {
            panic!("Cannot locate defaults/ directory from CWD {:?}", cwd);
        }
    }

    fn scratch(name: &str, config_text: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config").join(CONFIG_FILE), config_text).unwrap();
        tmp
    }

    #[test]
    fn load_valid_config_from_project_files() {
        let tmp = std::env::temp_dir().join("ballplayer_config_defaults");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::copy(
            project_root().join("defaults").join(CONFIG_FILE),
            tmp.join("defaults").join(CONFIG_FILE),
        )
        .unwrap();

        ensure_config_files(&tmp).expect("should copy default config");
        let config = load_config_from(&tmp).expect("defaults should load");

        assert_eq!(config.data.dir, tmp.join("data/core"));
        assert_eq!(config.output.dir, tmp.join("output"));
        assert!(config.render.regular_font.is_some());
        assert!(config.render.bold_font.is_some());
        assert!(config.logging.filter.contains("ballplayer"));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn optional_sections_default() {
        let tmp = scratch(
            "ballplayer_config_minimal",
            "[data]\ndir = \"/srv/lahman\"\n\n[output]\ndir = \"cards\"\n",
        );
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.data.dir, PathBuf::from("/srv/lahman"));
        assert_eq!(config.output.dir, tmp.join("cards"));
        assert!(config.render.regular_font.is_none());
        assert_eq!(config.logging.filter, "info");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_empty_data_dir() {
        let tmp = scratch(
            "ballplayer_config_empty_data",
            "[data]\ndir = \"\"\n\n[output]\ndir = \"out\"\n",
        );
        match load_config_from(&tmp) {
            Err(ConfigError::ValidationError { field, .. }) => assert_eq!(field, "data.dir"),
            other => panic!("expected ValidationError, got {other:?}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_bold_without_regular() {
        let tmp = scratch(
            "ballplayer_config_bold_only",
            "[data]\ndir = \"d\"\n\n[output]\ndir = \"o\"\n\n[render]\nbold_font = \"b.ttf\"\n",
        );
        match load_config_from(&tmp) {
            Err(ConfigError::ValidationError { field, .. }) => {
                assert_eq!(field, "render.bold_font")
            }
            other => panic!("expected ValidationError, got {other:?}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = scratch("ballplayer_config_invalid", "[data\ndir = ");
        assert!(matches!(
            load_config_from(&tmp),
            Err(ConfigError::ParseError { .. })
        ));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_when_config_missing() {
        let tmp = std::env::temp_dir().join("ballplayer_config_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        assert!(matches!(
            load_config_from(&tmp),
            Err(ConfigError::FileNotFound { .. })
        ));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_copies_on_first_run() {
        let tmp = std::env::temp_dir().join("ballplayer_config_first_run");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::copy(
            project_root().join("defaults").join(CONFIG_FILE),
            tmp.join("defaults").join(CONFIG_FILE),
        )
        .unwrap();
        fs::write(tmp.join("defaults/unrelated.txt"), "stray\n").unwrap();

        let copied = ensure_config_files(&tmp).expect("should copy");
        assert_eq!(copied, Some(tmp.join("config").join(CONFIG_FILE)));
        assert_eq!(
            fs::read(tmp.join("config").join(CONFIG_FILE)).unwrap(),
            fs::read(tmp.join("defaults").join(CONFIG_FILE)).unwrap()
        );
        // Only the config file itself is copied.
        assert!(!tmp.join("config/unrelated.txt").exists());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_skips_existing() {
        let tmp = std::env::temp_dir().join("ballplayer_config_skips");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::copy(
            project_root().join("defaults").join(CONFIG_FILE),
            tmp.join("defaults").join(CONFIG_FILE),
        )
        .unwrap();
        fs::write(tmp.join("config").join(CONFIG_FILE), "# custom\n").unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert_eq!(copied, None);
        let content = fs::read_to_string(tmp.join("config").join(CONFIG_FILE)).unwrap();
        assert_eq!(content, "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join("ballplayer_config_no_dirs");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        assert!(matches!(
            ensure_config_files(&tmp),
            Err(ConfigError::DefaultsCopyError { .. })
        ));
        let _ = fs::remove_dir_all(&tmp);
    }
}
