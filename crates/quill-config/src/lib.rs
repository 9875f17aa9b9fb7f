//! Configuration management for Quill.
//!
//! Parses `quill.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories. Every section and
//! field is optional: missing values fall back to built-in defaults, so a
//! config file written for an older release keeps loading after new settings
//! are added.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Example
//!
//! ```toml
//! [segment]
//! max_length = 500
//! suffix = " (cont.)"
//!
//! [[rules]]
//! id = "ooc"
//! name = "Out of character"
//! start = "(("
//! end = "))"
//! color = "#10b981"
//!
//! [session]
//! dir = "~/.local/share/quill"
//! ```
//!
//! `session.dir` supports `~` and `${VAR}` / `${VAR:-default}` expansion.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use quill_segmenter::{MarkupRule, SegmentConfig};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override maximum segment length.
    pub max_length: Option<usize>,
    /// Override continuation prefix.
    pub prefix: Option<String>,
    /// Override continuation suffix.
    pub suffix: Option<String>,
    /// Override session persistence flag.
    pub session_enabled: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "quill.toml";

/// Default session directory, relative to the config file.
const DEFAULT_SESSION_DIR: &str = ".quill";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Segmentation settings.
    pub segment: SegmentSettings,
    /// Markup rules. When present in the file, replaces the default rules.
    pub rules: Vec<RuleConfig>,
    /// Session configuration (paths are relative strings from TOML).
    session: SessionConfigRaw,

    /// Resolved session configuration (set after loading).
    #[serde(skip)]
    pub session_resolved: SessionConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Segmentation settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SegmentSettings {
    /// Maximum segment length in characters, including prefix and suffix.
    pub max_length: usize,
    /// Prepended to every segment after the first.
    pub prefix: String,
    /// Appended to every segment before the last.
    pub suffix: String,
}

impl Default for SegmentSettings {
    fn default() -> Self {
        Self {
            max_length: 256,
            prefix: String::new(),
            suffix: "...".to_owned(),
        }
    }
}

/// A markup rule as written in the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleConfig {
    /// Stable rule identifier.
    pub id: String,
    /// Display name (defaults to the id).
    #[serde(default)]
    pub name: Option<String>,
    /// Opening marker.
    pub start: String,
    /// Closing marker.
    #[serde(default)]
    pub end: String,
    /// Display color, `#rrggbb` or a color name.
    #[serde(default)]
    pub color: String,
}

impl RuleConfig {
    fn new(id: &str, name: &str, start: &str, end: &str, color: &str) -> Self {
        Self {
            id: id.to_owned(),
            name: Some(name.to_owned()),
            start: start.to_owned(),
            end: end.to_owned(),
            color: color.to_owned(),
        }
    }
}

impl From<&RuleConfig> for MarkupRule {
    fn from(rule: &RuleConfig) -> Self {
        MarkupRule::new(rule.id.as_str(), rule.start.as_str(), rule.end.as_str())
            .with_name(rule.name.as_deref().unwrap_or(&rule.id))
            .with_color(rule.color.as_str())
    }
}

/// Built-in rules: quoted speech and starred actions.
fn default_rules() -> Vec<RuleConfig> {
    vec![
        RuleConfig::new("1", "Speech", "\"", "\"", "#2563eb"),
        RuleConfig::new("2", "Action", "*", "*", "#e11d48"),
    ]
}

/// Raw session configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SessionConfigRaw {
    enabled: Option<bool>,
    dir: Option<String>,
}

/// Resolved session configuration with absolute paths.
#[derive(Debug, Default)]
pub struct SessionConfig {
    /// Whether the last input is persisted.
    pub enabled: bool,
    /// Directory holding session data.
    pub dir: PathBuf,
}

impl SessionConfig {
    /// Session state file path.
    #[must_use]
    pub fn session_file(&self) -> PathBuf {
        self.dir.join("session.json")
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`session.dir`").
        field: String,
        /// Error message.
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `quill.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(max_length) = settings.max_length {
            self.segment.max_length = max_length;
        }
        if let Some(prefix) = &settings.prefix {
            self.segment.prefix.clone_from(prefix);
        }
        if let Some(suffix) = &settings.suffix {
            self.segment.suffix.clone_from(suffix);
        }
        if let Some(session_enabled) = settings.session_enabled {
            self.session_resolved.enabled = session_enabled;
        }
    }

    /// Build the segmenter configuration.
    #[must_use]
    pub fn segment_config(&self) -> SegmentConfig {
        SegmentConfig {
            max_length: self.segment.max_length,
            prefix: self.segment.prefix.clone(),
            suffix: self.segment.suffix.clone(),
            rules: self.rules.iter().map(MarkupRule::from).collect(),
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_segment()?;
        self.validate_rules()?;
        Ok(())
    }

    fn validate_segment(&self) -> Result<(), ConfigError> {
        if self.segment.max_length == 0 {
            return Err(ConfigError::Validation(
                "segment.max_length must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_rules(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for rule in &self.rules {
            if rule.id.is_empty() {
                return Err(ConfigError::Validation(
                    "rules.id cannot be empty".to_owned(),
                ));
            }
            if !seen.insert(rule.id.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate rule id '{}'",
                    rule.id
                )));
            }
        }
        Ok(())
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            segment: SegmentSettings::default(),
            rules: default_rules(),
            session: SessionConfigRaw::default(),
            session_resolved: SessionConfig {
                enabled: true,
                dir: base.join(DEFAULT_SESSION_DIR),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Resolve the session directory against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        let dir = match self.session.dir.as_deref() {
            Some(raw) => {
                let expanded = shellexpand::full(raw).map_err(|e| ConfigError::EnvVar {
                    field: "session.dir".to_owned(),
                    message: e.to_string(),
                })?;
                config_dir.join(expanded.as_ref())
            }
            None => config_dir.join(DEFAULT_SESSION_DIR),
        };

        self.session_resolved = SessionConfig {
            enabled: self.session.enabled.unwrap_or(true),
            dir,
        };

        Ok(())
    }
}
