mod schema;

pub use schema::{
    AvailabilityConfig, Config, DeliveryConfig, JudgeConfig, ReportConfig, RunSection, SkillList,
};

use crate::metrics::{split_delimited, DEFAULT_REQUIRED_SKILLS};
use crate::scoring::validate_scoring;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine home directory; pass --config")]
    NoHomeDir,
    #[error("config file not found at {0}. Create it or pass --config")]
    NotFound(PathBuf),
    #[error("failed to read config file at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: invalid YAML in {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid configuration:\n  - {}", .0.join("\n  - "))]
    Invalid(Vec<String>),
}

/// Get the config directory path (~/.config/shortlist/)
pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(".config").join("shortlist"))
}

/// Get the default config file path (~/.config/shortlist/config.yaml)
pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/shortlist/config.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - The config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config, ConfigError> {
    let config_path = match path {
        Some(path) => path,
        None => get_config_path()?,
    };

    if !config_path.exists() {
        return Err(ConfigError::NotFound(config_path));
    }

    let content = fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
        path: config_path.clone(),
        source,
    })?;

    parse_config(&content, &config_path)
}

pub fn parse_config(content: &str, origin: &Path) -> Result<Config, ConfigError> {
    serde_saphyr::from_str(content).map_err(|e| ConfigError::Parse {
        path: origin.to_path_buf(),
        message: e.to_string(),
    })
}

pub fn parse_duration(field: &str, raw: &str) -> Result<Duration, String> {
    humantime::parse_duration(raw.trim())
        .map_err(|e| format!("{}: invalid duration '{}' - {}", field, raw, e))
}

impl JudgeConfig {
    pub fn timeout_duration(&self) -> Result<Duration, String> {
        parse_duration("judge.timeout", &self.timeout)
    }
}

impl DeliveryConfig {
    pub fn smtp_timeout(&self) -> Result<Duration, String> {
        parse_duration("delivery.timeout", &self.timeout)
    }
}

/// Validate the whole configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Err(scoring_errors) = validate_scoring(&config.scoring) {
        errors.extend(scoring_errors);
    }

    if !(config.run.min_years >= 0.0) {
        errors.push("run.min_years: must be non-negative".to_string());
    }
    if config.run.source.is_none() {
        errors.push("run.source: path to a .csv or .json candidate file is required".to_string());
    }
    for (i, recipient) in config.run.recipients.iter().enumerate() {
        if !recipient.contains('@') {
            errors.push(format!("run.recipients[{}]: '{}' is not an email address", i, recipient));
        }
    }

    if let Some(ref judge) = config.judge {
        if let Err(e) = judge.timeout_duration() {
            errors.push(e);
        }
        if judge.endpoint.trim().is_empty() {
            errors.push("judge.endpoint: must not be empty".to_string());
        }
        if judge.model.trim().is_empty() {
            errors.push("judge.model: must not be empty".to_string());
        }
    }

    if let Err(e) = config.delivery.smtp_timeout() {
        errors.push(e);
    }
    if config.report.top_n == 0 {
        errors.push("report.top_n: must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Per-run settings resolved once from the configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Lower-cased, trimmed, never empty.
    pub required_skills: Vec<String>,
    pub min_years: f64,
    pub source: PathBuf,
    pub recipients: Vec<String>,
}

impl RunConfig {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let source = config.run.source.clone().ok_or_else(|| {
            ConfigError::Invalid(vec!["run.source: candidate file is required".to_string()])
        })?;

        Ok(Self {
            required_skills: normalize_skills(config.run.required_skills.as_ref()),
            min_years: config.run.min_years.max(0.0),
            source,
            recipients: config
                .run
                .recipients
                .iter()
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .collect(),
        })
    }
}

/// Accept a list or a comma-delimited string; fall back to the default
/// skills when nothing usable is configured.
pub fn normalize_skills(skills: Option<&SkillList>) -> Vec<String> {
    let skills: Vec<String> = match skills {
        Some(SkillList::List(items)) => items
            .iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(SkillList::Delimited(raw)) => split_delimited(raw),
        None => Vec::new(),
    };

    if skills.is_empty() {
        DEFAULT_REQUIRED_SKILLS.iter().map(|s| s.to_string()).collect()
    } else {
        skills
    }
}
