use crate::delivery::local::DEFAULT_REPORT_PATH;
use crate::delivery::smtp::{DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT};
use crate::judge::client::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use crate::metrics::{AvailabilityPolicy, DEFAULT_LAG_DAYS};
use crate::report::DEFAULT_TOP_N;
use crate::scoring::ScoringConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub run: RunSection,

    /// Free-text role profile handed to the judge.
    #[serde(default)]
    pub role: String,

    /// Omitted means no judge: judge-sourced sub-scores count as 0.
    #[serde(default)]
    pub judge: Option<JudgeConfig>,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub availability: AvailabilityConfig,

    #[serde(default)]
    pub delivery: DeliveryConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RunSection {
    /// List, or one comma-delimited string.
    #[serde(default)]
    pub required_skills: Option<SkillList>,

    #[serde(default)]
    pub min_years: f64,

    /// Candidate file, `.csv` or `.json`.
    #[serde(default)]
    pub source: Option<PathBuf>,

    #[serde(default)]
    pub recipients: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum SkillList {
    List(Vec<String>),
    Delimited(String),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct JudgeConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Humantime duration, e.g. "120s" or "2m".
    #[serde(default = "default_judge_timeout")]
    pub timeout: String,

    /// Ask the judge for an executive summary of the pool.
    #[serde(default)]
    pub summary: bool,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            timeout: default_judge_timeout(),
            summary: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AvailabilityConfig {
    #[serde(default)]
    pub policy: AvailabilityPolicy,

    #[serde(default = "default_lag_days")]
    pub default_lag_days: u32,
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            policy: AvailabilityPolicy::default(),
            default_lag_days: DEFAULT_LAG_DAYS,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DeliveryConfig {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default = "default_smtp_timeout")]
    pub timeout: String,

    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Defaults to "Recruitment report - top N candidates".
    #[serde(default)]
    pub subject: Option<String>,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            timeout: default_smtp_timeout(),
            output_path: default_output_path(),
            subject: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_judge_timeout() -> String {
    "120s".to_string()
}

fn default_lag_days() -> u32 {
    DEFAULT_LAG_DAYS
}

fn default_smtp_host() -> String {
    DEFAULT_SMTP_HOST.to_string()
}

fn default_smtp_port() -> u16 {
    DEFAULT_SMTP_PORT
}

fn default_smtp_timeout() -> String {
    "30s".to_string()
}

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_REPORT_PATH)
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}
