use crate::engine::DEFAULT_THRESHOLD;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub ledger_path: PathBuf,
    pub action: Action,
    pub output_path: PathBuf,
    pub date_fix_threshold: NaiveDate,
    pub chart_utc_offset_hours: i64,
    pub parallel_matching: bool,
}

/// What to do with the closed positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Append rows to the summary table.
    Summarize,
    /// Emit chart-annotation script.
    Chart,
    /// Dump positions as a JSON array.
    Json,
}

impl Action {
    pub fn default_output_path(&self) -> &'static str {
        match self {
            Action::Summarize => "closed_positions.csv",
            Action::Chart => "annotations.ts",
            Action::Json => "closed_positions.json",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let ledger_path = env_map
            .get("LEDGER_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| ConfigError::MissingEnv("LEDGER_PATH".to_string()))?;

        let action = match env_map
            .get("ACTION")
            .map(|s| s.as_str())
            .unwrap_or("summarize")
        {
            "summarize" => Action::Summarize,
            "chart" => Action::Chart,
            "json" => Action::Json,
            other => {
                return Err(ConfigError::InvalidValue(
                    "ACTION".to_string(),
                    format!("must be summarize, chart, or json, got {}", other),
                ))
            }
        };

        let output_path = env_map
            .get("OUTPUT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(action.default_output_path()));

        let date_fix_threshold = match env_map.get("DATE_FIX_THRESHOLD") {
            Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
                ConfigError::InvalidValue(
                    "DATE_FIX_THRESHOLD".to_string(),
                    "must be a YYYY-MM-DD date".to_string(),
                )
            })?,
            None => DEFAULT_THRESHOLD,
        };

        let chart_utc_offset_hours = env_map
            .get("CHART_UTC_OFFSET_HOURS")
            .map(|s| s.as_str())
            .unwrap_or("3")
            .parse::<i64>()
            .ok()
            .filter(|hours| (-23..=23).contains(hours))
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "CHART_UTC_OFFSET_HOURS".to_string(),
                    "must be an integer between -23 and 23".to_string(),
                )
            })?;

        let parallel_matching = match env_map
            .get("PARALLEL_MATCHING")
            .map(|s| s.as_str())
            .unwrap_or("false")
        {
            "true" | "1" => true,
            "false" | "0" => false,
            other => {
                return Err(ConfigError::InvalidValue(
                    "PARALLEL_MATCHING".to_string(),
                    format!("must be true or false, got {}", other),
                ))
            }
        };

        Ok(Config {
            ledger_path,
            action,
            output_path,
            date_fix_threshold,
            chart_utc_offset_hours,
            parallel_matching,
        })
    }
}
