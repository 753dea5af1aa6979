//! Application configuration.
//!
//! # Invariants
//! - `AppConfig::default()` always validates.
//! - Constraint ranges are non-inverted (`min <= max`, `min_length <= max_length`).
//! - The people rules never admit a headcount below one.

use crate::logging::{LogSettings, LoggingError};
use crate::validation::project_input::{InputRules, ProjectField};
use crate::validation::rules::Constraints;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DEFAULT_HOST_ELEMENT_ID: &str = "app";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Element the form and both lists are attached to.
    pub host_element_id: String,
    pub log: LogSettings,
    pub rules: InputRules,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host_element_id: DEFAULT_HOST_ELEMENT_ID.to_string(),
            log: LogSettings::default(),
            rules: InputRules::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let host = self.host_element_id.as_str();
        if host.is_empty() || host.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidHostId(host.to_string()));
        }
        self.log.normalized().map_err(ConfigError::Log)?;
        for (field, constraints) in [
            (ProjectField::Title, &self.rules.title),
            (ProjectField::Description, &self.rules.description),
            (ProjectField::People, &self.rules.people),
        ] {
            check_constraints(field, constraints)?;
        }
        match self.rules.people.min {
            Some(min) if min >= 1.0 => Ok(()),
            min => Err(ConfigError::HeadcountFloor(min)),
        }
    }
}

fn check_constraints(field: ProjectField, constraints: &Constraints) -> Result<(), ConfigError> {
    if let (Some(min), Some(max)) = (constraints.min_length, constraints.max_length) {
        if min > max {
            return Err(ConfigError::InvertedRange {
                field: field.as_str(),
                rule: "length",
            });
        }
    }
    if let (Some(min), Some(max)) = (constraints.min, constraints.max) {
        if min.is_nan() || max.is_nan() || min > max {
            return Err(ConfigError::InvertedRange {
                field: field.as_str(),
                rule: "value",
            });
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidHostId(String),
    Log(LoggingError),
    InvertedRange {
        field: &'static str,
        rule: &'static str,
    },
    /// `rules.people.min` is missing or below one.
    HeadcountFloor(Option<f64>),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidHostId(value) => write!(f, "host element id is invalid: `{value}`"),
            Self::Log(err) => write!(f, "{err}"),
            Self::InvertedRange { field, rule } => {
                write!(f, "{field} {rule} range has min greater than max")
            }
            Self::HeadcountFloor(Some(min)) => {
                write!(f, "people min must be at least 1, got {min}")
            }
            Self::HeadcountFloor(None) => write!(f, "people min must be set to at least 1"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Log(err) => Some(err),
            _ => None,
        }
    }
}
