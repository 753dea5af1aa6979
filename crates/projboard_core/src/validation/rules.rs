//! Declarative constraint checks for raw form values.
//!
//! # Invariants
//! - Checks are pure and side-effect free.
//! - A constraint left as `None` is not evaluated.
//! - Text lengths are measured on the trimmed value in chars.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Candidate value read from one form field.
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    Text(String),
    Number(f64),
}

impl From<&str> for InputValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for InputValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for InputValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for InputValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

/// Named checks applied to one value. All present checks must pass.
///
/// Length checks apply to text only, range checks to numbers only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Constraints {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Constraints {
    pub fn required() -> Self {
        Self {
            required: true,
            ..Self::default()
        }
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }
}

/// Value paired with the constraints it must satisfy.
#[derive(Debug, Clone, PartialEq)]
pub struct Validatable {
    pub value: InputValue,
    pub constraints: Constraints,
}

impl Validatable {
    pub fn new(value: impl Into<InputValue>, constraints: Constraints) -> Self {
        Self {
            value: value.into(),
            constraints,
        }
    }
}

/// One failed check.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    Required,
    TooShort { min: usize, actual: usize },
    TooLong { max: usize, actual: usize },
    BelowMin { min: f64, actual: f64 },
    AboveMax { max: f64, actual: f64 },
}

impl Display for Violation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required => write!(f, "value is required"),
            Self::TooShort { min, actual } => {
                write!(f, "length {actual} is shorter than {min}")
            }
            Self::TooLong { max, actual } => write!(f, "length {actual} is longer than {max}"),
            Self::BelowMin { min, actual } => write!(f, "{actual} is below minimum {min}"),
            Self::AboveMax { max, actual } => write!(f, "{actual} is above maximum {max}"),
        }
    }
}

/// Returns whether every supplied constraint holds.
pub fn validate(input: &Validatable) -> bool {
    violations(input).is_empty()
}

/// Lists every failed constraint, in declaration order.
pub fn violations(input: &Validatable) -> Vec<Violation> {
    let rules = &input.constraints;
    let mut failed = Vec::new();

    match &input.value {
        InputValue::Text(text) => {
            let length = text.trim().chars().count();
            if rules.required && length == 0 {
                failed.push(Violation::Required);
            }
            if let Some(min) = rules.min_length {
                if length < min {
                    failed.push(Violation::TooShort {
                        min,
                        actual: length,
                    });
                }
            }
            if let Some(max) = rules.max_length {
                if length > max {
                    failed.push(Violation::TooLong {
                        max,
                        actual: length,
                    });
                }
            }
        }
        InputValue::Number(number) => {
            let number = *number;
            // An unparsable number counts as missing, so `required` alone rejects it.
            if rules.required && number.is_nan() {
                failed.push(Violation::Required);
            }
            // NaN fails both comparisons, so an unparsable number never passes a range.
            if let Some(min) = rules.min {
                if !(number >= min) {
                    failed.push(Violation::BelowMin {
                        min,
                        actual: number,
                    });
                }
            }
            if let Some(max) = rules.max {
                if !(number <= max) {
                    failed.push(Violation::AboveMax {
                        max,
                        actual: number,
                    });
                }
            }
        }
    }

    failed
}
