//! Raw project form input to a store-ready draft.

use crate::validation::rules::{violations, Constraints, Validatable, Violation};
use log::debug;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Constraint sets for the three project form fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputRules {
    pub title: Constraints,
    pub description: Constraints,
    pub people: Constraints,
}

impl Default for InputRules {
    fn default() -> Self {
        Self {
            title: Constraints::required(),
            description: Constraints::required().with_min_length(5),
            people: Constraints::required().with_range(1.0, 5.0),
        }
    }
}

/// Form field names, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectField {
    Title,
    Description,
    People,
}

impl ProjectField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::People => "people",
        }
    }
}

/// Rejected form submission.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftError {
    /// Failed checks per field, in form order.
    pub fields: Vec<(ProjectField, Vec<Violation>)>,
    /// Set when the headcount passed every constraint but is not a whole number.
    pub fractional_people: bool,
}

impl DraftError {
    pub fn failed_fields(&self) -> Vec<ProjectField> {
        let mut fields = self
            .fields
            .iter()
            .map(|(field, _)| *field)
            .collect::<Vec<_>>();
        if self.fractional_people && !fields.contains(&ProjectField::People) {
            fields.push(ProjectField::People);
        }
        fields
    }
}

impl Display for DraftError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid project input:")?;
        for (field, failed) in &self.fields {
            let reasons = failed
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, " {}: {reasons};", field.as_str())?;
        }
        if self.fractional_people {
            write!(f, " people: must be a whole number;")?;
        }
        Ok(())
    }
}

impl Error for DraftError {}

/// Validated project fields, ready for `ProjectState::add_project`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub people: u32,
}

impl ProjectDraft {
    /// Validates raw field text.
    ///
    /// The headcount is read numerically: blank reads as `0`, anything
    /// unparsable as NaN, so both fail a `min` rule. Text fields are kept
    /// verbatim.
    pub fn from_raw(
        title: &str,
        description: &str,
        people: &str,
        rules: &InputRules,
    ) -> Result<Self, DraftError> {
        let people_value = parse_headcount(people);
        let checks = [
            (
                ProjectField::Title,
                Validatable::new(title, rules.title.clone()),
            ),
            (
                ProjectField::Description,
                Validatable::new(description, rules.description.clone()),
            ),
            (
                ProjectField::People,
                Validatable::new(people_value, rules.people.clone()),
            ),
        ];

        let fields = checks
            .iter()
            .filter_map(|(field, input)| {
                let failed = violations(input);
                (!failed.is_empty()).then(|| (*field, failed))
            })
            .collect::<Vec<_>>();
        let people_ok = !fields.iter().any(|(field, _)| *field == ProjectField::People);
        let fractional_people = people_ok && !is_headcount(people_value);

        if !fields.is_empty() || fractional_people {
            let err = DraftError {
                fields,
                fractional_people,
            };
            debug!("event=draft_rejected module=validation status=error error={err}");
            return Err(err);
        }

        Ok(Self {
            title: title.to_string(),
            description: description.to_string(),
            people: people_value as u32,
        })
    }
}

fn parse_headcount(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

fn is_headcount(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0 && value >= 0.0 && value <= f64::from(u32::MAX)
}
