//! Project domain model.
//!
//! # Responsibility
//! - Define the canonical project record rendered by both list buckets.
//! - Provide the immutable snapshot shape handed to store listeners.
//!
//! # Invariants
//! - `id` is generated once and never reused for another project.
//! - Only `status` changes after creation, and only through the store.
//! - Lookup equality is by `id` only.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque project identifier.
///
/// Carried as the drag transfer payload, so it is kept in string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    /// Generates a fresh collision-resistant identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ProjectId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for ProjectId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ProjectId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Bucket a project is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Newly added, still being worked on.
    Active,
    /// Dropped onto the finished list.
    Finished,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 2] = [ProjectStatus::Active, ProjectStatus::Finished];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Finished => "finished",
        }
    }
}

impl Display for ProjectStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a status label is neither `active` nor `finished`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError(String);

impl Display for ParseStatusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported project status `{}`; expected active|finished",
            self.0
        )
    }
}

impl Error for ParseStatusError {}

impl FromStr for ProjectStatus {
    type Err = ParseStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "finished" => Ok(Self::Finished),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// Canonical project record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    title: String,
    description: String,
    people: u32,
    status: ProjectStatus,
}

impl Project {
    /// Creates an active project with a generated id.
    pub(crate) fn new(title: impl Into<String>, description: impl Into<String>, people: u32) -> Self {
        Self {
            id: ProjectId::generate(),
            title: title.into(),
            description: description.into(),
            people,
            status: ProjectStatus::Active,
        }
    }

    pub fn id(&self) -> &ProjectId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Number of people assigned.
    pub fn people(&self) -> u32 {
        self.people
    }

    pub fn status(&self) -> ProjectStatus {
        self.status
    }

    /// Pluralized headcount label: `1 person`, `3 persons`.
    pub fn persons_label(&self) -> String {
        if self.people == 1 {
            "1 person".to_string()
        } else {
            format!("{} persons", self.people)
        }
    }

    pub(crate) fn set_status(&mut self, status: ProjectStatus) {
        self.status = status;
    }
}

/// Immutable copy of the store sequence at one point in time.
///
/// Cloning shares the same backing slice.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectSnapshot {
    projects: Rc<[Project]>,
}

impl ProjectSnapshot {
    pub(crate) fn from_slice(projects: &[Project]) -> Self {
        Self {
            projects: Rc::from(projects),
        }
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Project> {
        self.projects.iter()
    }

    pub fn as_slice(&self) -> &[Project] {
        &self.projects
    }

    pub fn find(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }

    /// Projects in one bucket, in insertion order.
    pub fn by_status(&self, status: ProjectStatus) -> impl Iterator<Item = &Project> + '_ {
        self.projects
            .iter()
            .filter(move |project| project.status == status)
    }
}

impl<'a> IntoIterator for &'a ProjectSnapshot {
    type Item = &'a Project;
    type IntoIter = std::slice::Iter<'a, Project>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
