//! Core logic for the project board.
//! This crate owns the project store and every rule applied to it.

pub mod app;
pub mod config;
pub mod logging;
pub mod model;
pub mod state;
pub mod validation;
pub mod view;

pub use app::ProjectBoard;
pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings, LoggingError};
pub use model::project::{ParseStatusError, Project, ProjectId, ProjectSnapshot, ProjectStatus};
pub use state::listener::{ListenerError, ListenerResult, NotifyReport};
pub use state::project_state::{MoveOutcome, ProjectState};
pub use validation::project_input::{DraftError, InputRules, ProjectDraft, ProjectField};
pub use validation::rules::{validate, Constraints, InputValue, Validatable, Violation};
pub use view::memory::MemoryDocument;
pub use view::surface::{DataTransfer, DomEvent, EventKind, RenderSurface, TRANSFER_MEDIA_TYPE};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
