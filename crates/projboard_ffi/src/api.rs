//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the project store to a non-DOM UI shell via FRB sync calls.
//! - Apply the same form validation as the DOM form view.
//!
//! # Invariants
//! - Exported functions never panic across the FFI boundary.
//! - One store per calling thread; FRB sync calls run on the UI isolate thread.

use board_store::{with_store, REVISION};
use log::info;
use projboard_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    InputRules, LogSettings, MoveOutcome, Project, ProjectDraft, ProjectStatus,
};
use std::path::PathBuf;

mod board_store {
    use projboard_core::ProjectState;
    use std::cell::Cell;
    use std::rc::Rc;

    thread_local! {
        static STORE: Rc<ProjectState> = new_store();
        pub(super) static REVISION: Cell<u64> = const { Cell::new(0) };
    }

    fn new_store() -> Rc<ProjectState> {
        let store = ProjectState::shared();
        store.add_listener(|_| {
            REVISION.with(|revision| revision.set(revision.get() + 1));
            Ok(())
        });
        store
    }

    pub(super) fn with_store<T>(f: impl FnOnce(&ProjectState) -> T) -> T {
        STORE.with(|store| f(store))
    }
}

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Idempotent for identical arguments; conflicting re-init returns an error.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    if log_dir.trim().is_empty() {
        return "log dir cannot be empty".to_string();
    }
    let settings = LogSettings {
        level,
        dir: Some(PathBuf::from(log_dir)),
    };
    match init_logging_inner(&settings) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Project row for list rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectListItem {
    pub project_id: String,
    pub title: String,
    pub description: String,
    pub people: u32,
    /// Pre-pluralized headcount, e.g. `1 person`.
    pub persons_label: String,
    /// `active|finished`.
    pub status: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectActionResponse {
    pub ok: bool,
    pub project_id: Option<String>,
    pub message: String,
}

impl ProjectActionResponse {
    fn success(message: impl Into<String>, project_id: Option<String>) -> Self {
        Self {
            ok: true,
            project_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            project_id: None,
            message: message.into(),
        }
    }
}

/// Validates raw form text and adds an active project.
#[flutter_rust_bridge::frb(sync)]
pub fn project_add(title: String, description: String, people: String) -> ProjectActionResponse {
    match ProjectDraft::from_raw(&title, &description, &people, &InputRules::default()) {
        Ok(draft) => {
            let id = with_store(|store| {
                store.add_project(draft.title, draft.description, draft.people)
            });
            ProjectActionResponse::success("Project added.", Some(id.to_string()))
        }
        Err(err) => ProjectActionResponse::failure(format!("project_add failed: {err}")),
    }
}

/// Moves a project to `status` (`active|finished`).
///
/// Unknown ids and same-status moves succeed without effect.
#[flutter_rust_bridge::frb(sync)]
pub fn project_move(project_id: String, status: String) -> ProjectActionResponse {
    let status = match status.parse::<ProjectStatus>() {
        Ok(status) => status,
        Err(err) => return ProjectActionResponse::failure(format!("project_move failed: {err}")),
    };
    let outcome = with_store(|store| store.move_project(project_id.trim(), status));
    info!(
        "event=ffi_project_move module=ffi status=ok outcome={:?}",
        outcome
    );
    let message = match outcome {
        MoveOutcome::Moved => "Project moved.",
        MoveOutcome::Unchanged => "Project already has that status.",
        MoveOutcome::NotFound => "No matching project.",
    };
    ProjectActionResponse::success(message, Some(project_id))
}

/// Lists projects in insertion order, optionally limited to one bucket.
///
/// An unrecognized `status` yields an empty list.
#[flutter_rust_bridge::frb(sync)]
pub fn project_list(status: Option<String>) -> Vec<ProjectListItem> {
    let filter = match status.as_deref().map(str::parse::<ProjectStatus>) {
        None => None,
        Some(Ok(status)) => Some(status),
        Some(Err(_)) => return Vec::new(),
    };
    let snapshot = with_store(|store| store.snapshot());
    snapshot
        .iter()
        .filter(|project| filter.map_or(true, |status| project.status() == status))
        .map(to_list_item)
        .collect()
}

/// Change counter; increments once per store notification.
#[flutter_rust_bridge::frb(sync)]
pub fn project_revision() -> u64 {
    // Touch the store so its listener is registered before the first read.
    with_store(|_| ());
    REVISION.with(|revision| revision.get())
}

fn to_list_item(project: &Project) -> ProjectListItem {
    ProjectListItem {
        project_id: project.id().to_string(),
        title: project.title().to_string(),
        description: project.description().to_string(),
        people: project.people(),
        persons_label: project.persons_label(),
        status: project.status().as_str().to_string(),
    }
}
