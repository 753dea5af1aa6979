//! Shared observable project store.
//!
//! # Responsibility
//! - Own the canonical ordered project sequence.
//! - Fan out an immutable snapshot to subscribed views after every visible change.
//!
//! # Invariants
//! - Insertion order is creation order; moving a project never reorders it.
//! - No two projects share an id.
//! - Listeners only ever see `ProjectSnapshot` copies, never the live sequence.
//! - A move that does not change a status fires no notification.

use crate::model::project::{Project, ProjectId, ProjectSnapshot, ProjectStatus};
use crate::state::listener::{ListenerRegistry, ListenerResult, NotifyReport};
use log::{debug, info};
use std::cell::RefCell;
use std::rc::Rc;

/// Result of a `move_project` call. None of these is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Status changed and listeners were notified.
    Moved,
    /// Project already had the requested status.
    Unchanged,
    /// No project with the given id.
    NotFound,
}

/// Single store instance shared by every view of one board.
///
/// Single-threaded: views hold it behind `Rc` and all calls run to completion
/// before returning.
#[derive(Default)]
pub struct ProjectState {
    projects: RefCell<Vec<Project>>,
    listeners: ListenerRegistry<ProjectSnapshot>,
}

impl ProjectState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store ready to be handed to views.
    pub fn shared() -> Rc<Self> {
        Rc::new(Self::new())
    }

    /// Appends a new active project and notifies listeners.
    ///
    /// # Contract
    /// - Inputs are expected to be validated by the caller.
    /// - Returns the generated id.
    pub fn add_project(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
        people: u32,
    ) -> ProjectId {
        let project = Project::new(title, description, people);
        let id = project.id().clone();
        let total = {
            let mut projects = self.projects.borrow_mut();
            projects.push(project);
            projects.len()
        };
        info!(
            "event=project_added module=state status=ok project_id={} total={}",
            id, total
        );
        self.update_listeners();
        id
    }

    /// Moves one project to `status`.
    ///
    /// Unknown ids and same-status moves are silent no-ops without
    /// notification.
    pub fn move_project(&self, project_id: &str, status: ProjectStatus) -> MoveOutcome {
        let outcome = {
            let mut projects = self.projects.borrow_mut();
            match projects.iter_mut().find(|project| project.id() == project_id) {
                None => MoveOutcome::NotFound,
                Some(project) if project.status() == status => MoveOutcome::Unchanged,
                Some(project) => {
                    project.set_status(status);
                    MoveOutcome::Moved
                }
            }
        };

        match outcome {
            MoveOutcome::Moved => {
                info!(
                    "event=project_moved module=state status=ok project_id={} to={}",
                    project_id, status
                );
                self.update_listeners();
            }
            MoveOutcome::Unchanged => debug!(
                "event=project_moved module=state status=unchanged project_id={} to={}",
                project_id, status
            ),
            MoveOutcome::NotFound => debug!(
                "event=project_moved module=state status=not_found project_id={} to={}",
                project_id, status
            ),
        }
        outcome
    }

    /// Subscribes to future changes.
    ///
    /// The listener is not invoked with the current state.
    pub fn add_listener<F>(&self, listener: F)
    where
        F: Fn(&ProjectSnapshot) -> ListenerResult + 'static,
    {
        self.listeners.register(listener);
        debug!(
            "event=listener_added module=state status=ok count={}",
            self.listeners.len()
        );
    }

    /// Copies the current sequence.
    pub fn snapshot(&self) -> ProjectSnapshot {
        ProjectSnapshot::from_slice(&self.projects.borrow())
    }

    pub fn len(&self) -> usize {
        self.projects.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.borrow().is_empty()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn update_listeners(&self) -> NotifyReport {
        // Each listener gets a fresh copy; a re-entrant change made by an
        // earlier listener is visible to the later ones.
        self.listeners.notify(|| self.snapshot())
    }
}
