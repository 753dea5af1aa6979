//! Project form view.

use crate::model::project::ProjectId;
use crate::state::project_state::ProjectState;
use crate::validation::project_input::{InputRules, ProjectDraft};
use crate::view::bind::bind;
use crate::view::component::{Component, MountSpec, Mounted, ViewResult};
use crate::view::surface::{DomEvent, EventKind, InsertPosition, NodeId, RenderSurface};
use log::info;
use std::rc::{Rc, Weak};

pub const INPUT_TEMPLATE_ID: &str = "project-input";
pub const FORM_ELEMENT_ID: &str = "user-input";
pub const INVALID_INPUT_ALERT: &str = "Invalid input try again!";

/// Outcome of one form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Added(ProjectId),
    Rejected,
}

/// Form with title, description and people fields.
pub struct ProjectInputView {
    mounted: Mounted,
    store: Rc<ProjectState>,
    rules: InputRules,
    title: NodeId,
    description: NodeId,
    people: NodeId,
    this: Weak<Self>,
}

impl ProjectInputView {
    /// Prepends the form to `host_id`.
    pub fn mount(
        surface: Rc<dyn RenderSurface>,
        store: Rc<ProjectState>,
        host_id: &str,
        rules: InputRules,
    ) -> ViewResult<Rc<Self>> {
        let mounted = Mounted::attach(
            surface,
            MountSpec {
                template_id: INPUT_TEMPLATE_ID,
                host_id,
                position: InsertPosition::AfterBegin,
                element_id: Some(FORM_ELEMENT_ID),
            },
        )?;
        let title = mounted.child("#title")?;
        let description = mounted.child("#description")?;
        let people = mounted.child("#people")?;

        let view = Rc::new_cyclic(|this| Self {
            mounted,
            store,
            rules,
            title,
            description,
            people,
            this: this.clone(),
        });
        view.configure()?;
        view.render_content()?;
        Ok(view)
    }

    /// Reads, validates and submits the current field values.
    ///
    /// Invalid input raises the alert and leaves the fields untouched.
    pub fn submit(&self) -> ViewResult<SubmitOutcome> {
        let surface = self.mounted.surface();
        let title = surface.input_value(self.title)?;
        let description = surface.input_value(self.description)?;
        let people = surface.input_value(self.people)?;

        match ProjectDraft::from_raw(&title, &description, &people, &self.rules) {
            Ok(draft) => {
                let id = self
                    .store
                    .add_project(draft.title, draft.description, draft.people);
                self.clear_inputs()?;
                Ok(SubmitOutcome::Added(id))
            }
            Err(err) => {
                info!(
                    "event=form_rejected module=view status=error fields={:?}",
                    err.failed_fields()
                );
                surface.alert(INVALID_INPUT_ALERT);
                Ok(SubmitOutcome::Rejected)
            }
        }
    }

    fn submit_handler(&self, event: &mut DomEvent) -> ViewResult<()> {
        event.prevent_default();
        self.submit().map(|_| ())
    }

    fn clear_inputs(&self) -> ViewResult<()> {
        let surface = self.mounted.surface();
        for field in [self.title, self.description, self.people] {
            surface.set_input_value(field, "")?;
        }
        Ok(())
    }
}

impl Component for ProjectInputView {
    fn mounted(&self) -> &Mounted {
        &self.mounted
    }

    fn configure(&self) -> ViewResult<()> {
        self.mounted.surface().add_event_listener(
            self.mounted.element(),
            EventKind::Submit,
            bind(&self.this, Self::submit_handler),
        )?;
        Ok(())
    }

    fn render_content(&self) -> ViewResult<()> {
        Ok(())
    }
}
