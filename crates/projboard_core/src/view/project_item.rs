//! Single project entry inside a list bucket.

use crate::model::project::Project;
use crate::view::bind::bind;
use crate::view::component::{Component, MountSpec, Mounted, ViewResult};
use crate::view::drag::DragSource;
use crate::view::surface::{
    DomEvent, DropEffect, EventKind, InsertPosition, RenderSurface, TRANSFER_MEDIA_TYPE,
};
use log::debug;
use std::rc::{Rc, Weak};

pub const ITEM_TEMPLATE_ID: &str = "single-project";

/// Draggable rendering of one project. Its element id is the project id.
pub struct ProjectItemView {
    mounted: Mounted,
    project: Project,
    this: Weak<Self>,
}

impl ProjectItemView {
    /// Renders `project` at the end of the list element `host_id`.
    pub fn mount(
        surface: Rc<dyn RenderSurface>,
        host_id: &str,
        project: Project,
    ) -> ViewResult<Rc<Self>> {
        let mounted = Mounted::attach(
            surface,
            MountSpec {
                template_id: ITEM_TEMPLATE_ID,
                host_id,
                position: InsertPosition::BeforeEnd,
                element_id: Some(project.id().as_str()),
            },
        )?;
        let view = Rc::new_cyclic(|this| Self {
            mounted,
            project,
            this: this.clone(),
        });
        view.configure()?;
        view.render_content()?;
        Ok(view)
    }

    pub fn project(&self) -> &Project {
        &self.project
    }
}

impl Component for ProjectItemView {
    fn mounted(&self) -> &Mounted {
        &self.mounted
    }

    fn configure(&self) -> ViewResult<()> {
        let surface = self.mounted.surface();
        let element = self.mounted.element();
        surface.add_event_listener(
            element,
            EventKind::DragStart,
            bind(&self.this, <Self as DragSource>::drag_start),
        )?;
        surface.add_event_listener(
            element,
            EventKind::DragEnd,
            bind(&self.this, <Self as DragSource>::drag_end),
        )?;
        Ok(())
    }

    fn render_content(&self) -> ViewResult<()> {
        let surface = self.mounted.surface();
        surface.set_text(self.mounted.child("h2")?, self.project.title())?;
        surface.set_text(
            self.mounted.child("h3")?,
            &format!("{} assigned", self.project.persons_label()),
        )?;
        surface.set_text(self.mounted.child("p")?, self.project.description())?;
        Ok(())
    }
}

impl DragSource for ProjectItemView {
    fn drag_start(&self, event: &mut DomEvent) -> ViewResult<()> {
        let transfer = event.data_transfer_or_default();
        transfer.set_data(TRANSFER_MEDIA_TYPE, self.project.id().as_str());
        transfer.set_effect_allowed(DropEffect::Move);
        debug!(
            "event=drag_start module=view project_id={}",
            self.project.id()
        );
        Ok(())
    }

    fn drag_end(&self, _event: &mut DomEvent) -> ViewResult<()> {
        debug!("event=drag_end module=view project_id={}", self.project.id());
        Ok(())
    }
}
