//! Bucket list view and drop target.
//!
//! # Responsibility
//! - Subscribe to the store and render the projects of one status bucket.
//! - Turn drops of a project id into a store move to this bucket.
//!
//! # Invariants
//! - The rendered items are rebuilt from scratch on every notification.
//! - Items keep the store's relative insertion order.

use crate::model::project::{Project, ProjectId, ProjectSnapshot, ProjectStatus};
use crate::state::project_state::ProjectState;
use crate::view::bind::bind;
use crate::view::component::{Component, MountSpec, Mounted, ViewResult};
use crate::view::drag::{accepts_transfer, transferred_project_id, DragTarget};
use crate::view::project_item::ProjectItemView;
use crate::view::surface::{DomEvent, EventKind, InsertPosition, RenderSurface};
use log::debug;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub const LIST_TEMPLATE_ID: &str = "project-list";
pub const DROPPABLE_CLASS: &str = "droppable";

/// Element id of the list section for `bucket`.
pub fn section_element_id(bucket: ProjectStatus) -> String {
    format!("{}-projects", bucket.as_str())
}

/// Element id of the `<ul>` holding the items of `bucket`.
pub fn list_element_id(bucket: ProjectStatus) -> String {
    format!("{}-projects-list", bucket.as_str())
}

pub struct ProjectListView {
    mounted: Mounted,
    store: Rc<ProjectState>,
    bucket: ProjectStatus,
    assigned: RefCell<Vec<Project>>,
    items: RefCell<Vec<Rc<ProjectItemView>>>,
    this: Weak<Self>,
}

impl ProjectListView {
    /// Appends the list for `bucket` to `host_id` and subscribes it to `store`.
    ///
    /// The list starts empty and fills on the next store notification.
    pub fn mount(
        surface: Rc<dyn RenderSurface>,
        store: Rc<ProjectState>,
        host_id: &str,
        bucket: ProjectStatus,
    ) -> ViewResult<Rc<Self>> {
        let section_id = section_element_id(bucket);
        let mounted = Mounted::attach(
            surface,
            MountSpec {
                template_id: LIST_TEMPLATE_ID,
                host_id,
                position: InsertPosition::BeforeEnd,
                element_id: Some(section_id.as_str()),
            },
        )?;
        let view = Rc::new_cyclic(|this| Self {
            mounted,
            store,
            bucket,
            assigned: RefCell::new(Vec::new()),
            items: RefCell::new(Vec::new()),
            this: this.clone(),
        });
        view.configure()?;
        view.render_content()?;
        Ok(view)
    }

    pub fn bucket(&self) -> ProjectStatus {
        self.bucket
    }

    /// Projects currently assigned to this bucket.
    pub fn assigned_projects(&self) -> Vec<Project> {
        self.assigned.borrow().clone()
    }

    /// Ids of the rendered items, top to bottom.
    pub fn rendered_ids(&self) -> Vec<ProjectId> {
        self.items
            .borrow()
            .iter()
            .map(|item| item.project().id().clone())
            .collect()
    }

    /// Replaces the assigned projects with this bucket's share of `snapshot`.
    pub fn apply_snapshot(&self, snapshot: &ProjectSnapshot) -> ViewResult<()> {
        *self.assigned.borrow_mut() = snapshot.by_status(self.bucket).cloned().collect();
        self.render_projects()
    }

    fn render_projects(&self) -> ViewResult<()> {
        let surface = self.mounted.surface();
        let list = self.mounted.child("ul")?;
        surface.clear_children(list)?;

        let list_id = list_element_id(self.bucket);
        let assigned = self.assigned.borrow().clone();
        let items = assigned
            .into_iter()
            .map(|project| ProjectItemView::mount(self.mounted.surface_handle(), &list_id, project))
            .collect::<ViewResult<Vec<_>>>()?;
        debug!(
            "event=list_rendered module=view bucket={} items={}",
            self.bucket,
            items.len()
        );
        *self.items.borrow_mut() = items;
        Ok(())
    }
}

impl Component for ProjectListView {
    fn mounted(&self) -> &Mounted {
        &self.mounted
    }

    fn configure(&self) -> ViewResult<()> {
        let surface = self.mounted.surface();
        let element = self.mounted.element();
        surface.add_event_listener(
            element,
            EventKind::DragOver,
            bind(&self.this, <Self as DragTarget>::drag_over),
        )?;
        surface.add_event_listener(
            element,
            EventKind::DragLeave,
            bind(&self.this, <Self as DragTarget>::drag_leave),
        )?;
        surface.add_event_listener(
            element,
            EventKind::Drop,
            bind(&self.this, <Self as DragTarget>::handle_drop),
        )?;

        let this = self.this.clone();
        self.store.add_listener(move |snapshot| {
            let Some(view) = this.upgrade() else {
                return Ok(());
            };
            view.apply_snapshot(snapshot).map_err(Into::into)
        });
        Ok(())
    }

    fn render_content(&self) -> ViewResult<()> {
        let surface = self.mounted.surface();
        let list = self.mounted.child("ul")?;
        surface.set_element_id(list, &list_element_id(self.bucket))?;
        surface.set_text(
            self.mounted.child("h2")?,
            &format!("{} PROJECTS", self.bucket.as_str().to_uppercase()),
        )?;
        Ok(())
    }
}

impl DragTarget for ProjectListView {
    fn drag_over(&self, event: &mut DomEvent) -> ViewResult<()> {
        if accepts_transfer(event.data_transfer()) {
            event.prevent_default();
            self.mounted
                .surface()
                .add_class(self.mounted.child("ul")?, DROPPABLE_CLASS)?;
        }
        Ok(())
    }

    fn drag_leave(&self, _event: &mut DomEvent) -> ViewResult<()> {
        self.mounted
            .surface()
            .remove_class(self.mounted.child("ul")?, DROPPABLE_CLASS)?;
        Ok(())
    }

    fn handle_drop(&self, event: &mut DomEvent) -> ViewResult<()> {
        event.prevent_default();
        if let Some(project_id) = transferred_project_id(event) {
            let outcome = self.store.move_project(&project_id, self.bucket);
            debug!(
                "event=drop module=view bucket={} project_id={} outcome={:?}",
                self.bucket, project_id, outcome
            );
        }
        self.mounted
            .surface()
            .remove_class(self.mounted.child("ul")?, DROPPABLE_CLASS)?;
        Ok(())
    }
}
