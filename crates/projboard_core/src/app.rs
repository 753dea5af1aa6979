//! Page bootstrap: one form and two bucket lists over one shared store.

use crate::config::AppConfig;
use crate::model::project::ProjectStatus;
use crate::state::project_state::ProjectState;
use crate::view::component::ViewResult;
use crate::view::project_input::ProjectInputView;
use crate::view::project_list::ProjectListView;
use crate::view::surface::RenderSurface;
use log::info;
use std::rc::Rc;

/// Mounted page. Dropping it makes every registered handler inert.
pub struct ProjectBoard {
    store: Rc<ProjectState>,
    input: Rc<ProjectInputView>,
    active: Rc<ProjectListView>,
    finished: Rc<ProjectListView>,
}

impl ProjectBoard {
    /// Attaches the form first, then the active and finished lists.
    pub fn mount(
        surface: Rc<dyn RenderSurface>,
        store: Rc<ProjectState>,
        config: &AppConfig,
    ) -> ViewResult<Self> {
        let host = config.host_element_id.as_str();
        let input = ProjectInputView::mount(
            Rc::clone(&surface),
            Rc::clone(&store),
            host,
            config.rules.clone(),
        )?;
        let active = ProjectListView::mount(
            Rc::clone(&surface),
            Rc::clone(&store),
            host,
            ProjectStatus::Active,
        )?;
        let finished =
            ProjectListView::mount(surface, Rc::clone(&store), host, ProjectStatus::Finished)?;
        info!("event=board_mounted module=app status=ok host={host}");

        Ok(Self {
            store,
            input,
            active,
            finished,
        })
    }

    pub fn store(&self) -> &Rc<ProjectState> {
        &self.store
    }

    pub fn input(&self) -> &ProjectInputView {
        self.input.as_ref()
    }

    /// List view rendering `bucket`.
    pub fn list(&self, bucket: ProjectStatus) -> &ProjectListView {
        match bucket {
            ProjectStatus::Active => self.active.as_ref(),
            ProjectStatus::Finished => self.finished.as_ref(),
        }
    }
}
