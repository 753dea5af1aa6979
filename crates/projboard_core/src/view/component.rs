//! Shared view construction and the component capability.

use crate::state::listener::ListenerError;
use crate::view::surface::{InsertPosition, NodeId, RenderSurface, SurfaceError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub type ViewResult<T> = Result<T, ViewError>;

/// View construction and rendering errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    Surface(SurfaceError),
    /// The view was dropped while one of its handlers was still registered.
    Detached(&'static str),
}

impl Display for ViewError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Surface(err) => write!(f, "{err}"),
            Self::Detached(view) => write!(f, "{view} view is no longer alive"),
        }
    }
}

impl Error for ViewError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Surface(err) => Some(err),
            Self::Detached(_) => None,
        }
    }
}

impl From<SurfaceError> for ViewError {
    fn from(value: SurfaceError) -> Self {
        Self::Surface(value)
    }
}

impl From<ViewError> for ListenerError {
    fn from(value: ViewError) -> Self {
        ListenerError::new(value.to_string())
    }
}

/// Where and how a view's root element is created.
#[derive(Debug, Clone, Copy)]
pub struct MountSpec<'a> {
    pub template_id: &'a str,
    pub host_id: &'a str,
    pub position: InsertPosition,
    pub element_id: Option<&'a str>,
}

/// A template instance attached to its host element.
#[derive(Clone)]
pub struct Mounted {
    surface: Rc<dyn RenderSurface>,
    host: NodeId,
    element: NodeId,
}

impl Mounted {
    /// Instantiates the template, assigns the element id and attaches it.
    pub fn attach(surface: Rc<dyn RenderSurface>, spec: MountSpec<'_>) -> ViewResult<Self> {
        let host = surface.element_by_id_required(spec.host_id)?;
        let element = surface.instantiate_template(spec.template_id)?;
        if let Some(id) = spec.element_id {
            surface.set_element_id(element, id)?;
        }
        surface.insert(host, element, spec.position)?;
        Ok(Self {
            surface,
            host,
            element,
        })
    }

    pub fn surface(&self) -> &dyn RenderSurface {
        self.surface.as_ref()
    }

    /// Shared handle for mounting child views on the same surface.
    pub fn surface_handle(&self) -> Rc<dyn RenderSurface> {
        Rc::clone(&self.surface)
    }

    pub fn host(&self) -> NodeId {
        self.host
    }

    /// Root element of this instance.
    pub fn element(&self) -> NodeId {
        self.element
    }

    /// Required descendant of the root element.
    pub fn child(&self, selector: &str) -> ViewResult<NodeId> {
        Ok(self.surface.query_required(self.element, selector)?)
    }
}

/// Capability implemented by every view.
pub trait Component {
    fn mounted(&self) -> &Mounted;

    /// Registers event handlers and store subscriptions.
    fn configure(&self) -> ViewResult<()>;

    /// Writes static or model-derived content into the element.
    fn render_content(&self) -> ViewResult<()>;

    /// Root element of the mounted template instance.
    fn element(&self) -> NodeId {
        self.mounted().element()
    }
}
