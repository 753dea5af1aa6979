//! Rendering surface contract and event model.
//!
//! # Responsibility
//! - Describe the document operations views need, independent of any host.
//! - Carry submit and drag events, including the drag transfer payload.
//!
//! # Invariants
//! - Instantiated templates are detached until inserted.
//! - Handlers are invoked without any surface borrow held, so they may
//!   mutate the surface.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Media type of the drag payload. The payload is a project id.
pub const TRANSFER_MEDIA_TYPE: &str = "text/plain";

/// Handle to one element of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Where an element is inserted relative to its host's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    AfterBegin,
    BeforeEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Submit,
    DragStart,
    DragEnd,
    DragOver,
    DragLeave,
    Drop,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::DragStart => "dragstart",
            Self::DragEnd => "dragend",
            Self::DragOver => "dragover",
            Self::DragLeave => "dragleave",
            Self::Drop => "drop",
        }
    }
}

/// Operations a drag source allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropEffect {
    Copy,
    Move,
    Link,
}

/// Data carried by one drag operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTransfer {
    entries: Vec<(String, String)>,
    effect_allowed: Option<DropEffect>,
}

impl DataTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `data` under `format`, replacing any previous value.
    pub fn set_data(&mut self, format: &str, data: &str) {
        match self.entries.iter_mut().find(|(kind, _)| kind == format) {
            Some(entry) => entry.1 = data.to_string(),
            None => self.entries.push((format.to_string(), data.to_string())),
        }
    }

    /// Returns the value for `format`, or an empty string.
    pub fn get_data(&self, format: &str) -> String {
        self.entries
            .iter()
            .find(|(kind, _)| kind == format)
            .map(|(_, data)| data.clone())
            .unwrap_or_default()
    }

    /// Declared formats, in the order they were set.
    pub fn types(&self) -> Vec<&str> {
        self.entries.iter().map(|(kind, _)| kind.as_str()).collect()
    }

    pub fn effect_allowed(&self) -> Option<DropEffect> {
        self.effect_allowed
    }

    pub fn set_effect_allowed(&mut self, effect: DropEffect) {
        self.effect_allowed = Some(effect);
    }
}

/// Event delivered to handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomEvent {
    kind: EventKind,
    data_transfer: Option<DataTransfer>,
    default_prevented: bool,
}

impl DomEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            data_transfer: None,
            default_prevented: false,
        }
    }

    /// Drag event carrying `transfer`.
    pub fn drag(kind: EventKind, transfer: DataTransfer) -> Self {
        Self {
            kind,
            data_transfer: Some(transfer),
            default_prevented: false,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn data_transfer(&self) -> Option<&DataTransfer> {
        self.data_transfer.as_ref()
    }

    pub fn data_transfer_mut(&mut self) -> Option<&mut DataTransfer> {
        self.data_transfer.as_mut()
    }

    /// Transfer of this event, created empty when absent.
    pub fn data_transfer_or_default(&mut self) -> &mut DataTransfer {
        self.data_transfer.get_or_insert_with(DataTransfer::default)
    }

    pub fn into_data_transfer(self) -> Option<DataTransfer> {
        self.data_transfer
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

pub type EventHandler = Rc<dyn Fn(&mut DomEvent)>;

pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Document operation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    TemplateNotFound(String),
    ElementNotFound(String),
    UnknownNode(NodeId),
    /// `query` found nothing for a selector the caller requires.
    MissingChild { selector: String },
}

impl Display for SurfaceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TemplateNotFound(id) => write!(f, "template not found: {id}"),
            Self::ElementNotFound(id) => write!(f, "element not found: #{id}"),
            Self::UnknownNode(node) => write!(f, "unknown node handle: {}", node.0),
            Self::MissingChild { selector } => {
                write!(f, "no element matches selector `{selector}`")
            }
        }
    }
}

impl Error for SurfaceError {}

/// Host document abstraction.
///
/// Selectors are either `#id` or a bare tag name.
pub trait RenderSurface {
    /// Finds an element attached to the document.
    fn element_by_id(&self, id: &str) -> Option<NodeId>;

    /// Deep-copies a template's content root, detached.
    fn instantiate_template(&self, template_id: &str) -> SurfaceResult<NodeId>;

    fn insert(&self, host: NodeId, node: NodeId, position: InsertPosition) -> SurfaceResult<()>;

    fn set_element_id(&self, node: NodeId, id: &str) -> SurfaceResult<()>;

    /// First descendant of `root` matching `selector`, depth-first.
    fn query(&self, root: NodeId, selector: &str) -> Option<NodeId>;

    fn set_text(&self, node: NodeId, text: &str) -> SurfaceResult<()>;

    /// Detaches every child of `node`.
    fn clear_children(&self, node: NodeId) -> SurfaceResult<()>;

    fn add_class(&self, node: NodeId, class: &str) -> SurfaceResult<()>;

    fn remove_class(&self, node: NodeId, class: &str) -> SurfaceResult<()>;

    fn input_value(&self, node: NodeId) -> SurfaceResult<String>;

    fn set_input_value(&self, node: NodeId, value: &str) -> SurfaceResult<()>;

    fn add_event_listener(
        &self,
        node: NodeId,
        kind: EventKind,
        handler: EventHandler,
    ) -> SurfaceResult<()>;

    /// Blocking user-facing message.
    fn alert(&self, message: &str);

    /// Required variant of `query`.
    fn query_required(&self, root: NodeId, selector: &str) -> SurfaceResult<NodeId> {
        self.query(root, selector)
            .ok_or_else(|| SurfaceError::MissingChild {
                selector: selector.to_string(),
            })
    }

    /// Required variant of `element_by_id`.
    fn element_by_id_required(&self, id: &str) -> SurfaceResult<NodeId> {
        self.element_by_id(id)
            .ok_or_else(|| SurfaceError::ElementNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{DataTransfer, DomEvent, DropEffect, EventKind, TRANSFER_MEDIA_TYPE};

    #[test]
    fn data_transfer_replaces_and_orders_types() {
        let mut transfer = DataTransfer::new();
        transfer.set_data(TRANSFER_MEDIA_TYPE, "a");
        transfer.set_data("text/uri-list", "b");
        transfer.set_data(TRANSFER_MEDIA_TYPE, "c");

        assert_eq!(transfer.types(), vec![TRANSFER_MEDIA_TYPE, "text/uri-list"]);
        assert_eq!(transfer.get_data(TRANSFER_MEDIA_TYPE), "c");
        assert_eq!(transfer.get_data("application/json"), "");
    }

    #[test]
    fn drag_event_exposes_mutable_transfer() {
        let mut event = DomEvent::drag(EventKind::DragStart, DataTransfer::new());
        event
            .data_transfer_mut()
            .expect("drag event carries a transfer")
            .set_effect_allowed(DropEffect::Move);
        event.prevent_default();

        assert!(event.default_prevented());
        assert_eq!(
            event.data_transfer().and_then(DataTransfer::effect_allowed),
            Some(DropEffect::Move)
        );
    }
}
