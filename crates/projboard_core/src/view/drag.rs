//! Drag-and-drop capabilities.
//!
//! The transfer payload is a single `text/plain` entry holding the dragged
//! project id. Targets only accept transfers whose first declared type is
//! that media type.

use crate::view::component::ViewResult;
use crate::view::surface::{DataTransfer, DomEvent, TRANSFER_MEDIA_TYPE};

/// Element that can be picked up.
pub trait DragSource {
    fn drag_start(&self, event: &mut DomEvent) -> ViewResult<()>;
    fn drag_end(&self, event: &mut DomEvent) -> ViewResult<()>;
}

/// Element that accepts drops.
pub trait DragTarget {
    fn drag_over(&self, event: &mut DomEvent) -> ViewResult<()>;
    fn drag_leave(&self, event: &mut DomEvent) -> ViewResult<()>;
    fn handle_drop(&self, event: &mut DomEvent) -> ViewResult<()>;
}

/// Whether `transfer` carries a project id payload.
pub fn accepts_transfer(transfer: Option<&DataTransfer>) -> bool {
    transfer
        .and_then(|transfer| transfer.types().first().copied())
        .is_some_and(|kind| kind == TRANSFER_MEDIA_TYPE)
}

/// Project id carried by a drop event, if any.
pub fn transferred_project_id(event: &DomEvent) -> Option<String> {
    let id = event.data_transfer()?.get_data(TRANSFER_MEDIA_TYPE);
    (!id.is_empty()).then_some(id)
}
