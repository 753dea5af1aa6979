//! Receiver-fixed event handlers.
//!
//! A view keeps a `Weak` handle to itself; `bind` closes over it so the
//! registered handler always calls the method on that same instance, and
//! turns into a no-op once the view is gone.

use crate::view::component::ViewResult;
use crate::view::surface::{DomEvent, EventHandler};
use log::error;
use std::rc::{Rc, Weak};

pub type Method<T> = fn(&T, &mut DomEvent) -> ViewResult<()>;

/// Binds `method` to the instance behind `this`.
///
/// Errors returned by the method are logged; handlers have nowhere to
/// propagate them.
pub fn bind<T: 'static>(this: &Weak<T>, method: Method<T>) -> EventHandler {
    let this = this.clone();
    Rc::new(move |event: &mut DomEvent| {
        let Some(target) = this.upgrade() else {
            return;
        };
        if let Err(err) = method(&target, event) {
            error!(
                "event=handler_failed module=view status=error kind={} error={}",
                event.kind().as_str(),
                err
            );
        }
    })
}
