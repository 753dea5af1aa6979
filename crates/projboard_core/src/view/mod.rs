//! Views over the project store.
//!
//! # Responsibility
//! - Render the form and the two bucket lists onto a `RenderSurface`.
//! - Translate submit and drag events into store calls.
//!
//! # Invariants
//! - Views hold the store by shared reference and never mutate projects
//!   directly.
//! - Event handlers are bound to their view through a weak handle.

pub mod bind;
pub mod component;
pub mod drag;
pub mod memory;
pub mod project_input;
pub mod project_item;
pub mod project_list;
pub mod surface;
