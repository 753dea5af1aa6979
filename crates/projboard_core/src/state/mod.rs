//! Observable application state.
//!
//! # Responsibility
//! - Hold the single project collection shared by all views.
//! - Deliver change notifications in registration order.
//!
//! # See also
//! - `view::project_list` for the main subscriber.

pub mod listener;
pub mod project_state;
