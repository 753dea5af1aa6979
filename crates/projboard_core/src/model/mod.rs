//! Domain model for the project board.
//!
//! # Responsibility
//! - Define the project record and its two-state status lifecycle.
//! - Define the immutable snapshot shape consumed by views.
//!
//! # Invariants
//! - Every project is identified by a stable `ProjectId`.
//! - Projects are never deleted; status moves between `Active` and `Finished`.

pub mod project;
