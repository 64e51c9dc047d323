//! Domain model for the to-do list.
//!
//! # Responsibility
//! - Define the canonical task record shared by core and UI projections.
//! - Define the persisted snapshot shape of the whole task list.
//!
//! # Invariants
//! - Every task is identified by a stable, non-empty `TaskId`.
//! - Task ids are unique within one task list.

pub mod snapshot;
pub mod task;
