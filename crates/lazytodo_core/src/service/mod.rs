//! Core use-case services.
//!
//! # Responsibility
//! - Own the canonical task list and expose its mutation operations.
//! - Keep UI/FFI layers decoupled from snapshot encoding and storage details.

pub mod confirm;
pub mod task_list;
