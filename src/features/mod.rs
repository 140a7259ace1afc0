//! Feature implementations for habitflow.
//!
//! - Habits and completions
//! - Statistics
//! - Shell integration

pub mod habits;
pub mod shell;
pub mod stats;
