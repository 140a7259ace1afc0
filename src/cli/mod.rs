//! Command-line interface for habitflow.

pub mod args;
pub mod commands;
