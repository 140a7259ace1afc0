//! habitflow - A habit tracker for the command line
//!
//! This crate records daily habit completions in a local `SQLite` database
//! and derives streaks, completion rates, weekly progress and calendar
//! aggregates from them.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod features;
pub mod output;
pub mod storage;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::HabitError;
pub use features::habits::HabitStore;
