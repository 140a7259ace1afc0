//! Core utilities for habitflow.
//!
//! This module provides shared helpers used across features.

mod datetime;

pub use datetime::{days_before, parse_day, week_start_sunday};
