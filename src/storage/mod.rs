//! Storage layer for habitflow.
//!
//! `SQLite` persistence for habits and their daily completion entries.

mod database;
mod migrations;

pub use database::Database;
