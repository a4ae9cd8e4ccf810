//! # Rollbook
//!
//! The application layer for the Rollbook student record store: HTTP API,
//! admin CLI and configuration. The record engine itself lives in
//! `rollbook-core`.

pub mod api;
pub mod cli;
pub mod config;
