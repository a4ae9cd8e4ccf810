//! # rollbook-client
//!
//! HTTP client for a running Rollbook server, plus the table rendering
//! used by the `rollbook-client` binary.

pub mod client;
pub mod render;

pub use client::{
    ClientError, DEFAULT_URL, Health, NewStudent, RollbookClient, SeedSummary, Student,
    StudentUpdate,
};
