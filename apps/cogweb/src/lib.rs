//! # cogweb
//!
//! Library half of the cogweb binary: the HTTP API, the CLI and the
//! configuration they share. Split out so integration tests can drive the
//! router directly.

pub mod api;
pub mod cli;
pub mod config;
pub mod store;
