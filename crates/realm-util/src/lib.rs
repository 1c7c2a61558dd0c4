//! Shared utilities for realm.
//!
//! This crate provides the cross-cutting error type used by all other realm
//! crates, so that metadata loading, rule execution and configuration graph
//! failures are reported through one diagnostic surface, plus the status-line
//! helpers the command-line front end prints with.

pub mod errors;
pub mod status;
