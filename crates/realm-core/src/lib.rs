//! Core data types for realm.
//!
//! This crate defines the metadata model that the realization engine works
//! on: component and module identifiers, attributes, capabilities, version
//! constraints, dependency declarations, variants and their realized
//! snapshots, legacy configurations, plus loading of component metadata
//! documents and of the `Realm.toml` configuration.
//!
//! This crate is intentionally free of rule execution and graph traversal.

pub mod attributes;
pub mod capability;
pub mod config;
pub mod configuration;
pub mod dependency;
pub mod identifier;
pub mod metadata;
pub mod variant;
