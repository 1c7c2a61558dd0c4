//! Metadata realization engine: ordered variant metadata rules, dependency
//! normalization, variant realization and configuration inheritance closures.
//!
//! Everything here is synchronous and keeps no shared mutable state, so
//! distinct components and configurations can be processed from independent
//! threads.

pub mod cache;
pub mod convert;
pub mod hierarchy;
pub mod platform;
pub mod realize;
pub mod rules;
