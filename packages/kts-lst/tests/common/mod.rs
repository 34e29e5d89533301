//! Common test utilities for kts-lst
//!
//! This module provides shared fixtures, assertions, and builders
//! for integration tests.

#![allow(dead_code)]

mod assertions;
mod builders;
mod fixtures;

// Re-export all utilities
pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
