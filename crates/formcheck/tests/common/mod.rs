//! Shared test utilities for formcheck integration tests.
//!
//! This module provides:
//! - Fake `FormatConverter` and `TextRegionSource` implementations
//! - Builder patterns for creating test configurations programmatically

pub mod builders;
pub mod fakes;

pub use builders::*;
pub use fakes::*;
