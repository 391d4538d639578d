//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! Manual mocks instead of a mocking framework:
//! - Several ports take slices and `&str` parameters, which macro mocks handle poorly
//! - The property store needs real filter/sort/page behavior, not canned answers
//! - We control exactly what they return without macro magic

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
