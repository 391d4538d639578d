//! Domain layer
//!
//! Contains pure business logic with no external dependencies.
//! - `entities`: Domain models representing core business concepts
//! - `ports`: Trait definitions for external dependencies
//! - `type_registry`: Name to constructor mapping for polymorphic models

pub mod entities;
pub mod ports;
pub mod type_registry;
