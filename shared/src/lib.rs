//! Pantry Tracker Shared Library
//!
//! This crate contains shared types, models, and the pure domain logic
//! (expiration status, grouping, reminders, recipe filters) used across
//! the backend and WASM modules.

pub mod errors;
pub mod expiration;
pub mod filters;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use expiration::{classify, group_by_expiration, reminder_schedule, ExpirationStatus, Severity};
pub use filters::{FilterTag, OnboardingStage, RecipeFilter, TagCategory};
pub use models::*;
pub use types::*;
