//! Core types for the Sweetshop client.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod money;
pub mod role;
pub mod weight;

pub use id::*;
pub use money::Rupees;
pub use role::Role;
pub use weight::{Weight, WeightError};
