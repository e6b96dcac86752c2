//! Sweetshop Core - Shared types library.
//!
//! This crate provides common types used across the Sweetshop client
//! components:
//! - `client` - Storefront client library (API, cart, pricing, checkout)
//! - `cli` - Command-line storefront surface
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This
//! keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, weights, and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
