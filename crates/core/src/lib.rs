//! Kiosk Core - Shared types library.
//!
//! This crate provides common types used across all Kiosk components:
//! - `api` - Telegram Mini App backend binary
//! - `integration-tests` - Database-backed test suite
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and the verified
//!   [`Principal`](types::Principal) identity

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
