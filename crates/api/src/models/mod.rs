//! Domain models for the API.

pub mod user;

pub use user::{CurrentUser, User, UserResponse};
