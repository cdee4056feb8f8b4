//! Request handlers.
//!
//! Handlers validate the request, delegate to the generator and the store
//! adapters, and map failures through [`crate::error::AppError`]. No
//! business logic lives here beyond that delegation.

pub mod auth;
pub mod flashcards;
pub mod health;
