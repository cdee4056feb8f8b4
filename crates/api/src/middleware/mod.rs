//! Authentication middleware extractors.
//!
//! [`auth::CurrentUser`] extracts the verified identity from a session
//! token; protected handlers take it as a parameter.

pub mod auth;
