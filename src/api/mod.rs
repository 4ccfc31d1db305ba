//! Endpoint wrappers for the competency backend. Every call goes through
//! [`crate::http::ApiClient`], so all of them share token renewal.

pub mod auth;
pub mod crud;
pub mod employees;
pub mod jobs;
pub mod stats;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use crud::Entity;
