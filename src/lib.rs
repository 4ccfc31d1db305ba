//! Client library for the competency management backend.
//!
//! The pieces fit together like this:
//!
//! - [`session::SessionStore`] owns the signed-in user and tokens, persisted
//!   through a [`session::SessionStorage`].
//! - [`http::ApiClient`] decorates every call with the current access token
//!   and renews it once, single-flight, when the backend answers 401.
//! - [`routes`] and [`nav`] decide which screens a role may open.
//! - [`api`] wraps the backend's endpoints with typed requests and responses.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod nav;
pub mod routes;
pub mod session;

pub use config::ClientConfig;
pub use error::ApiError;
pub use http::ApiClient;
