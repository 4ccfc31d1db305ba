//! HTTP plumbing: the transport seam and the authenticated client on top.

pub mod client;
pub mod transport;

pub use client::{ApiClient, ApiRequest, LogoutHook, REFRESH_PATH, RefreshPhase, path_segment};
pub use transport::{FilePart, HttpResponse, OutboundRequest, ReqwestTransport, RequestBody, Transport};
