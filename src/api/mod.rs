//! Outbound HTTP for the hub API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `client` is the gateway every call goes through (token attachment, 401
//! events, status mapping). `transport` is the seam the gateway dispatches
//! through; `native` implements it with `reqwest`, browser builds supply a
//! fetch-based one.

pub mod client;
#[cfg(feature = "native")]
pub mod native;
pub mod transport;

pub use client::{ApiCall, ApiClient, SessionInvalidated};
#[cfg(feature = "native")]
pub use native::ReqwestTransport;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method};
