//! Networking adapters for the browser.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` plugs `gloo-net` into the core `HttpTransport` seam. Every hub
//! call still goes through the core `ApiClient`, which owns auth headers and
//! 401 handling.

pub mod transport;
