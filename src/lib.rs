//! # olahub
//!
//! Client core for the Olahub model and dataset hub.
//!
//! The hub server owns search, downloads, stars and accounts; this crate only
//! talks to it. Two pieces carry real state:
//!
//! - [`api::ApiClient`]: the single HTTP gateway. Attaches the stored bearer
//!   token to every request and turns a 401 into a [`api::SessionInvalidated`]
//!   event.
//! - [`session::SessionManager`]: owns the signed-in identity and the token,
//!   restores the session at startup, and publishes snapshots to subscribers.
//!
//! Everything else ([`hub`], [`types`]) is typed plumbing over REST endpoints.
//! Browser and CLI front ends plug in their own [`api::HttpTransport`] and
//! [`storage::TokenStore`] implementations.

pub mod api;
pub mod config;
pub mod error;
pub mod hub;
pub mod session;
pub mod storage;
pub mod types;

pub use api::{ApiClient, HttpTransport, SessionInvalidated};
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError, SessionError, StorageError};
pub use hub::HubApi;
pub use session::{SessionManager, SessionPhase, SessionSnapshot};
pub use storage::TokenStore;
pub use types::UserIdentity;

#[cfg(test)]
#[path = "support_test.rs"]
mod test_support;
