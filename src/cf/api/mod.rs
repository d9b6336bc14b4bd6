//! # API Clients
//!
//! Thin, typed wrappers over the Cloud Controller (v2 and v3), UAA and log-cache HTTP APIs.
//! Each client method is one request (or one paginated list walk) and returns a
//! [`Warned`](crate::warnings::Warned) carrying the decoded value and every warning the
//! server sent, failed calls included.
//!
//! The Cloud Controller and log-cache clients sit behind traits
//! ([`ccv2::CloudControllerV2`], [`ccv3::CloudControllerV3`], [`logcache::LogCacheClient`],
//! [`uaa::UaaClient`]) so the actor layer can run against the in-memory [`fakes`] in tests.
//!
//! Nothing here knows about names, targets or user-facing messages; a 404 is just
//! [`CcError::ResourceNotFound`] and the actor decides what it means.

pub mod ccerror;
pub mod ccv2;
pub mod ccv3;
pub mod connection;
pub mod logcache;
pub mod uaa;

#[cfg(any(test, feature = "test_utils"))]
pub mod fakes;

#[cfg(test)]
mod test_server;

pub use ccerror::{CcError, V3ErrorDetail};
pub use connection::{ApiFlavor, Connection, ConnectionConfig, Request};
