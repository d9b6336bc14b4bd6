//! # Actors
//!
//! One method per user-facing operation. An actor method calls one or more API client
//! methods strictly in sequence and returns a [`Warned`](crate::warnings::Warned):
//!
//! - warnings from every sub-call are appended in call order, including calls that failed
//!   and calls whose failure was tolerated;
//! - the first fatal error short-circuits, keeping the warnings gathered so far;
//! - a generic 404 from the client becomes a typed [`ActionError`] only where the lookup
//!   key is known, so the same 404 surfaces differently depending on the call site.
//!
//! Actors never print and never translate. They are generic over the client traits in
//! [`crate::api`], so tests drive them with the in-memory fakes.

pub mod actionerror;
pub mod configaction;
pub mod v2action;
pub mod v2v3action;
pub mod v3action;

pub use actionerror::{ActionError, ResourceKey};

use crate::api::CcError;
use crate::error::Error;

/// Maps a client 404 to `missing()`, passing every other error through.
pub(crate) fn not_found_as(err: CcError, missing: impl FnOnce() -> ActionError) -> Error {
    if err.is_not_found() {
        missing().into()
    } else {
        err.into()
    }
}
