//! # cf Architecture
//!
//! `cf` is the Cloud Foundry command line client. The crate is a library with a thin binary
//! on top: everything from the HTTP wire up to the command logic is testable without a
//! terminal or a network.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (cli/, wired by main.rs)                               │
//! │  - clap parsing, config load, tracing, exit codes           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Commands (command/)                                        │
//! │  - check the target, print flavor text, call actors         │
//! │  - render warnings, tables and OK through cfui::Ui          │
//! │  - return a TranslatableError, never print one              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Actors (actor/)                                            │
//! │  - one operation per user intent, across several requests   │
//! │  - every result carries the API warnings it collected       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API clients (api/)                                         │
//! │  - Cloud Controller /v2 and /v3, UAA, log-cache             │
//! │  - traits at every client, in-memory fakes for tests        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Warnings
//!
//! The Cloud Controller attaches human-readable warnings to responses. They travel with
//! every result as a [`warnings::Warned`] value, whether the call succeeded or not, and a
//! command prints them to stderr before it looks at the outcome.
//!
//! ## Module Overview
//!
//! - [`api`]: HTTP clients, wire types and the Cloud Controller error taxonomy
//! - [`actor`]: Multi-request operations and their domain errors
//! - [`command`]: One struct per CLI command, the error translation layer, shared rendering
//! - [`config`]: `~/.cf/config.json` plus environment overrides
//! - [`error`]: The crate-wide error type
//! - [`trace`]: `CF_TRACE` / `CF_LOG_LEVEL` driven request tracing
//! - [`warnings`]: The warnings accumulator
//! - `cli`: Argument parsing and process plumbing for the binary (not part of the lib API)

pub mod actor;
pub mod api;
pub mod command;
pub mod config;
pub mod error;
pub mod trace;
pub mod warnings;
