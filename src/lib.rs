//! postrelay is a JSON POST relay for a private upstream API.
//!
//! It accepts `POST` requests on any path, re-sends the JSON body to a
//! single configured upstream base URL with the same path suffix, and
//! returns the upstream's status, headers, and body to the caller.
//! Failures are reported as a JSON `{"error": ...}` object.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, validate, health).
//! - [`config`] -- The immutable [`RelayConfig`](config::RelayConfig) and
//!   upstream URL validation.
//! - [`error`] -- Process-level and per-request error types using `thiserror`.
//! - [`health`] -- `GET /health` endpoint handler returning runtime diagnostics.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`proxy`] -- Core forwarding: payload validation, URL construction,
//!   the [`Upstream`](proxy::upstream::Upstream) client seam, and response
//!   passthrough.
//! - [`server`] -- Axum server setup, shared application state, HTTP client, and
//!   graceful shutdown.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `sentry-integration` | Sentry error tracking |

// Binary crate — public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod proxy;
pub mod server;

#[cfg(feature = "sentry-integration")]
pub mod sentry_integration;
