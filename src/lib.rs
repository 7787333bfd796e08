//! Per-request language negotiation.
//!
//! `i18n` holds the pure decision logic (registry, header parsing, the
//! precedence chain). `preference` and `session` are the collaborators that
//! remember a choice, and `server` is the axum layer tying them to HTTP.

pub mod config;
pub mod i18n;
pub mod preference;
pub mod server;
pub mod session;
