//! Core library for the `volley` CLI.
//!
//! `volley` fires a fixed number of HTTP requests every second and prints one
//! summary per one-second group: how many requests were sent, how many failed
//! without a response, and a histogram of status codes. The pieces are
//! exposed so the pacing and aggregation engine can be driven without the
//! binary.
pub mod aggregate;
pub mod args;
pub mod config;
pub mod domain;
pub mod entry;
pub mod error;
pub mod http;
pub mod logger;
pub mod pacer;
pub mod runner;
pub mod shutdown;
pub mod shutdown_handlers;
pub mod sinks;
