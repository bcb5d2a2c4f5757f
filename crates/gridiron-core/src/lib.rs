//! Core types and trait definitions for the Gridiron rating engine.
//!
//! This crate is deliberately free of HTTP and database dependencies. All
//! other crates depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod dimension;
pub mod error;
pub mod iteration;
pub mod mappings;
pub mod player;
pub mod reconcile;
pub mod snapshot;
pub mod stats;
pub mod store;

pub use error::{Error, Result};
