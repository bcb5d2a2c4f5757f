//! HTTP collaborators for the Gridiron sync engine.
//!
//! The primary provider publishes rating snapshots per iteration; a second,
//! independently sourced dataset supplies development traits and draft
//! positions. Every fetched payload is cached on disk as pretty-printed JSON
//! and a cache file, once present, is always preferred over the network.

pub mod cache;
pub mod client;
pub mod error;
pub mod primary;
pub mod resolver;
pub mod secondary;

pub use error::{Error, Result};
pub use primary::{PrimaryOptions, SnapshotFetcher};
pub use resolver::IterationResolver;
pub use secondary::{SecondaryFetcher, SecondaryOptions};

#[cfg(test)]
mod tests;
