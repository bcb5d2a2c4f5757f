//! SQLite backend for the Gridiron rating store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on dedicated
//! connection threads without blocking the async runtime. Connections come
//! from a bounded [`Pool`].

mod commit;
mod encode;
mod normalize;
mod schema;
mod store;

pub mod error;
pub mod pool;

pub use error::{Error, Result};
pub use pool::{Pool, PoolOptions};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
