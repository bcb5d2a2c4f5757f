//! Batch entry points for the Gridiron engine.
//!
//! [`Orchestrator`] ingests the provider's current iteration;
//! [`Reconciler`] backfills development traits and draft picks from the
//! secondary dataset. Both are generic over any
//! [`RatingStore`](gridiron_core::store::RatingStore).

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod reconciler;

pub use crate::config::SyncConfig;
pub use error::{Error, Result};
pub use orchestrator::{Orchestrator, SyncOutcome};
pub use reconciler::{ReconcileReport, Reconciler};
