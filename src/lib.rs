//! Advisory outcome estimator for ground invasions of a star system.
//!
//! The game client calls [estimator::preview_invasion] (or builds an
//! [estimator::InvasionEstimator] directly) with a snapshot of the invading troops and the
//! defending position, and shows the resulting win chance and expected casualties before the
//! order is sent. The server resolves the actual battle; nothing here is authoritative.

pub mod cli;
pub mod combat;
pub mod config;
pub mod data;
pub mod error;
pub mod estimator;
pub mod parallel;
pub mod server;

pub use error::{EstimateError, Result};
