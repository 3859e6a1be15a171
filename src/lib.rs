//! Green Scheduler: carbon-aware region selection for compute jobs
//!
//! This crate scores a catalog of data-center regions on carbon intensity,
//! cost, latency and availability, picks the best region for a job and
//! reports the environmental and financial impact of that choice.

pub mod carbon_aware;
pub mod config;
pub mod error;
pub mod history;

#[cfg(feature = "metrics")]
pub mod metrics;

#[cfg(feature = "rest-api")]
pub mod rest_api;

pub use crate::error::{Error, Result};
