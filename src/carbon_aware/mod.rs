//! Carbon-aware region selection
//!
//! This module scores a catalog of data-center regions for a submitted job
//! and reports the carbon, energy and cost impact of the chosen region.

pub mod catalog;
pub mod scheduler;
#[cfg(test)]
mod scheduler_test;
pub mod service;
pub mod types;

pub use catalog::{CatalogOverview, CatalogSource, RegionCatalog, StaticCatalog};
pub use scheduler::Scheduler;
pub use service::SchedulingService;
pub use types::{Job, JobRequest, Region, RegionScore, ScheduleResult, Urgency};
