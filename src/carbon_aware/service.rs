//! Scheduling service boundary
//!
//! Exposes the two operations collaborators use (`get_regions` and
//! `schedule_job`) plus `submit`, which also records the outcome in the job
//! history. Only fetching the catalog snapshot may suspend; scoring itself is
//! synchronous.

use crate::carbon_aware::catalog::{CatalogOverview, CatalogSource};
use crate::carbon_aware::scheduler::Scheduler;
use crate::carbon_aware::types::{Job, Region, RegionScore, ScheduleResult, Urgency};
use crate::error::Result;
use crate::history::{HistoryStore, JobRecord};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct SchedulingService {
    catalog: Arc<dyn CatalogSource>,
    scheduler: Scheduler,
    history: HistoryStore,
}

impl SchedulingService {
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        scheduler: Scheduler,
        history: HistoryStore,
    ) -> Self {
        Self {
            catalog,
            scheduler,
            history,
        }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Current catalog snapshot
    pub async fn get_regions(&self) -> Result<Vec<Region>> {
        let catalog = self.catalog.snapshot().await?;
        debug!("Serving catalog snapshot with {} regions", catalog.len());
        Ok(catalog.regions().to_vec())
    }

    /// Dashboard statistics for the current snapshot
    pub async fn overview(&self) -> Result<CatalogOverview> {
        let catalog = self.catalog.snapshot().await?;
        Ok(catalog.overview(self.scheduler.scoring().carbon_ceiling))
    }

    /// Current snapshot ranked for `urgency`
    pub async fn ranking(&self, urgency: Urgency) -> Result<Vec<RegionScore>> {
        let catalog = self.catalog.snapshot().await?;
        self.scheduler.rank(urgency, catalog.regions())
    }

    /// Choose a region for `job` without recording anything
    pub async fn schedule_job(&self, job: &Job) -> Result<ScheduleResult> {
        let catalog = self.catalog.snapshot().await?;
        let outcome = self.scheduler.schedule(job, catalog.regions());

        self.observe(job, &outcome);
        outcome
    }

    /// Schedule `job` and append the outcome to the history.
    ///
    /// A rejected job leaves the history untouched.
    pub async fn submit(&self, job: &Job) -> Result<(JobRecord, ScheduleResult)> {
        let result = self.schedule_job(job).await?;
        let record = self.history.record(job, &result).await?;
        Ok((record, result))
    }

    #[cfg(feature = "metrics")]
    fn observe(&self, job: &Job, outcome: &Result<ScheduleResult>) {
        match outcome {
            Ok(result) => crate::metrics::observe_scheduled(
                &result.region.id,
                job.urgency.as_str(),
                self.scheduler.score(&result.region, job.urgency),
                result.estimated_co2,
                result.carbon_saved,
            ),
            Err(e) => crate::metrics::inc_scheduling_error(e.kind()),
        }
    }

    #[cfg(not(feature = "metrics"))]
    fn observe(&self, _job: &Job, _outcome: &Result<ScheduleResult>) {}
}
