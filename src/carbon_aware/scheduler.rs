//! Carbon-aware region scheduler
//!
//! Scores every region in a catalog snapshot with a weighted linear model,
//! picks the highest-scoring one and derives the job's impact metrics.
//!
//! Each factor is normalised against a reference ceiling into a "goodness"
//! value (`1 - value / ceiling`, availability as a fraction) and multiplied by
//! its weight. Nothing is clamped: a region dirtier than the carbon ceiling
//! gets a negative carbon term.
//!
//! Ties are broken by catalog order: the first region reaching the maximum
//! score wins, every time.

use crate::carbon_aware::types::{Job, Region, RegionScore, ScheduleResult, Urgency};
use crate::config::{ImpactConfig, ScoringConfig};
use crate::error::{Error, Result};
use tracing::{debug, info, warn};

/// Region selector; holds only configuration, never catalog state
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    scoring: ScoringConfig,
    impact: ImpactConfig,
}

impl Scheduler {
    pub fn new(scoring: ScoringConfig, impact: ImpactConfig) -> Self {
        Self { scoring, impact }
    }

    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    pub fn impact(&self) -> &ImpactConfig {
        &self.impact
    }

    /// Total score of a region for the given urgency
    pub fn score(&self, region: &Region, urgency: Urgency) -> f64 {
        self.breakdown(region, urgency).total
    }

    /// Per-term score of a region for the given urgency
    pub fn breakdown(&self, region: &Region, urgency: Urgency) -> RegionScore {
        let s = &self.scoring;
        let latency_weight = s.latency_weights.for_urgency(urgency);

        let carbon = (1.0 - region.carbon_intensity / s.carbon_ceiling) * s.carbon_weight;
        let cost = (1.0 - region.cost / s.cost_ceiling) * s.cost_weight;
        let latency = (1.0 - region.latency / s.latency_ceiling) * latency_weight;
        let availability = (region.availability / 100.0) * s.availability_weight;

        RegionScore {
            region_id: region.id.clone(),
            carbon,
            cost,
            latency,
            availability,
            total: carbon + cost + latency + availability,
        }
    }

    /// Pick the best region for a job and compute its impact.
    ///
    /// Fails with `ValidationError` for a malformed job or region and with
    /// `EmptyCatalog` when there is nothing to choose from.
    pub fn schedule(&self, job: &Job, regions: &[Region]) -> Result<ScheduleResult> {
        if let Err(e) = job.validate() {
            warn!("Rejected job {:?}: {}", job.name, e);
            return Err(e);
        }
        if regions.is_empty() {
            warn!("Rejected job {:?}: catalog is empty", job.name);
            return Err(Error::EmptyCatalog);
        }

        let best = self.select(job.urgency, regions)?;
        let result = self.impact_for(job, best);

        info!(
            "Scheduled job {:?} ({} cores, {}h, {} urgency) in region {}: {:.3} kg CO2, {:.3} kg saved",
            job.name,
            job.cpu_usage,
            job.runtime,
            job.urgency,
            best.id,
            result.estimated_co2,
            result.carbon_saved
        );

        Ok(result)
    }

    /// Highest-scoring region; earliest in catalog order on ties
    fn select<'a>(&self, urgency: Urgency, regions: &'a [Region]) -> Result<&'a Region> {
        let mut best: Option<(f64, &Region)> = None;

        for region in regions {
            region.validate()?;
            let score = self.score(region, urgency);
            debug!("Region {} scored {:.4} for {} urgency", region.id, score, urgency);

            match best {
                Some((best_score, _)) if score <= best_score => {}
                _ => best = Some((score, region)),
            }
        }

        best.map(|(_, region)| region).ok_or(Error::EmptyCatalog)
    }

    /// Impact metrics of running `job` in `region`
    pub fn impact_for(&self, job: &Job, region: &Region) -> ScheduleResult {
        let cores = f64::from(job.cpu_usage);
        let estimated_energy = cores * job.runtime * self.impact.kwh_per_core_hour;
        let estimated_co2 = estimated_energy * region.carbon_intensity / 1000.0;
        let estimated_cost = region.cost * job.runtime * cores;
        let carbon_saved = estimated_energy
            * (self.impact.baseline_carbon_intensity - region.carbon_intensity)
            / 1000.0;

        ScheduleResult {
            region: region.clone(),
            estimated_energy,
            estimated_co2,
            estimated_cost,
            carbon_saved,
        }
    }

    /// Every region's score breakdown, best first.
    ///
    /// Regions are validated as in [`Scheduler::schedule`]. The sort is stable,
    /// so equal totals keep catalog order and the head of the list is the
    /// region `schedule` selects.
    pub fn rank(&self, urgency: Urgency, regions: &[Region]) -> Result<Vec<RegionScore>> {
        let mut scores = regions
            .iter()
            .map(|region| {
                region.validate()?;
                Ok(self.breakdown(region, urgency))
            })
            .collect::<Result<Vec<RegionScore>>>()?;
        scores.sort_by(|a, b| b.total.total_cmp(&a.total));
        Ok(scores)
    }
}
