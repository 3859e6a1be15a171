//! Prometheus metrics for the green scheduler
//!
//! # Exported metrics
//! The `/metrics` endpoint (when built with `--features metrics`) exports the following metrics:
//! - `green_jobs_scheduled_total` (counter): scheduled jobs labeled by region and urgency.
//! - `green_scheduling_errors_total` (counter): rejected scheduling calls labeled by error kind.
//! - `green_estimated_co2_kg_total` (counter): estimated emissions of scheduled jobs.
//! - `green_carbon_saved_kg_total` (counter): emissions avoided against the baseline intensity.
//! - `green_region_score` (gauge): score of the last winning region labeled by region and urgency.

use std::sync::atomic::AtomicU64;

use once_cell::sync::Lazy;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;

/// Labels for per-region scheduling metrics
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct PlacementLabels {
    pub region: String,
    pub urgency: String,
}

/// Labels for scheduling error metrics
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct ErrorLabels {
    /// Error kind, e.g. "validation", "empty_catalog"
    pub kind: String,
}

pub static JOBS_SCHEDULED_TOTAL: Lazy<Family<PlacementLabels, Counter<u64, AtomicU64>>> =
    Lazy::new(Family::default);

pub static SCHEDULING_ERRORS_TOTAL: Lazy<Family<ErrorLabels, Counter<u64, AtomicU64>>> =
    Lazy::new(Family::default);

pub static ESTIMATED_CO2_KG_TOTAL: Lazy<Counter<f64, AtomicU64>> = Lazy::new(Counter::default);

pub static CARBON_SAVED_KG_TOTAL: Lazy<Counter<f64, AtomicU64>> = Lazy::new(Counter::default);

pub static REGION_SCORE: Lazy<Family<PlacementLabels, Gauge<f64, AtomicU64>>> =
    Lazy::new(Family::default);

pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let mut registry = Registry::default();

    registry.register(
        "green_jobs_scheduled_total",
        "Total number of jobs placed in a region",
        JOBS_SCHEDULED_TOTAL.clone(),
    );
    registry.register(
        "green_scheduling_errors_total",
        "Total number of rejected scheduling calls",
        SCHEDULING_ERRORS_TOTAL.clone(),
    );
    registry.register(
        "green_estimated_co2_kg_total",
        "Estimated CO2 emissions of scheduled jobs in kilograms",
        ESTIMATED_CO2_KG_TOTAL.clone(),
    );
    registry.register(
        "green_carbon_saved_kg_total",
        "CO2 avoided relative to the baseline grid intensity in kilograms",
        CARBON_SAVED_KG_TOTAL.clone(),
    );
    registry.register(
        "green_region_score",
        "Score of the most recently selected region",
        REGION_SCORE.clone(),
    );

    registry
});

/// Record a successful placement
pub fn observe_scheduled(region: &str, urgency: &str, score: f64, co2_kg: f64, saved_kg: f64) {
    let labels = PlacementLabels {
        region: region.to_string(),
        urgency: urgency.to_string(),
    };
    JOBS_SCHEDULED_TOTAL.get_or_create(&labels).inc();
    REGION_SCORE.get_or_create(&labels).set(score);
    ESTIMATED_CO2_KG_TOTAL.inc_by(co2_kg);
    // Counters cannot go down; a dirtier-than-baseline placement adds nothing
    if saved_kg > 0.0 {
        CARBON_SAVED_KG_TOTAL.inc_by(saved_kg);
    }
}

pub fn inc_scheduling_error(kind: &str) {
    SCHEDULING_ERRORS_TOTAL
        .get_or_create(&ErrorLabels {
            kind: kind.to_string(),
        })
        .inc();
}

/// Render the registry in the Prometheus text exposition format
pub fn encode() -> String {
    let mut buffer = String::new();
    if let Err(e) = prometheus_client::encoding::text::encode(&mut buffer, &REGISTRY) {
        tracing::error!("Failed to encode metrics: {}", e);
    }
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_encodes_observations() {
        observe_scheduled("canada-hydro", "medium", 74.871, 0.012, 0.273);
        inc_scheduling_error("validation");

        let text = encode();
        assert!(text.contains("green_jobs_scheduled_total"));
        assert!(text.contains("region=\"canada-hydro\""));
        assert!(text.contains("green_scheduling_errors_total"));
        assert!(text.contains("kind=\"validation\""));
    }

    #[test]
    fn test_negative_savings_do_not_panic() {
        observe_scheduled("us-east-standard", "high", 40.0, 1.0, -0.5);
    }
}
