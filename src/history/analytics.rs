//! Aggregations over job history

use crate::carbon_aware::types::Urgency;
use crate::history::store::JobRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Summary of all recorded jobs
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub totals: Totals,
    /// Per-region stats in first-seen order
    pub regions: Vec<RegionStats>,
    /// Job counts per urgency level; levels with no jobs are omitted
    pub urgency: Vec<UrgencyCount>,
    /// Oldest first
    pub time_series: Vec<TimePoint>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub jobs: usize,
    #[serde(rename = "co2")]
    pub co2_kg: f64,
    #[serde(rename = "carbonSaved")]
    pub carbon_saved_kg: f64,
    pub cost: f64,
    #[serde(rename = "energy")]
    pub energy_kwh: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionStats {
    pub region_id: String,
    pub region_name: String,
    pub count: usize,
    pub co2: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UrgencyCount {
    pub urgency: Urgency,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimePoint {
    pub created_at: DateTime<Utc>,
    pub co2: f64,
    pub saved: f64,
}

impl Analytics {
    pub fn from_records(records: &[JobRecord]) -> Self {
        let mut chronological: Vec<&JobRecord> = records.iter().collect();
        chronological.sort_by_key(|r| (r.created_at, r.id));

        let mut totals = Totals::default();
        let mut regions: Vec<RegionStats> = Vec::new();
        let mut urgency_counts = [0usize; 3];

        for record in &chronological {
            totals.jobs += 1;
            totals.co2_kg += record.estimated_co2;
            totals.carbon_saved_kg += record.carbon_saved;
            totals.cost += record.estimated_cost;
            totals.energy_kwh += record.estimated_energy;

            match regions.iter_mut().find(|s| s.region_id == record.region_id) {
                Some(stats) => {
                    stats.count += 1;
                    stats.co2 += record.estimated_co2;
                }
                None => regions.push(RegionStats {
                    region_id: record.region_id.clone(),
                    region_name: record.region_name.clone(),
                    count: 1,
                    co2: record.estimated_co2,
                }),
            }

            urgency_counts[urgency_slot(record.urgency)] += 1;
        }

        let urgency = Urgency::ALL
            .iter()
            .map(|&u| UrgencyCount {
                urgency: u,
                count: urgency_counts[urgency_slot(u)],
            })
            .filter(|c| c.count > 0)
            .collect();

        let time_series = chronological
            .iter()
            .map(|r| TimePoint {
                created_at: r.created_at,
                co2: r.estimated_co2,
                saved: r.carbon_saved,
            })
            .collect();

        Self {
            totals,
            regions,
            urgency,
            time_series,
        }
    }
}

fn urgency_slot(urgency: Urgency) -> usize {
    match urgency {
        Urgency::Low => 0,
        Urgency::Medium => 1,
        Urgency::High => 2,
    }
}
