//! CSV export of job history

use crate::error::{Error, Result};
use crate::history::store::JobRecord;
use chrono::{DateTime, Utc};

const HEADERS: [&str; 12] = [
    "Job Name",
    "Date",
    "CPU Cores",
    "Runtime (h)",
    "Urgency",
    "Region",
    "Location",
    "Carbon (gCO₂/kWh)",
    "Energy (kWh)",
    "CO₂ (kg)",
    "Cost ($)",
    "Saved (kg CO₂)",
];

/// Render records as CSV, one row per record in the given order
pub fn export_csv(records: &[JobRecord]) -> Result<String> {
    if records.is_empty() {
        return Err(Error::validation("no history to export"));
    }

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(HEADERS.join(","));

    for record in records {
        let fields = [
            escape(&record.job_name),
            record.created_at.format("%Y-%m-%d %H:%M").to_string(),
            record.cpu_usage.to_string(),
            record.runtime.to_string(),
            record.urgency.to_string(),
            escape(&record.region_name),
            escape(&record.region_location),
            record.carbon_intensity.to_string(),
            format!("{:.2}", record.estimated_energy),
            format!("{:.2}", record.estimated_co2),
            format!("{:.2}", record.estimated_cost),
            format!("{:.2}", record.carbon_saved),
        ];
        lines.push(fields.join(","));
    }

    Ok(lines.join("\n"))
}

/// Download filename for an export produced at `now`
pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("green-cloud-history-{}.csv", now.format("%Y-%m-%d"))
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
