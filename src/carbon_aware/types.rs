//! Types for carbon-aware region selection

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Smallest and largest CPU core request a job may make
pub const MIN_CPU_CORES: u32 = 1;
pub const MAX_CPU_CORES: u32 = 128;

/// A candidate data-center region
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    /// Stable region identifier (e.g., "eu-north-hydro")
    pub id: String,
    /// Display name
    pub name: String,
    /// Display location
    pub location: String,
    /// Grid carbon intensity in gCO2/kWh
    pub carbon_intensity: f64,
    /// Price per compute-hour
    pub cost: f64,
    /// Network latency in milliseconds
    pub latency: f64,
    /// Uptime percentage in (0, 100]
    pub availability: f64,
}

impl Region {
    /// Check that every numeric attribute is finite and within range.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::validation("region id must not be empty"));
        }

        let fields = [
            ("carbonIntensity", self.carbon_intensity),
            ("cost", self.cost),
            ("latency", self.latency),
            ("availability", self.availability),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(Error::validation(format!(
                    "region {}: {} must be a finite number",
                    self.id, field
                )));
            }
            if value < 0.0 {
                return Err(Error::validation(format!(
                    "region {}: {} must not be negative, got {}",
                    self.id, field, value
                )));
            }
        }

        if self.availability <= 0.0 || self.availability > 100.0 {
            return Err(Error::validation(format!(
                "region {}: availability must be in (0, 100], got {}",
                self.id, self.availability
            )));
        }

        Ok(())
    }
}

/// Caller-declared priority of a job
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl Urgency {
    pub const ALL: [Urgency; 3] = [Urgency::Low, Urgency::Medium, Urgency::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Urgency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "low" => Ok(Urgency::Low),
            "medium" => Ok(Urgency::Medium),
            "high" => Ok(Urgency::High),
            other => Err(Error::validation(format!(
                "urgency must be one of low, medium, high; got {:?}",
                other
            ))),
        }
    }
}

/// A unit of work submitted for scheduling
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub name: String,
    /// Requested CPU cores
    pub cpu_usage: u32,
    /// Expected duration in hours
    pub runtime: f64,
    pub urgency: Urgency,
}

impl Job {
    /// Build a job and validate it in one step
    pub fn new(
        name: impl Into<String>,
        cpu_usage: u32,
        runtime: f64,
        urgency: Urgency,
    ) -> Result<Self> {
        let job = Self {
            name: name.into(),
            cpu_usage,
            runtime,
            urgency,
        };
        job.validate()?;
        Ok(job)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("job name must not be empty"));
        }
        if !(MIN_CPU_CORES..=MAX_CPU_CORES).contains(&self.cpu_usage) {
            return Err(Error::validation(format!(
                "cpuUsage must be between {} and {}, got {}",
                MIN_CPU_CORES, MAX_CPU_CORES, self.cpu_usage
            )));
        }
        if !self.runtime.is_finite() || self.runtime <= 0.0 {
            return Err(Error::validation(format!(
                "runtime must be a positive number of hours, got {}",
                self.runtime
            )));
        }
        Ok(())
    }
}

/// Untrusted job input as it arrives from a form or HTTP body.
///
/// Out-of-range values surface as `ValidationError` when converted into a [`Job`].
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    #[serde(default)]
    pub name: String,
    pub cpu_usage: i64,
    pub runtime: f64,
    pub urgency: String,
}

impl TryFrom<JobRequest> for Job {
    type Error = Error;

    fn try_from(request: JobRequest) -> Result<Self> {
        let urgency = request.urgency.parse::<Urgency>()?;
        let cpu_usage = u32::try_from(request.cpu_usage).map_err(|_| {
            Error::validation(format!(
                "cpuUsage must be between {} and {}, got {}",
                MIN_CPU_CORES, MAX_CPU_CORES, request.cpu_usage
            ))
        })?;
        Job::new(request.name, cpu_usage, request.runtime, urgency)
    }
}

/// Outcome of a scheduling call
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResult {
    /// The selected region
    pub region: Region,
    /// Energy consumed in kWh
    pub estimated_energy: f64,
    /// Emissions in kg CO2
    #[serde(rename = "estimatedCO2")]
    pub estimated_co2: f64,
    /// Monetary cost
    pub estimated_cost: f64,
    /// kg CO2 avoided relative to the baseline intensity; negative when dirtier
    pub carbon_saved: f64,
}

impl ScheduleResult {
    /// Number of trees the saved carbon corresponds to
    pub fn trees_equivalent(&self, trees_per_kg_saved: f64) -> f64 {
        self.carbon_saved * trees_per_kg_saved
    }
}

/// Per-term score breakdown for a single region
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionScore {
    pub region_id: String,
    pub carbon: f64,
    pub cost: f64,
    pub latency: f64,
    pub availability: f64,
    pub total: f64,
}
