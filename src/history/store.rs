//! Job history store

use crate::carbon_aware::types::{Job, ScheduleResult, Urgency};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// A persisted scheduling outcome
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: u64,
    pub job_name: String,
    pub cpu_usage: u32,
    pub runtime: f64,
    pub urgency: Urgency,
    pub region_id: String,
    pub region_name: String,
    pub region_location: String,
    /// Intensity of the chosen region at submission time (gCO2/kWh)
    pub carbon_intensity: f64,
    pub estimated_energy: f64,
    #[serde(rename = "estimatedCO2")]
    pub estimated_co2: f64,
    pub estimated_cost: f64,
    pub carbon_saved: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct HistoryState {
    next_id: u64,
    records: Vec<JobRecord>,
}

/// Shared, append-mostly store of job records.
///
/// Records are kept in submission order. With a backing file, the whole
/// history is rewritten after every mutation.
#[derive(Clone, Debug, Default)]
pub struct HistoryStore {
    state: Arc<RwLock<HistoryState>>,
    path: Option<PathBuf>,
}

impl HistoryStore {
    /// In-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store backed by a JSON file; existing records are loaded
    pub async fn open(path: PathBuf) -> Result<Self> {
        let state = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let state: HistoryState = serde_json::from_slice(&bytes)?;
                info!(
                    "Loaded {} history records from {}",
                    state.records.len(),
                    path.display()
                );
                state
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No history file at {}, starting empty", path.display());
                HistoryState::default()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            state: Arc::new(RwLock::new(state)),
            path: Some(path),
        })
    }

    /// Record a successful scheduling outcome
    pub async fn record(&self, job: &Job, result: &ScheduleResult) -> Result<JobRecord> {
        let mut state = self.state.write().await;
        state.next_id += 1;

        let record = JobRecord {
            id: state.next_id,
            job_name: job.name.clone(),
            cpu_usage: job.cpu_usage,
            runtime: job.runtime,
            urgency: job.urgency,
            region_id: result.region.id.clone(),
            region_name: result.region.name.clone(),
            region_location: result.region.location.clone(),
            carbon_intensity: result.region.carbon_intensity,
            estimated_energy: result.estimated_energy,
            estimated_co2: result.estimated_co2,
            estimated_cost: result.estimated_cost,
            carbon_saved: result.carbon_saved,
            created_at: Utc::now(),
        };
        state.records.push(record.clone());
        if let Err(e) = self.persist(&state).await {
            state.records.pop();
            state.next_id -= 1;
            warn!("Failed to persist history entry {}: {}", record.id, e);
            return Err(e);
        }

        debug!("Recorded job {} as history entry {}", record.job_name, record.id);
        Ok(record)
    }

    /// All records, newest first
    pub async fn list(&self) -> Vec<JobRecord> {
        let state = self.state.read().await;
        state.records.iter().rev().cloned().collect()
    }

    /// All records, oldest first
    pub async fn list_chronological(&self) -> Vec<JobRecord> {
        self.state.read().await.records.clone()
    }

    pub async fn get(&self, id: u64) -> Result<JobRecord> {
        let state = self.state.read().await;
        state
            .records
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("history record {}", id)))
    }

    pub async fn delete(&self, id: u64) -> Result<()> {
        let mut state = self.state.write().await;
        let position = state
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| Error::NotFound(format!("history record {}", id)))?;
        let removed = state.records.remove(position);
        if let Err(e) = self.persist(&state).await {
            state.records.insert(position, removed);
            warn!("Failed to persist deletion of history record {}: {}", id, e);
            return Err(e);
        }

        info!("Deleted history record {}", id);
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.records.is_empty()
    }

    /// Replace the backing file; the previous contents survive a failed write
    async fn persist(&self, state: &HistoryState) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let bytes = serde_json::to_vec_pretty(state)?;

        let mut staging = path.clone().into_os_string();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);
        tokio::fs::write(&staging, bytes).await?;
        tokio::fs::rename(&staging, path).await?;
        Ok(())
    }
}
