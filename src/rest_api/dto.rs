//! Request and response bodies for the REST API

use serde::{Deserialize, Serialize};

use crate::carbon_aware::ScheduleResult;
use crate::history::JobRecord;

#[derive(Serialize, Deserialize, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: &str, message: &str) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
        }
    }
}

/// Response to a job submission
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub record: JobRecord,
    pub result: ScheduleResult,
    pub trees_equivalent: f64,
}

#[derive(Deserialize, Debug)]
pub struct RankingQuery {
    /// One of low, medium, high; defaults to medium
    pub urgency: Option<String>,
}
