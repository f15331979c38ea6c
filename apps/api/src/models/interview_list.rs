use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One job-application context (parent of its generated interviews).
///
/// `total_interviews_generated` is fixed at generation time; the overview
/// fields are owned by the aggregator.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InterviewListRow {
    pub id: Uuid,
    pub user_id: String,
    pub job_link: Option<String>,
    pub company_name: String,
    pub role: String,
    pub level: Option<String>,
    pub metadata: Value,
    pub total_interviews_generated: i32,
    pub total_interviews_taken: i32,
    pub overall_feedback: Option<String>,
    pub average_score: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Values written by a full overview recomputation.
#[derive(Debug, Clone, PartialEq)]
pub struct OverviewUpdate {
    pub overall_feedback: Option<String>,
    pub average_score: Option<f64>,
    pub total_interviews_taken: i32,
}
