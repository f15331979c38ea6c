//! Document-store seam. Every read and write of interview lists, interviews
//! and feedback goes through `InterviewStore`.
//!
//! `AppState` holds an `Arc<dyn InterviewStore>`; production uses
//! `PgInterviewStore`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::feedback::FeedbackRow;
use crate::models::interview::InterviewRow;
use crate::models::interview_list::{InterviewListRow, OverviewUpdate};

pub mod postgres;

pub use postgres::PgInterviewStore;

/// Default page size for the "latest interviews" listing.
pub const DEFAULT_LATEST_LIMIT: i64 = 20;

#[async_trait]
pub trait InterviewStore: Send + Sync {
    /// Writes a parent and all of its children atomically: either every row
    /// is visible afterwards or none is.
    async fn insert_generation(
        &self,
        parent: &InterviewListRow,
        children: &[InterviewRow],
    ) -> Result<(), AppError>;

    async fn get_interview_list(&self, id: Uuid) -> Result<Option<InterviewListRow>, AppError>;

    /// Newest first.
    async fn list_interview_lists_by_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<InterviewListRow>, AppError>;

    async fn get_interview(&self, id: Uuid) -> Result<Option<InterviewRow>, AppError>;

    /// Newest first.
    async fn list_interviews_by_user(&self, user_id: &str) -> Result<Vec<InterviewRow>, AppError>;

    /// Newest first.
    async fn list_interviews_by_parent(
        &self,
        parent_id: Uuid,
    ) -> Result<Vec<InterviewRow>, AppError>;

    /// Finalized interviews owned by anyone except `excluded_user_id`, newest first.
    async fn list_latest_interviews(
        &self,
        excluded_user_id: &str,
        limit: i64,
    ) -> Result<Vec<InterviewRow>, AppError>;

    async fn get_feedback(&self, id: Uuid) -> Result<Option<FeedbackRow>, AppError>;

    /// Most recent feedback left by `user_id` on one interview.
    async fn get_feedback_by_interview(
        &self,
        interview_id: Uuid,
        user_id: &str,
    ) -> Result<Option<FeedbackRow>, AppError>;

    /// Every feedback record whose interview id is in `interview_ids`.
    async fn list_feedback_for_interviews(
        &self,
        interview_ids: &[Uuid],
    ) -> Result<Vec<FeedbackRow>, AppError>;

    /// Inserts, or replaces the record with the same id.
    async fn upsert_feedback(&self, feedback: &FeedbackRow) -> Result<(), AppError>;

    /// Overwrites the aggregator-owned fields of a parent.
    async fn update_overview(&self, parent_id: Uuid, update: &OverviewUpdate)
        -> Result<(), AppError>;

    /// Folds one attempt score into the parent's running counters.
    /// `previous_score` is set when an existing attempt was overwritten.
    async fn record_attempt(
        &self,
        parent_id: Uuid,
        previous_score: Option<f64>,
        score: f64,
    ) -> Result<(), AppError>;
}
