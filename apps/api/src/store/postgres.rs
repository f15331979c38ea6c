use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::feedback::FeedbackRow;
use crate::models::interview::InterviewRow;
use crate::models::interview_list::{InterviewListRow, OverviewUpdate};
use crate::store::InterviewStore;

/// PostgreSQL-backed store. Tables are created by the embedded migrations.
#[derive(Clone)]
pub struct PgInterviewStore {
    pool: PgPool,
}

impl PgInterviewStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InterviewStore for PgInterviewStore {
    async fn insert_generation(
        &self,
        parent: &InterviewListRow,
        children: &[InterviewRow],
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO interviews_list
                (id, user_id, job_link, company_name, role, level, metadata,
                 total_interviews_generated, total_interviews_taken,
                 overall_feedback, average_score, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(parent.id)
        .bind(&parent.user_id)
        .bind(&parent.job_link)
        .bind(&parent.company_name)
        .bind(&parent.role)
        .bind(&parent.level)
        .bind(&parent.metadata)
        .bind(parent.total_interviews_generated)
        .bind(parent.total_interviews_taken)
        .bind(&parent.overall_feedback)
        .bind(parent.average_score)
        .bind(parent.created_at)
        .execute(&mut *tx)
        .await?;

        for child in children {
            sqlx::query(
                r#"
                INSERT INTO interviews
                    (id, interview_list_id, user_id, role, interview_type, level,
                     techstack, questions, finalized, cover_image, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                "#,
            )
            .bind(child.id)
            .bind(child.interview_list_id)
            .bind(&child.user_id)
            .bind(&child.role)
            .bind(child.interview_type)
            .bind(&child.level)
            .bind(&child.techstack)
            .bind(&child.questions)
            .bind(child.finalized)
            .bind(&child.cover_image)
            .bind(child.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            "Committed interview list {} with {} interviews",
            parent.id,
            children.len()
        );
        Ok(())
    }

    async fn get_interview_list(&self, id: Uuid) -> Result<Option<InterviewListRow>, AppError> {
        let row = sqlx::query_as::<_, InterviewListRow>("SELECT * FROM interviews_list WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_interview_lists_by_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<InterviewListRow>, AppError> {
        let rows = sqlx::query_as::<_, InterviewListRow>(
            "SELECT * FROM interviews_list WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_interview(&self, id: Uuid) -> Result<Option<InterviewRow>, AppError> {
        let row = sqlx::query_as::<_, InterviewRow>("SELECT * FROM interviews WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_interviews_by_user(&self, user_id: &str) -> Result<Vec<InterviewRow>, AppError> {
        let rows = sqlx::query_as::<_, InterviewRow>(
            "SELECT * FROM interviews WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_interviews_by_parent(
        &self,
        parent_id: Uuid,
    ) -> Result<Vec<InterviewRow>, AppError> {
        let rows = sqlx::query_as::<_, InterviewRow>(
            "SELECT * FROM interviews WHERE interview_list_id = $1 ORDER BY created_at DESC",
        )
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_latest_interviews(
        &self,
        excluded_user_id: &str,
        limit: i64,
    ) -> Result<Vec<InterviewRow>, AppError> {
        let rows = sqlx::query_as::<_, InterviewRow>(
            r#"
            SELECT * FROM interviews
            WHERE finalized = TRUE AND user_id <> $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(excluded_user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_feedback(&self, id: Uuid) -> Result<Option<FeedbackRow>, AppError> {
        let row = sqlx::query_as::<_, FeedbackRow>("SELECT * FROM feedback WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_feedback_by_interview(
        &self,
        interview_id: Uuid,
        user_id: &str,
    ) -> Result<Option<FeedbackRow>, AppError> {
        let row = sqlx::query_as::<_, FeedbackRow>(
            r#"
            SELECT * FROM feedback
            WHERE interview_id = $1 AND user_id = $2
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(interview_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_feedback_for_interviews(
        &self,
        interview_ids: &[Uuid],
    ) -> Result<Vec<FeedbackRow>, AppError> {
        if interview_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, FeedbackRow>(
            "SELECT * FROM feedback WHERE interview_id = ANY($1) ORDER BY created_at",
        )
        .bind(interview_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn upsert_feedback(&self, feedback: &FeedbackRow) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO feedback
                (id, interview_id, user_id, total_score, category_scores,
                 strengths, areas_for_improvement, final_assessment, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET
                interview_id = EXCLUDED.interview_id,
                user_id = EXCLUDED.user_id,
                total_score = EXCLUDED.total_score,
                category_scores = EXCLUDED.category_scores,
                strengths = EXCLUDED.strengths,
                areas_for_improvement = EXCLUDED.areas_for_improvement,
                final_assessment = EXCLUDED.final_assessment,
                created_at = EXCLUDED.created_at
            "#,
        )
        .bind(feedback.id)
        .bind(feedback.interview_id)
        .bind(&feedback.user_id)
        .bind(feedback.total_score)
        .bind(&feedback.category_scores)
        .bind(&feedback.strengths)
        .bind(&feedback.areas_for_improvement)
        .bind(&feedback.final_assessment)
        .bind(feedback.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_overview(
        &self,
        parent_id: Uuid,
        update: &OverviewUpdate,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE interviews_list
            SET overall_feedback = $2, average_score = $3, total_interviews_taken = $4
            WHERE id = $1
            "#,
        )
        .bind(parent_id)
        .bind(&update.overall_feedback)
        .bind(update.average_score)
        .bind(update.total_interviews_taken)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Interview list {parent_id} not found"
            )));
        }
        Ok(())
    }

    async fn record_attempt(
        &self,
        parent_id: Uuid,
        previous_score: Option<f64>,
        score: f64,
    ) -> Result<(), AppError> {
        // SET expressions all read the pre-update row.
        let query = match previous_score {
            None => sqlx::query(
                r#"
                UPDATE interviews_list
                SET average_score = (COALESCE(average_score, 0) * total_interviews_taken + $2)
                                    / (total_interviews_taken + 1),
                    total_interviews_taken = total_interviews_taken + 1
                WHERE id = $1
                "#,
            )
            .bind(parent_id)
            .bind(score),
            Some(previous) => sqlx::query(
                r#"
                UPDATE interviews_list
                SET average_score = CASE
                        WHEN total_interviews_taken > 0
                            THEN COALESCE(average_score, 0) + ($2 - $3) / total_interviews_taken
                        ELSE $2
                    END,
                    total_interviews_taken = GREATEST(total_interviews_taken, 1)
                WHERE id = $1
                "#,
            )
            .bind(parent_id)
            .bind(score)
            .bind(previous),
        };

        let result = query.execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Interview list {parent_id} not found"
            )));
        }
        Ok(())
    }
}
