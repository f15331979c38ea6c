//! Axum route handlers for the Feedback API.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::feedback::overview::refresh_overview;
use crate::feedback::scorer::{create_feedback, CreateFeedbackRequest, CreateFeedbackResponse};
use crate::models::feedback::FeedbackRow;
use crate::models::interview_list::InterviewListRow;
use crate::state::AppState;

/// POST /api/v1/feedback
pub async fn handle_create_feedback(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateFeedbackRequest>,
) -> Result<Json<CreateFeedbackResponse>, AppError> {
    if request.user_id != user.user_id {
        return Err(AppError::Forbidden(
            "Feedback can only be recorded for the signed-in user".to_string(),
        ));
    }

    let feedback = create_feedback(
        state.store.as_ref(),
        state.llm.as_ref(),
        state.config.overview_mode,
        &request,
    )
    .await?;

    Ok(Json(CreateFeedbackResponse {
        success: true,
        feedback_id: feedback.id,
    }))
}

/// GET /api/v1/interviews/:id/feedback
pub async fn handle_get_interview_feedback(
    State(state): State<AppState>,
    user: AuthUser,
    Path(interview_id): Path<Uuid>,
) -> Result<Json<FeedbackRow>, AppError> {
    let feedback = state
        .store
        .get_feedback_by_interview(interview_id, &user.user_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("No feedback for interview {interview_id}"))
        })?;
    Ok(Json(feedback))
}

/// POST /api/v1/interview-lists/:id/overview
///
/// Recomputes the overall narrative, average score and taken count.
/// Only the owner of the interview list may trigger it.
pub async fn handle_refresh_overview(
    State(state): State<AppState>,
    user: AuthUser,
    Path(parent_id): Path<Uuid>,
) -> Result<Json<InterviewListRow>, AppError> {
    let owner = state
        .store
        .get_interview_list(parent_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Interview list {parent_id} not found")))?
        .user_id;
    if owner != user.user_id {
        return Err(AppError::Forbidden(
            "Only the owner can refresh this interview list".to_string(),
        ));
    }

    let parent = refresh_overview(state.store.as_ref(), state.llm.as_ref(), parent_id).await?;
    Ok(Json(parent))
}
