use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::interview::InterviewRow;
use crate::models::interview_list::InterviewListRow;
use crate::state::AppState;
use crate::store::DEFAULT_LATEST_LIMIT;

const MAX_LATEST_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct LatestQuery {
    pub limit: Option<i64>,
}

impl LatestQuery {
    fn limit(&self) -> Result<i64, AppError> {
        match self.limit {
            None => Ok(DEFAULT_LATEST_LIMIT),
            Some(n) if (1..=MAX_LATEST_LIMIT).contains(&n) => Ok(n),
            Some(n) => Err(AppError::Validation(format!(
                "limit must be between 1 and {MAX_LATEST_LIMIT}, got {n}"
            ))),
        }
    }
}

/// GET /api/v1/interviews
pub async fn handle_list_my_interviews(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<InterviewRow>>, AppError> {
    Ok(Json(state.store.list_interviews_by_user(&user.user_id).await?))
}

/// GET /api/v1/interviews/latest
///
/// Finalized interviews created by other users, newest first.
pub async fn handle_latest_interviews(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<LatestQuery>,
) -> Result<Json<Vec<InterviewRow>>, AppError> {
    let limit = query.limit()?;
    Ok(Json(
        state
            .store
            .list_latest_interviews(&user.user_id, limit)
            .await?,
    ))
}

/// GET /api/v1/interviews/:id
pub async fn handle_get_interview(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<InterviewRow>, AppError> {
    state
        .store
        .get_interview(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Interview {id} not found")))
}

/// GET /api/v1/interview-lists
pub async fn handle_list_my_interview_lists(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<InterviewListRow>>, AppError> {
    Ok(Json(
        state
            .store
            .list_interview_lists_by_user(&user.user_id)
            .await?,
    ))
}

/// GET /api/v1/interview-lists/:id
pub async fn handle_get_interview_list(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<InterviewListRow>, AppError> {
    state
        .store
        .get_interview_list(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Interview list {id} not found")))
}

/// GET /api/v1/interview-lists/:id/interviews
pub async fn handle_list_interviews_by_parent(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<InterviewRow>>, AppError> {
    Ok(Json(state.store.list_interviews_by_parent(id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_limit_defaults_and_bounds() {
        assert_eq!(LatestQuery { limit: None }.limit().unwrap(), DEFAULT_LATEST_LIMIT);
        assert_eq!(LatestQuery { limit: Some(5) }.limit().unwrap(), 5);
        assert!(LatestQuery { limit: Some(0) }.limit().is_err());
        assert!(LatestQuery { limit: Some(1000) }.limit().is_err());
    }
}
