//! Axum route handlers for the Generation API.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::generation::orchestrator::{
    generate_interviews, GenerateInterviewRequest, GenerationOutcome,
};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GenerateInterviewResponse {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub outcome: GenerationOutcome,
}

/// POST /api/v1/interviews/generate
///
/// Extracts the job profile, generates one question set per requested type
/// and stores them under a new interview list owned by the caller.
pub async fn handle_generate_interview(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<GenerateInterviewRequest>,
) -> Result<Json<GenerateInterviewResponse>, AppError> {
    let outcome = generate_interviews(
        state.store.as_ref(),
        state.llm.as_ref(),
        state.crawler.as_ref(),
        &user.user_id,
        &request,
    )
    .await?;

    Ok(Json(GenerateInterviewResponse {
        success: true,
        message: outcome_message(&outcome),
        outcome,
    }))
}

fn outcome_message(outcome: &GenerationOutcome) -> String {
    let generated = outcome.generated.len();
    if outcome.failed.is_empty() {
        return format!(
            "Generated {generated} interview(s) for {} at {}",
            outcome.role, outcome.company_name
        );
    }

    let failed = outcome
        .failed
        .iter()
        .map(|f| f.interview_type.label())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Generated {generated} of {} interview(s) for {} at {}; could not generate: {failed}",
        generated + outcome.failed.len(),
        outcome.role,
        outcome.company_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::orchestrator::{FailedGeneration, GeneratedInterview};
    use crate::models::interview::InterviewType;
    use uuid::Uuid;

    fn outcome(failed: Vec<FailedGeneration>) -> GenerationOutcome {
        GenerationOutcome {
            interview_list_id: Uuid::new_v4(),
            company_name: "Acme".into(),
            role: "SRE".into(),
            generated: vec![GeneratedInterview {
                interview_id: Uuid::new_v4(),
                interview_type: InterviewType::Technical,
                question_count: 5,
            }],
            failed,
        }
    }

    #[test]
    fn test_message_for_full_success() {
        assert_eq!(
            outcome_message(&outcome(vec![])),
            "Generated 1 interview(s) for SRE at Acme"
        );
    }

    #[test]
    fn test_message_names_failed_types() {
        let message = outcome_message(&outcome(vec![FailedGeneration {
            interview_type: InterviewType::CultureFit,
            reason: "bad output".into(),
        }]));
        assert!(message.starts_with("Generated 1 of 2"));
        assert!(message.ends_with("could not generate: Culture Fit"));
    }
}
