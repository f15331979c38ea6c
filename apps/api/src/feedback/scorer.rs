//! Feedback Scorer: scores one interview attempt from its transcript.
//!
//! Flow: validate request → load interview → model scores the five fixed
//! categories → validate scores → upsert keyed by feedback id → update the
//! parent overview per `OverviewMode`.

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::OverviewMode;
use crate::errors::AppError;
use crate::feedback::overview::apply_attempt;
use crate::feedback::prompts::{CATEGORY_GUIDE, FEEDBACK_PROMPT_TEMPLATE};
use crate::llm_client::prompts::INTERVIEWER_SYSTEM;
use crate::llm_client::{complete_json, LanguageModel};
use crate::models::feedback::{CategoryScore, FeedbackRow, TranscriptMessage, FEEDBACK_CATEGORIES};
use crate::store::InterviewStore;

const MAX_SCORE: f64 = 100.0;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Request body for feedback creation. A supplied `feedback_id` overwrites
/// the existing record with that id instead of creating a new one.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFeedbackRequest {
    pub interview_id: Uuid,
    pub user_id: String,
    pub transcript: Vec<TranscriptMessage>,
    #[serde(default)]
    pub feedback_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateFeedbackResponse {
    pub success: bool,
    pub feedback_id: Uuid,
}

/// Structured output requested from the model.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackAssessment {
    pub total_score: f64,
    pub category_scores: Vec<CategoryScore>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub areas_for_improvement: Vec<String>,
    pub final_assessment: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Prompt and validation
// ────────────────────────────────────────────────────────────────────────────

/// One `- role: content` line per transcript message.
pub fn format_transcript(transcript: &[TranscriptMessage]) -> String {
    transcript
        .iter()
        .map(|m| format!("- {}: {}\n", m.role, m.content))
        .collect()
}

pub fn build_feedback_prompt(transcript: &[TranscriptMessage]) -> String {
    let categories = CATEGORY_GUIDE
        .iter()
        .map(|(name, guide)| format!("- **{name}**: {guide}"))
        .collect::<Vec<_>>()
        .join("\n");

    FEEDBACK_PROMPT_TEMPLATE
        .replace("{transcript}", &format_transcript(transcript))
        .replace("{categories}", &categories)
}

/// Older category labels still produced by models, mapped to canonical names.
const CATEGORY_ALIASES: [(&str, &str); 2] = [
    ("Cultural & Role Fit", "Cultural Fit"),
    ("Confidence & Clarity", "Confidence and Clarity"),
];

/// Lowercased alphanumeric words, so "Problem-Solving" matches "Problem Solving".
fn normalize_words(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

fn category_key(name: &str) -> String {
    let key = normalize_words(name);
    CATEGORY_ALIASES
        .iter()
        .find(|(alias, _)| normalize_words(alias) == key)
        .map(|(_, canonical)| normalize_words(canonical))
        .unwrap_or(key)
}

fn check_score(label: &str, score: f64) -> Result<(), AppError> {
    if !score.is_finite() || !(0.0..=MAX_SCORE).contains(&score) {
        return Err(AppError::Llm(format!(
            "{label} score {score} is outside 0..=100"
        )));
    }
    Ok(())
}

/// Rejects out-of-range scores and any category set other than the fixed
/// five; returns the categories in canonical order with canonical names.
pub fn validate_assessment(mut assessment: FeedbackAssessment) -> Result<FeedbackAssessment, AppError> {
    check_score("Total", assessment.total_score)?;

    if assessment.final_assessment.trim().is_empty() {
        return Err(AppError::Llm("Final assessment was empty".to_string()));
    }

    let mut by_key: HashMap<String, CategoryScore> = HashMap::new();
    for category in assessment.category_scores.drain(..) {
        let key = category_key(&category.name);
        if by_key.insert(key, category.clone()).is_some() {
            return Err(AppError::Llm(format!(
                "Category '{}' was scored more than once",
                category.name
            )));
        }
    }

    let mut canonical = Vec::with_capacity(FEEDBACK_CATEGORIES.len());
    for name in FEEDBACK_CATEGORIES {
        let mut category = by_key.remove(&category_key(name)).ok_or_else(|| {
            AppError::Llm(format!("Category '{name}' is missing from the assessment"))
        })?;
        check_score(name, category.score)?;
        category.name = name.to_string();
        canonical.push(category);
    }

    if let Some(extra) = by_key.into_values().next() {
        return Err(AppError::Llm(format!(
            "Unexpected category '{}' in the assessment",
            extra.name
        )));
    }

    assessment.category_scores = canonical;
    assessment.final_assessment = assessment.final_assessment.trim().to_string();
    Ok(assessment)
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Scores a transcript and writes the feedback record.
///
/// The feedback write is the outcome of this call; a failing overview update
/// afterwards is logged and does not undo or fail it.
pub async fn create_feedback(
    store: &dyn InterviewStore,
    llm: &dyn LanguageModel,
    mode: OverviewMode,
    request: &CreateFeedbackRequest,
) -> Result<FeedbackRow, AppError> {
    if request.transcript.is_empty() {
        return Err(AppError::Validation("transcript cannot be empty".to_string()));
    }
    if request.user_id.trim().is_empty() {
        return Err(AppError::Validation("user_id cannot be empty".to_string()));
    }

    let interview = store
        .get_interview(request.interview_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Interview {} not found", request.interview_id))
        })?;

    // An existing record may only be overwritten by its owner, for the same interview.
    let previous_score = match request.feedback_id {
        Some(id) => match store.get_feedback(id).await? {
            Some(existing) if existing.user_id != request.user_id => {
                return Err(AppError::Forbidden(format!(
                    "Feedback {id} belongs to another user"
                )))
            }
            Some(existing) if existing.interview_id != interview.id => {
                return Err(AppError::Validation(format!(
                    "Feedback {id} was recorded for interview {}, not {}",
                    existing.interview_id, interview.id
                )))
            }
            Some(existing) => Some(existing.total_score),
            None => None,
        },
        None => None,
    };

    let prompt = build_feedback_prompt(&request.transcript);
    let assessment: FeedbackAssessment = complete_json(llm, &prompt, INTERVIEWER_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Feedback scoring failed: {e}")))?;
    let assessment = validate_assessment(assessment)?;

    let feedback = FeedbackRow {
        id: request.feedback_id.unwrap_or_else(Uuid::new_v4),
        interview_id: interview.id,
        user_id: request.user_id.clone(),
        total_score: assessment.total_score,
        category_scores: Json(assessment.category_scores),
        strengths: assessment.strengths,
        areas_for_improvement: assessment.areas_for_improvement,
        final_assessment: assessment.final_assessment,
        created_at: Utc::now(),
    };

    store.upsert_feedback(&feedback).await?;
    info!(
        "Stored feedback {} for interview {} (score {})",
        feedback.id, interview.id, feedback.total_score
    );

    if let Err(e) = apply_attempt(
        store,
        llm,
        mode,
        interview.interview_list_id,
        previous_score,
        feedback.total_score,
    )
    .await
    {
        warn!(
            "Overview update for list {} failed after feedback {}: {e}",
            interview.interview_list_id, feedback.id
        );
    }

    Ok(feedback)
}
