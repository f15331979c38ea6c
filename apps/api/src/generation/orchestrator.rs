//! Interview generation: orchestrates the full pipeline for one request.
//!
//! Flow: validate request → extract job profile → fan out question generation
//! (one concurrent model call per interview type) → write parent and the
//! successful children in a single transaction → report per-type outcome.
//!
//! Nothing is written when every type fails. When some types fail, the parent
//! counts only the children actually written, and the failed types are
//! recorded in its metadata and returned to the caller.

use std::collections::HashSet;

use chrono::Utc;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::job_extractor::{
    extract_job_profile, extraction_metadata, validate_job_link, JobCrawler, JobSource,
};
use crate::generation::question_generator::{generate_question_set, random_cover_image};
use crate::llm_client::LanguageModel;
use crate::models::interview::{InterviewRow, InterviewType};
use crate::models::interview_list::InterviewListRow;
use crate::store::InterviewStore;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Request body for interview generation. Exactly one of `job_link` and
/// `job_description` must be provided.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateInterviewRequest {
    #[serde(default)]
    pub job_link: Option<String>,
    #[serde(default)]
    pub job_description: Option<String>,
    pub interview_types: Vec<String>,
}

impl GenerateInterviewRequest {
    /// Validates the request and resolves it into a source and typed labels.
    pub fn validate(&self) -> Result<(JobSource, Vec<InterviewType>), AppError> {
        let link = self.job_link.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let description = self
            .job_description
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let source = match (link, description) {
            (Some(link), None) => JobSource::Link(validate_job_link(link)?),
            (None, Some(text)) => JobSource::Description(text.to_string()),
            (Some(_), Some(_)) => {
                return Err(AppError::Validation(
                    "Provide either job_link or job_description, not both".to_string(),
                ))
            }
            (None, None) => {
                return Err(AppError::Validation(
                    "job_link or job_description is required".to_string(),
                ))
            }
        };

        if self.interview_types.is_empty() {
            return Err(AppError::Validation(
                "interview_types must contain at least one interview type".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let mut types = Vec::with_capacity(self.interview_types.len());
        for label in &self.interview_types {
            let interview_type: InterviewType = label.parse().map_err(AppError::Validation)?;
            if !seen.insert(interview_type) {
                return Err(AppError::Validation(format!(
                    "interview type '{interview_type}' was requested more than once"
                )));
            }
            types.push(interview_type);
        }

        Ok((source, types))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedInterview {
    pub interview_id: Uuid,
    pub interview_type: InterviewType,
    pub question_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedGeneration {
    pub interview_type: InterviewType,
    pub reason: String,
}

/// Result of a generation request that wrote at least one interview.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    pub interview_list_id: Uuid,
    pub company_name: String,
    pub role: String,
    pub generated: Vec<GeneratedInterview>,
    pub failed: Vec<FailedGeneration>,
}

/// Caller-facing reason for a failed type. Upstream detail stays in the logs.
fn failure_reason(error: &AppError) -> &'static str {
    match error {
        AppError::Llm(_) => "The model did not return a usable question set",
        _ => "Question generation failed",
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Generation pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs the full generation pipeline for `user_id`.
///
/// Steps:
/// 1. validate request → (JobSource, Vec<InterviewType>)
/// 2. extract_job_profile() → Extraction
/// 3. generate_question_set() per type, all dispatched concurrently
/// 4. build the parent and one child row per successful type
/// 5. insert_generation() in a single transaction
pub async fn generate_interviews(
    store: &dyn InterviewStore,
    llm: &dyn LanguageModel,
    crawler: &dyn JobCrawler,
    user_id: &str,
    request: &GenerateInterviewRequest,
) -> Result<GenerationOutcome, AppError> {
    // Step 1: Validate
    let (source, types) = request.validate()?;
    info!(
        "Generating {} interview types from {} for user {user_id}",
        types.len(),
        source.kind()
    );

    // Step 2: Extract job profile
    let extraction = extract_job_profile(&source, llm, crawler).await?;
    let profile = &extraction.profile;

    // Step 3: Fan out question generation
    let results = join_all(types.iter().map(|&interview_type| async move {
        (
            interview_type,
            generate_question_set(llm, profile, interview_type).await,
        )
    }))
    .await;

    // Step 4: Build rows for successful types
    let parent_id = Uuid::new_v4();
    let now = Utc::now();
    let mut children = Vec::new();
    let mut failed = Vec::new();
    let mut first_error = None;

    for (interview_type, result) in results {
        match result {
            Ok(questions) => children.push(InterviewRow {
                id: Uuid::new_v4(),
                interview_list_id: parent_id,
                user_id: user_id.to_string(),
                role: profile.role.clone(),
                interview_type,
                level: profile.level.clone(),
                techstack: profile.techstack.clone(),
                questions,
                finalized: true,
                cover_image: random_cover_image(),
                created_at: now,
            }),
            Err(e) => {
                warn!("{interview_type} generation failed for list {parent_id}: {e}");
                failed.push(FailedGeneration {
                    interview_type,
                    reason: failure_reason(&e).to_string(),
                });
                first_error.get_or_insert(e);
            }
        }
    }

    if children.is_empty() {
        return Err(first_error.unwrap_or_else(|| {
            AppError::Validation("No interview types were requested".to_string())
        }));
    }

    let mut metadata = extraction_metadata(&source, &extraction);
    metadata["interview_types"] = json!(types.iter().map(|t| t.label()).collect::<Vec<_>>());
    metadata["failed_types"] = json!(failed
        .iter()
        .map(|f| f.interview_type.label())
        .collect::<Vec<_>>());

    let parent = InterviewListRow {
        id: parent_id,
        user_id: user_id.to_string(),
        job_link: source.link().map(str::to_string),
        company_name: profile.company.clone(),
        role: profile.role.clone(),
        level: profile.level.clone(),
        metadata,
        total_interviews_generated: children.len() as i32,
        total_interviews_taken: 0,
        overall_feedback: None,
        average_score: None,
        created_at: now,
    };

    // Step 5: Persist parent and children atomically
    store.insert_generation(&parent, &children).await?;

    info!(
        "Generated interview list {parent_id}: {} written, {} failed",
        children.len(),
        failed.len()
    );

    Ok(GenerationOutcome {
        interview_list_id: parent_id,
        company_name: parent.company_name,
        role: parent.role,
        generated: children
            .iter()
            .map(|c| GeneratedInterview {
                interview_id: c.id,
                interview_type: c.interview_type,
                question_count: c.questions.len(),
            })
            .collect(),
        failed,
    })
}
