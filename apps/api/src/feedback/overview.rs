//! Overview Aggregator: rolls every feedback record of an interview list up
//! into one narrative, the mean score and the taken count.
//!
//! `refresh_overview` recomputes from scratch and is idempotent. The
//! incremental path (`OverviewMode::Incremental`) folds a single attempt into
//! the stored counters instead and leaves the narrative untouched.

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::config::OverviewMode;
use crate::errors::AppError;
use crate::feedback::prompts::OVERVIEW_PROMPT_TEMPLATE;
use crate::llm_client::prompts::INTERVIEWER_SYSTEM;
use crate::llm_client::{complete_json, LanguageModel};
use crate::models::interview_list::{InterviewListRow, OverviewUpdate};
use crate::store::InterviewStore;

#[derive(Debug, Deserialize)]
struct OverallAssessment {
    final_assessment: String,
}

/// Arithmetic mean; `None` when there is nothing to average.
pub fn average_score(scores: &[f64]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    Some(scores.iter().sum::<f64>() / scores.len() as f64)
}

pub fn build_overview_prompt(assessments: &[&str]) -> String {
    OVERVIEW_PROMPT_TEMPLATE.replace("{assessments}", &assessments.join("\n"))
}

/// Recomputes the overview of `parent_id` and returns the updated parent.
pub async fn refresh_overview(
    store: &dyn InterviewStore,
    llm: &dyn LanguageModel,
    parent_id: Uuid,
) -> Result<InterviewListRow, AppError> {
    let mut parent = store
        .get_interview_list(parent_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Interview list {parent_id} not found")))?;

    let interview_ids: Vec<Uuid> = store
        .list_interviews_by_parent(parent_id)
        .await?
        .into_iter()
        .map(|i| i.id)
        .collect();
    let feedback = store.list_feedback_for_interviews(&interview_ids).await?;

    let update = if feedback.is_empty() {
        OverviewUpdate {
            overall_feedback: None,
            average_score: None,
            total_interviews_taken: 0,
        }
    } else {
        let assessments: Vec<&str> = feedback
            .iter()
            .map(|f| f.final_assessment.as_str())
            .collect();
        let prompt = build_overview_prompt(&assessments);
        let overall: OverallAssessment = complete_json(llm, &prompt, INTERVIEWER_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Overview summary failed: {e}")))?;

        let narrative = overall.final_assessment.trim();
        if narrative.is_empty() {
            return Err(AppError::Llm("Overview summary was empty".to_string()));
        }

        let scores: Vec<f64> = feedback.iter().map(|f| f.total_score).collect();
        OverviewUpdate {
            overall_feedback: Some(narrative.to_string()),
            average_score: average_score(&scores),
            total_interviews_taken: feedback.len() as i32,
        }
    };

    store.update_overview(parent_id, &update).await?;

    info!(
        "Refreshed overview for list {parent_id}: taken={} average={:?}",
        update.total_interviews_taken, update.average_score
    );

    parent.overall_feedback = update.overall_feedback;
    parent.average_score = update.average_score;
    parent.total_interviews_taken = update.total_interviews_taken;
    Ok(parent)
}

/// Brings the parent overview up to date after one attempt was written.
pub async fn apply_attempt(
    store: &dyn InterviewStore,
    llm: &dyn LanguageModel,
    mode: OverviewMode,
    parent_id: Uuid,
    previous_score: Option<f64>,
    score: f64,
) -> Result<(), AppError> {
    match mode {
        OverviewMode::Recompute => refresh_overview(store, llm, parent_id).await.map(|_| ()),
        OverviewMode::Incremental => store.record_attempt(parent_id, previous_score, score).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{seed_feedback, seed_generation, FnModel, MemoryStore};

    #[test]
    fn test_average_of_scores() {
        assert_eq!(average_score(&[80.0, 60.0, 70.0]), Some(70.0));
        assert_eq!(average_score(&[55.5]), Some(55.5));
    }

    #[test]
    fn test_average_of_nothing_is_none() {
        assert_eq!(average_score(&[]), None);
    }

    #[test]
    fn test_overview_prompt_joins_assessments_by_line() {
        let prompt = build_overview_prompt(&["Strong on Rust.", "Weak on SQL."]);
        assert!(prompt.contains("Strong on Rust.\nWeak on SQL."));
    }

    #[tokio::test]
    async fn test_refresh_computes_mean_and_taken_count() {
        let store = MemoryStore::default();
        let (parent, children) = seed_generation(&store, "u1", 3).await;
        seed_feedback(&store, children[0].id, "u1", 90.0, "Great.").await;
        seed_feedback(&store, children[1].id, "u1", 60.0, "Okay.").await;

        let llm = FnModel::new(|prompt, _| {
            assert!(prompt.contains("Great."));
            assert!(prompt.contains("Okay."));
            Ok(r#"{"final_assessment": "Solid overall."}"#.into())
        });

        let updated = refresh_overview(&store, &llm, parent.id).await.unwrap();
        assert_eq!(updated.average_score, Some(75.0));
        assert_eq!(updated.total_interviews_taken, 2);
        assert_eq!(updated.overall_feedback.as_deref(), Some("Solid overall."));

        let stored = store.get_interview_list(parent.id).await.unwrap().unwrap();
        assert_eq!(stored.average_score, Some(75.0));
        assert_eq!(stored.total_interviews_generated, 3);
    }

    #[tokio::test]
    async fn test_refresh_is_idempotent() {
        let store = MemoryStore::default();
        let (parent, children) = seed_generation(&store, "u1", 1).await;
        seed_feedback(&store, children[0].id, "u1", 40.0, "Needs work.").await;
        let llm = FnModel::new(|_, _| Ok(r#"{"final_assessment": "Needs work."}"#.into()));

        let first = refresh_overview(&store, &llm, parent.id).await.unwrap();
        let second = refresh_overview(&store, &llm, parent.id).await.unwrap();
        assert_eq!(first.total_interviews_taken, second.total_interviews_taken);
        assert_eq!(first.average_score, second.average_score);
    }

    #[tokio::test]
    async fn test_refresh_without_feedback_skips_model_and_clears_overview() {
        let store = MemoryStore::default();
        let (parent, _) = seed_generation(&store, "u1", 2).await;
        let llm = FnModel::new(|_, _| panic!("no feedback means no summary call"));

        let updated = refresh_overview(&store, &llm, parent.id).await.unwrap();
        assert_eq!(updated.average_score, None);
        assert_eq!(updated.overall_feedback, None);
        assert_eq!(updated.total_interviews_taken, 0);
    }

    #[tokio::test]
    async fn test_refresh_ignores_feedback_of_other_lists() {
        let store = MemoryStore::default();
        let (parent, _) = seed_generation(&store, "u1", 1).await;
        let (_, other_children) = seed_generation(&store, "u1", 1).await;
        seed_feedback(&store, other_children[0].id, "u1", 10.0, "Other list.").await;
        let llm = FnModel::new(|_, _| panic!("feedback of another list must not be summarized"));

        let updated = refresh_overview(&store, &llm, parent.id).await.unwrap();
        assert_eq!(updated.total_interviews_taken, 0);
    }

    #[tokio::test]
    async fn test_refresh_unknown_parent_is_not_found() {
        let store = MemoryStore::default();
        let llm = FnModel::new(|_, _| Ok(String::new()));
        let result = refresh_overview(&store, &llm, Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_incremental_mode_updates_running_mean() {
        let store = MemoryStore::default();
        let (parent, _) = seed_generation(&store, "u1", 2).await;
        let llm = FnModel::new(|_, _| panic!("incremental mode does not summarize"));

        apply_attempt(&store, &llm, OverviewMode::Incremental, parent.id, None, 80.0)
            .await
            .unwrap();
        apply_attempt(&store, &llm, OverviewMode::Incremental, parent.id, None, 60.0)
            .await
            .unwrap();
        let stored = store.get_interview_list(parent.id).await.unwrap().unwrap();
        assert_eq!(stored.total_interviews_taken, 2);
        assert_eq!(stored.average_score, Some(70.0));

        // Overwriting the 60 with a 90 shifts the mean without counting a new attempt.
        apply_attempt(&store, &llm, OverviewMode::Incremental, parent.id, Some(60.0), 90.0)
            .await
            .unwrap();
        let stored = store.get_interview_list(parent.id).await.unwrap().unwrap();
        assert_eq!(stored.total_interviews_taken, 2);
        assert_eq!(stored.average_score, Some(85.0));
    }
}
