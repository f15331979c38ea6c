//! Test doubles shared across unit tests: an in-memory `InterviewStore`, a
//! closure-driven `LanguageModel`, a canned `JobCrawler` and seeding helpers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use sqlx::types::Json;
use uuid::Uuid;

use crate::auth::Claims;
use crate::config::{Config, OverviewMode};
use crate::errors::AppError;
use crate::generation::job_extractor::{JobCrawler, JobProfile};
use crate::llm_client::{LanguageModel, LlmError};
use crate::models::feedback::{CategoryScore, FeedbackRow, FEEDBACK_CATEGORIES};
use crate::models::interview::{InterviewRow, InterviewType};
use crate::models::interview_list::{InterviewListRow, OverviewUpdate};
use crate::state::AppState;
use crate::store::InterviewStore;

pub const TEST_SECRET: &str = "test-secret-key-minimum-32-chars!!";

// ────────────────────────────────────────────────────────────────────────────
// Model and crawler doubles
// ────────────────────────────────────────────────────────────────────────────

type Responder = dyn Fn(&str, &str) -> Result<String, LlmError> + Send + Sync;

/// A language model whose answer is computed from (prompt, system).
pub struct FnModel {
    respond: Box<Responder>,
}

impl FnModel {
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(&str, &str) -> Result<String, LlmError> + Send + Sync + 'static,
    {
        Self {
            respond: Box::new(respond),
        }
    }
}

#[async_trait]
impl LanguageModel for FnModel {
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        (self.respond)(prompt, system)
    }
}

/// A crawler that always returns the same payload and counts its calls.
pub struct StaticCrawler {
    payload: Value,
    calls: AtomicUsize,
}

impl StaticCrawler {
    pub fn new(payload: Value) -> Self {
        Self {
            payload,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobCrawler for StaticCrawler {
    async fn scrape(&self, _url: &str, _instruction: &str) -> Result<Value, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.payload.clone())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory store
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Tables {
    lists: Vec<InterviewListRow>,
    interviews: Vec<InterviewRow>,
    feedback: Vec<FeedbackRow>,
}

/// Mirrors the queries of `PgInterviewStore` over plain vectors.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn feedback_count(&self) -> usize {
        self.tables.lock().unwrap().feedback.len()
    }

    /// Adds interviews without a parent write, for read-side scenarios.
    pub fn push_interviews(&self, rows: Vec<InterviewRow>) {
        self.tables.lock().unwrap().interviews.extend(rows);
    }
}

fn newest_first<T>(
    rows: impl Iterator<Item = T>,
    key: impl Fn(&T) -> chrono::DateTime<Utc>,
) -> Vec<T> {
    let mut rows: Vec<T> = rows.collect();
    rows.sort_by_key(|r| std::cmp::Reverse(key(r)));
    rows
}

#[async_trait]
impl InterviewStore for MemoryStore {
    async fn insert_generation(
        &self,
        parent: &InterviewListRow,
        children: &[InterviewRow],
    ) -> Result<(), AppError> {
        let mut tables = self.tables.lock().unwrap();
        tables.lists.push(parent.clone());
        tables.interviews.extend(children.iter().cloned());
        Ok(())
    }

    async fn get_interview_list(&self, id: Uuid) -> Result<Option<InterviewListRow>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.lists.iter().find(|l| l.id == id).cloned())
    }

    async fn list_interview_lists_by_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<InterviewListRow>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(newest_first(
            tables.lists.iter().filter(|l| l.user_id == user_id).cloned(),
            |l| l.created_at,
        ))
    }

    async fn get_interview(&self, id: Uuid) -> Result<Option<InterviewRow>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.interviews.iter().find(|i| i.id == id).cloned())
    }

    async fn list_interviews_by_user(&self, user_id: &str) -> Result<Vec<InterviewRow>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(newest_first(
            tables
                .interviews
                .iter()
                .filter(|i| i.user_id == user_id)
                .cloned(),
            |i| i.created_at,
        ))
    }

    async fn list_interviews_by_parent(
        &self,
        parent_id: Uuid,
    ) -> Result<Vec<InterviewRow>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(newest_first(
            tables
                .interviews
                .iter()
                .filter(|i| i.interview_list_id == parent_id)
                .cloned(),
            |i| i.created_at,
        ))
    }

    async fn list_latest_interviews(
        &self,
        excluded_user_id: &str,
        limit: i64,
    ) -> Result<Vec<InterviewRow>, AppError> {
        let tables = self.tables.lock().unwrap();
        let mut rows = newest_first(
            tables
                .interviews
                .iter()
                .filter(|i| i.finalized && i.user_id != excluded_user_id)
                .cloned(),
            |i| i.created_at,
        );
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn get_feedback(&self, id: Uuid) -> Result<Option<FeedbackRow>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.feedback.iter().find(|f| f.id == id).cloned())
    }

    async fn get_feedback_by_interview(
        &self,
        interview_id: Uuid,
        user_id: &str,
    ) -> Result<Option<FeedbackRow>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(newest_first(
            tables
                .feedback
                .iter()
                .filter(|f| f.interview_id == interview_id && f.user_id == user_id)
                .cloned(),
            |f| f.created_at,
        )
        .into_iter()
        .next())
    }

    async fn list_feedback_for_interviews(
        &self,
        interview_ids: &[Uuid],
    ) -> Result<Vec<FeedbackRow>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .feedback
            .iter()
            .filter(|f| interview_ids.contains(&f.interview_id))
            .cloned()
            .collect())
    }

    async fn upsert_feedback(&self, feedback: &FeedbackRow) -> Result<(), AppError> {
        let mut tables = self.tables.lock().unwrap();
        match tables.feedback.iter().position(|f| f.id == feedback.id) {
            Some(index) => tables.feedback[index] = feedback.clone(),
            None => tables.feedback.push(feedback.clone()),
        }
        Ok(())
    }

    async fn update_overview(
        &self,
        parent_id: Uuid,
        update: &OverviewUpdate,
    ) -> Result<(), AppError> {
        let mut tables = self.tables.lock().unwrap();
        let parent = tables
            .lists
            .iter_mut()
            .find(|l| l.id == parent_id)
            .ok_or_else(|| AppError::NotFound(format!("Interview list {parent_id} not found")))?;
        parent.overall_feedback = update.overall_feedback.clone();
        parent.average_score = update.average_score;
        parent.total_interviews_taken = update.total_interviews_taken;
        Ok(())
    }

    async fn record_attempt(
        &self,
        parent_id: Uuid,
        previous_score: Option<f64>,
        score: f64,
    ) -> Result<(), AppError> {
        let mut tables = self.tables.lock().unwrap();
        let parent = tables
            .lists
            .iter_mut()
            .find(|l| l.id == parent_id)
            .ok_or_else(|| AppError::NotFound(format!("Interview list {parent_id} not found")))?;

        let taken = parent.total_interviews_taken as f64;
        let average = parent.average_score.unwrap_or(0.0);
        match previous_score {
            None => {
                parent.average_score = Some((average * taken + score) / (taken + 1.0));
                parent.total_interviews_taken += 1;
            }
            Some(previous) if taken > 0.0 => {
                parent.average_score = Some(average + (score - previous) / taken);
            }
            Some(_) => {
                parent.average_score = Some(score);
                parent.total_interviews_taken = 1;
            }
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fixtures
// ────────────────────────────────────────────────────────────────────────────

pub fn sample_profile() -> JobProfile {
    JobProfile {
        company: "Acme".into(),
        role: "Backend Engineer".into(),
        level: Some("Senior".into()),
        techstack: vec!["Rust".into(), "PostgreSQL".into()],
        technical: true,
    }
}

pub fn interview_row(parent_id: Uuid, user_id: &str, interview_type: InterviewType) -> InterviewRow {
    InterviewRow {
        id: Uuid::new_v4(),
        interview_list_id: parent_id,
        user_id: user_id.to_string(),
        role: "Backend Engineer".into(),
        interview_type,
        level: Some("Senior".into()),
        techstack: vec!["Rust".into()],
        questions: vec!["Why Rust?".into()],
        finalized: true,
        cover_image: "/covers/adobe.png".into(),
        created_at: Utc::now(),
    }
}

/// Stores a parent with `children` interviews owned by `user_id`.
pub async fn seed_generation(
    store: &dyn InterviewStore,
    user_id: &str,
    children: usize,
) -> (InterviewListRow, Vec<InterviewRow>) {
    let now = Utc::now();
    let parent = InterviewListRow {
        id: Uuid::new_v4(),
        user_id: user_id.to_string(),
        job_link: Some("https://jobs.example.com/seed".into()),
        company_name: "Acme".into(),
        role: "Backend Engineer".into(),
        level: Some("Senior".into()),
        metadata: json!({}),
        total_interviews_generated: children as i32,
        total_interviews_taken: 0,
        overall_feedback: None,
        average_score: None,
        created_at: now,
    };
    let rows: Vec<InterviewRow> = (0..children)
        .map(|i| {
            let mut row = interview_row(parent.id, user_id, InterviewType::ALL[i % 4]);
            row.created_at = now + Duration::milliseconds(i as i64);
            row
        })
        .collect();

    store.insert_generation(&parent, &rows).await.unwrap();
    (parent, rows)
}

pub async fn seed_feedback(
    store: &dyn InterviewStore,
    interview_id: Uuid,
    user_id: &str,
    total_score: f64,
    final_assessment: &str,
) -> FeedbackRow {
    let feedback = FeedbackRow {
        id: Uuid::new_v4(),
        interview_id,
        user_id: user_id.to_string(),
        total_score,
        category_scores: Json(
            FEEDBACK_CATEGORIES
                .iter()
                .map(|name| CategoryScore {
                    name: name.to_string(),
                    score: total_score,
                    comment: String::new(),
                })
                .collect(),
        ),
        strengths: vec![],
        areas_for_improvement: vec![],
        final_assessment: final_assessment.to_string(),
        created_at: Utc::now(),
    };
    store.upsert_feedback(&feedback).await.unwrap();
    feedback
}

pub fn session_token(user_id: &str) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (Utc::now() + Duration::hours(1)).timestamp(),
    };
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".into(),
        anthropic_api_key: "test".into(),
        crawler_api_key: "test".into(),
        crawler_api_url: "http://localhost/unused".into(),
        auth_jwt_secret: TEST_SECRET.into(),
        overview_mode: OverviewMode::Recompute,
        port: 0,
        rust_log: "debug".into(),
    }
}

pub fn test_state(
    store: Arc<dyn InterviewStore>,
    llm: Arc<dyn LanguageModel>,
    crawler: Arc<dyn JobCrawler>,
) -> AppState {
    AppState {
        store,
        llm,
        crawler,
        config: test_config(),
    }
}
