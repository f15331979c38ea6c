//! Job-Metadata Extractor: turns a job link or pasted description into a
//! validated `JobProfile`.
//!
//! Link sources go through the hosted crawler; description sources go through
//! the language model. Both outputs are untyped until `RawJobProfile::validate`
//! accepts them, and a profile without a company or role is rejected before
//! anything is persisted.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::generation::prompts::{
    CRAWLER_INSTRUCTION, JD_EXTRACT_PROMPT_TEMPLATE, JD_EXTRACT_SYSTEM,
};
use crate::llm_client::prompts::NO_INVENTION_INSTRUCTION;
use crate::llm_client::{complete_json, parse_json_text, LanguageModel};

const CRAWLER_ID: &str = "webcrawler/ai";
/// Wrapper keys under which crawl services nest the extracted object.
const PAYLOAD_KEYS: [&str; 4] = ["structured_data", "result", "data", "output"];
const MAX_PAYLOAD_DEPTH: usize = 3;

// ────────────────────────────────────────────────────────────────────────────
// Crawler seam
// ────────────────────────────────────────────────────────────────────────────

/// A hosted crawl/extraction service: URL plus natural-language instruction
/// in, JSON-like object out.
#[async_trait]
pub trait JobCrawler: Send + Sync {
    async fn scrape(&self, url: &str, instruction: &str) -> Result<Value, AppError>;
}

#[derive(Debug, Serialize)]
struct ScrapeRequest<'a> {
    crawler_id: &'a str,
    input: ScrapeInput<'a>,
}

#[derive(Debug, Serialize)]
struct ScrapeInput<'a> {
    url: &'a str,
    prompt: &'a str,
}

/// HTTP client for the hosted web-crawler API.
#[derive(Clone)]
pub struct WebCrawlerClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl WebCrawlerClient {
    pub fn new(api_url: String, api_key: String) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(180))
            .build()
            .map_err(|e| AppError::Crawler(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_url,
            api_key,
        })
    }
}

#[async_trait]
impl JobCrawler for WebCrawlerClient {
    async fn scrape(&self, url: &str, instruction: &str) -> Result<Value, AppError> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&ScrapeRequest {
                crawler_id: CRAWLER_ID,
                input: ScrapeInput {
                    url,
                    prompt: instruction,
                },
            })
            .send()
            .await
            .map_err(|e| AppError::Crawler(format!("Request to crawler failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Crawler(format!(
                "Crawler returned {status}: {body}"
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| AppError::Crawler(format!("Crawler response was not JSON: {e}")))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Where the job description comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum JobSource {
    Link(String),
    Description(String),
}

impl JobSource {
    pub fn kind(&self) -> &'static str {
        match self {
            JobSource::Link(_) => "link",
            JobSource::Description(_) => "description",
        }
    }

    pub fn link(&self) -> Option<&str> {
        match self {
            JobSource::Link(url) => Some(url),
            JobSource::Description(_) => None,
        }
    }
}

/// Validated job metadata that drives question generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobProfile {
    pub company: String,
    pub role: String,
    pub level: Option<String>,
    pub techstack: Vec<String>,
    pub technical: bool,
}

/// Extraction result: the validated profile and the untouched upstream payload.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub profile: JobProfile,
    pub raw: Value,
}

/// Best-effort upstream shape. Every field may be absent or null.
#[derive(Debug, Default, Deserialize)]
pub struct RawJobProfile {
    #[serde(default, alias = "company_name", alias = "companyName")]
    pub company: Option<String>,
    #[serde(default, alias = "job_title", alias = "title")]
    pub role: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default, alias = "tech_stack", alias = "techStack")]
    pub techstack: Option<Value>,
    #[serde(default, alias = "isTechnical", alias = "is_technical")]
    pub technical: Option<bool>,
}

impl RawJobProfile {
    /// Accepts the payload only if company and role are present.
    pub fn validate(self) -> Result<JobProfile, AppError> {
        let company = non_blank(self.company).ok_or_else(|| {
            AppError::UnprocessableEntity(
                "Could not determine the company from the job posting".to_string(),
            )
        })?;
        let role = non_blank(self.role).ok_or_else(|| {
            AppError::UnprocessableEntity(
                "Could not determine the role from the job posting".to_string(),
            )
        })?;

        let level = non_blank(self.level)
            .filter(|l| !matches!(l.to_ascii_lowercase().as_str(), "null" | "unknown" | "n/a"));

        Ok(JobProfile {
            company,
            role,
            level,
            techstack: normalize_techstack(self.techstack),
            technical: self.technical.unwrap_or(false),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Accepts an array of strings or a comma-separated string. Duplicates are
/// dropped case-insensitively; order is kept.
fn normalize_techstack(value: Option<Value>) -> Vec<String> {
    let items: Vec<String> = match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        Some(Value::String(s)) => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };

    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_lowercase()))
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Extraction
// ────────────────────────────────────────────────────────────────────────────

/// Checks that a job link is an absolute http(s) URL.
pub fn validate_job_link(link: &str) -> Result<String, AppError> {
    let url = Url::parse(link.trim())
        .map_err(|e| AppError::Validation(format!("job_link is not a valid URL: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::Validation(
            "job_link must use http or https".to_string(),
        ));
    }
    Ok(url.to_string())
}

/// Unwraps the object a crawler nested inside its response envelope.
pub fn unwrap_crawler_payload(value: Value) -> Result<Value, AppError> {
    let mut current = value;
    for _ in 0..=MAX_PAYLOAD_DEPTH {
        current = match current {
            Value::String(text) => parse_json_text::<Value>(&text).map_err(|e| {
                AppError::UnprocessableEntity(format!("Crawler output was not JSON: {e}"))
            })?,
            Value::Object(map) if map.contains_key("role") || map.contains_key("company") => {
                return Ok(Value::Object(map));
            }
            Value::Object(mut map) => match PAYLOAD_KEYS.iter().find_map(|k| map.remove(*k)) {
                Some(inner) => inner,
                None => return Ok(Value::Object(map)),
            },
            other => {
                return Err(AppError::UnprocessableEntity(format!(
                    "Crawler output had unexpected shape: {other}"
                )))
            }
        };
    }
    Err(AppError::UnprocessableEntity(
        "Crawler output was nested too deeply".to_string(),
    ))
}

fn profile_from_value(raw: &Value) -> Result<JobProfile, AppError> {
    let parsed: RawJobProfile = serde_json::from_value(raw.clone()).map_err(|e| {
        AppError::UnprocessableEntity(format!("Extracted job metadata was malformed: {e}"))
    })?;
    parsed.validate()
}

/// Builds the description-extraction prompt. Each call starts a fresh exchange.
pub fn build_description_prompt(jd_text: &str) -> String {
    JD_EXTRACT_PROMPT_TEMPLATE
        .replace("{no_invention}", NO_INVENTION_INSTRUCTION)
        .replace("{jd_text}", jd_text)
}

/// Extracts and validates a job profile from either source.
pub async fn extract_job_profile(
    source: &JobSource,
    llm: &dyn LanguageModel,
    crawler: &dyn JobCrawler,
) -> Result<Extraction, AppError> {
    let raw = match source {
        JobSource::Link(url) => {
            info!("Crawling job link {url}");
            let response = crawler.scrape(url, CRAWLER_INSTRUCTION).await?;
            unwrap_crawler_payload(response)?
        }
        JobSource::Description(text) => {
            info!("Extracting job profile from {} chars of description", text.len());
            let prompt = build_description_prompt(text);
            complete_json::<Value>(llm, &prompt, JD_EXTRACT_SYSTEM)
                .await
                .map_err(|e| AppError::Llm(format!("Job description extraction failed: {e}")))?
        }
    };

    debug!("Raw job extraction: {raw}");
    let profile = profile_from_value(&raw)?;
    info!(
        "Extracted profile: role={:?} company={:?} level={:?} techstack={}",
        profile.role,
        profile.company,
        profile.level,
        profile.techstack.len()
    );

    Ok(Extraction { profile, raw })
}

/// Serializable summary of an extraction for the parent's metadata blob.
pub fn extraction_metadata(source: &JobSource, extraction: &Extraction) -> Value {
    json!({
        "source": source.kind(),
        "extraction": extraction.raw,
        "profile": extraction.profile,
    })
}
