use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The focus of one generated question set. Labels are the wire and storage
/// representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "interview_type")]
pub enum InterviewType {
    Technical,
    Behavioral,
    #[serde(rename = "System Design")]
    #[sqlx(rename = "System Design")]
    SystemDesign,
    #[serde(rename = "Culture Fit")]
    #[sqlx(rename = "Culture Fit")]
    CultureFit,
}

impl InterviewType {
    pub const ALL: [InterviewType; 4] = [
        InterviewType::Technical,
        InterviewType::Behavioral,
        InterviewType::SystemDesign,
        InterviewType::CultureFit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Technical => "Technical",
            Self::Behavioral => "Behavioral",
            Self::SystemDesign => "System Design",
            Self::CultureFit => "Culture Fit",
        }
    }
}

impl fmt::Display for InterviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for InterviewType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        InterviewType::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                format!(
                    "unknown interview type '{wanted}' (expected one of: {})",
                    InterviewType::ALL.map(|t| t.label()).join(", ")
                )
            })
    }
}

/// One generated question set (child of an interview list).
/// Written once at generation time and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InterviewRow {
    pub id: Uuid,
    pub interview_list_id: Uuid,
    pub user_id: String,
    pub role: String,
    #[serde(rename = "type")]
    pub interview_type: InterviewType,
    pub level: Option<String>,
    pub techstack: Vec<String>,
    pub questions: Vec<String>,
    pub finalized: bool,
    pub cover_image: String,
    pub created_at: DateTime<Utc>,
}
