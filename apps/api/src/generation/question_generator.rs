//! Question-Set Generator: one model call per (profile, interview type).
//!
//! The model answers with a JSON array literal. The answer is accepted only if
//! it holds between one and `MAX_QUESTIONS` non-blank strings, none of which
//! contains a character the speech synthesizer cannot read.

use rand::seq::SliceRandom;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::generation::job_extractor::JobProfile;
use crate::generation::prompts::{QUESTIONS_PROMPT_TEMPLATE, QUESTIONS_SYSTEM};
use crate::llm_client::{parse_json_text, LanguageModel};
use crate::models::interview::InterviewType;

pub const MAX_QUESTIONS: usize = 5;

/// Characters that break the voice assistant reading the questions aloud.
pub const SPEECH_UNSAFE_CHARS: [char; 7] = ['/', '*', '#', '`', '|', '\\', '~'];

const COVER_IMAGES: [&str; 12] = [
    "/covers/adobe.png",
    "/covers/amazon.png",
    "/covers/facebook.png",
    "/covers/hostinger.png",
    "/covers/pinterest.png",
    "/covers/quora.png",
    "/covers/reddit.png",
    "/covers/skype.png",
    "/covers/spotify.png",
    "/covers/telegram.png",
    "/covers/tiktok.png",
    "/covers/yahoo.png",
];

pub fn random_cover_image() -> String {
    COVER_IMAGES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(COVER_IMAGES[0])
        .to_string()
}

pub fn build_question_prompt(profile: &JobProfile, interview_type: InterviewType) -> String {
    let level_line = match &profile.level {
        Some(level) => format!("The job experience level is {level}."),
        None => "The job experience level is unknown, so curate a mix of questions across all levels."
            .to_string(),
    };

    let stack_line = match (profile.techstack.is_empty(), profile.technical) {
        (true, _) => "No specific technologies or tools are listed for the job.".to_string(),
        (false, true) => format!(
            "The tech stack used in the job is: {}.",
            profile.techstack.join(", ")
        ),
        (false, false) => format!(
            "The tools required on the job are: {}.",
            profile.techstack.join(", ")
        ),
    };

    QUESTIONS_PROMPT_TEMPLATE
        .replace("{role}", &profile.role)
        .replace("{level_line}", &level_line)
        .replace("{stack_line}", &stack_line)
        .replace("{interview_type}", interview_type.label())
        .replace("{max_questions}", &MAX_QUESTIONS.to_string())
}

/// Parses and validates the model's raw answer.
pub fn parse_questions(text: &str) -> Result<Vec<String>, AppError> {
    let raw: Vec<String> = parse_json_text(text)
        .map_err(|e| AppError::Llm(format!("Question set was not a JSON array of strings: {e}")))?;

    let questions: Vec<String> = raw
        .into_iter()
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .collect();

    if questions.is_empty() {
        return Err(AppError::Llm("Question set was empty".to_string()));
    }
    if questions.len() > MAX_QUESTIONS {
        return Err(AppError::Llm(format!(
            "Question set had {} questions (max {MAX_QUESTIONS})",
            questions.len()
        )));
    }
    if let Some(bad) = questions
        .iter()
        .find(|q| q.contains(SPEECH_UNSAFE_CHARS.as_slice()))
    {
        return Err(AppError::Llm(format!(
            "Question contains characters unsafe for speech: {bad:?}"
        )));
    }

    Ok(questions)
}

/// Generates one validated question set. Persistence is the caller's job.
pub async fn generate_question_set(
    llm: &dyn LanguageModel,
    profile: &JobProfile,
    interview_type: InterviewType,
) -> Result<Vec<String>, AppError> {
    let prompt = build_question_prompt(profile, interview_type);

    let text = llm
        .complete(&prompt, QUESTIONS_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("{interview_type} question generation failed: {e}")))?;

    let questions = parse_questions(&text).inspect_err(|e| {
        warn!("Rejected {interview_type} question set: {e}");
    })?;

    info!(
        "Generated {} {interview_type} questions for role {:?}",
        questions.len(),
        profile.role
    );
    Ok(questions)
}
