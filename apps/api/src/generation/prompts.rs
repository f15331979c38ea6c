// All LLM and crawler prompt constants for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Instruction handed to the hosted crawler together with a job link.
pub const CRAWLER_INSTRUCTION: &str = "You are a smart web crawler. \
    Visit the given URL containing a job description and extract the following information: \
    company, role, level (Junior, Mid-level or Senior). \
    If it is a technical role, extract the tech stack as `techstack` and set `technical` to true. \
    If it is not a technical role, extract the tools listed in the job description as `techstack` \
    and set `technical` to false. \
    Return all the extracted information as a single JSON object with the keys \
    company, role, level, techstack, technical. \
    Do NOT make up any information; if a value cannot be found, return it as null.";

/// System prompt for extracting a job profile from pasted description text.
pub const JD_EXTRACT_SYSTEM: &str = "You are a smart recruiter. \
    Users will give you a job description and you extract structured facts from it. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Job description extraction prompt. Replace `{no_invention}` and `{jd_text}` before sending.
pub const JD_EXTRACT_PROMPT_TEMPLATE: &str = r#"Extract the following information from the job description below.

Return a JSON object with this EXACT schema (no extra fields):
{
  "company": "Acme Corp",
  "role": "Backend Engineer",
  "level": "Senior",
  "techstack": ["Rust", "PostgreSQL"],
  "technical": true
}

Rules:
- level is one of "Junior", "Mid-level", "Senior", or null.
- For a technical role, techstack lists the technologies and technical is true.
- For a non-technical role, techstack lists the tools named in the description and technical is false.
- {no_invention}

JOB DESCRIPTION:
{jd_text}"#;

/// System prompt for question-set generation. Enforces a bare JSON array.
pub const QUESTIONS_SYSTEM: &str = "You are an experienced interviewer preparing a mock interview. \
    You MUST respond with a JSON array of strings only. \
    Do NOT include any text outside the JSON array. \
    Do NOT use markdown code fences.";

/// Question-set prompt template.
/// Replace: {role}, {level_line}, {stack_line}, {interview_type}, {max_questions}
pub const QUESTIONS_PROMPT_TEMPLATE: &str = r##"Prepare questions for a job interview.
The job role is {role}.
{level_line}
{stack_line}
The focus of the questions should lean towards: {interview_type}.
The number of questions required is a maximum of: {max_questions}.
Return only the questions, without any additional text.
The questions are going to be read by a voice assistant, so do not use "/", "*", "#", "|", "~", backslashes, backticks or any other special characters which might break the voice assistant.
Return the questions formatted like this:
["Question 1", "Question 2", "Question 3"]"##;
