// Shared prompt constants used by more than one pipeline stage.
// Each stage that calls the model defines its own prompts.rs alongside it.

/// Shared instruction for any extraction prompt.
pub const NO_INVENTION_INSTRUCTION: &str = "\
    Do NOT make up any information. \
    If a value cannot be found in the source, return it as null.";

/// System prompt shared by every interview-evaluation call.
pub const INTERVIEWER_SYSTEM: &str = "You are a professional interviewer analyzing a mock interview. \
    Your task is to evaluate the candidate based on structured categories. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";
