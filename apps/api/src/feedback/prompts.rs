// All LLM prompt constants for the Feedback module.

/// Attempt scoring prompt template.
/// Replace: {transcript}, {categories}
pub const FEEDBACK_PROMPT_TEMPLATE: &str = r#"You are an AI interviewer analyzing a mock interview. Evaluate the candidate based on structured categories. Be thorough and detailed in your analysis. Don't be lenient with the candidate. If there are mistakes or areas for improvement, point them out.

Transcript:
{transcript}

Score the candidate from 0 to 100 in the following categories. Do not add categories other than the ones provided, and use these names exactly:
{categories}

Return a JSON object with this EXACT schema (no extra fields):
{
  "total_score": 72,
  "category_scores": [
    {"name": "Communication Skills", "score": 80, "comment": "Clear, structured answers."}
  ],
  "strengths": ["Explained trade-offs well"],
  "areas_for_improvement": ["Give concrete examples"],
  "final_assessment": "A short narrative assessment of the whole interview."
}"#;

/// Category descriptions listed in the scoring prompt.
pub const CATEGORY_GUIDE: [(&str, &str); 5] = [
    ("Communication Skills", "Clarity, articulation, structured responses."),
    ("Technical Knowledge", "Understanding of key concepts for the role."),
    ("Problem Solving", "Ability to analyze problems and propose solutions."),
    ("Cultural Fit", "Alignment with company values and job role."),
    ("Confidence and Clarity", "Confidence in responses, engagement, and clarity."),
];

/// Overview prompt template. Replace: {assessments}
pub const OVERVIEW_PROMPT_TEMPLATE: &str = r#"A set of mock interviews has been conducted for the same job application. Here are the assessments of each individual interview:

{assessments}

Write one general summary of the candidate that combines the individual assessments above.

Return a JSON object with this EXACT schema (no extra fields):
{
  "final_assessment": "The combined narrative."
}"#;
