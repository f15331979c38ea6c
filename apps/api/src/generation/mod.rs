// Interview generation: job-profile extraction, per-type question sets and
// the orchestrator that ties them to one persisted interview list.
// All model calls go through llm_client; no direct API calls here.

pub mod handlers;
pub mod job_extractor;
pub mod orchestrator;
pub mod prompts;
pub mod question_generator;
