// Feedback: scoring one interview attempt and aggregating attempts into the
// parent interview list's overview.

pub mod handlers;
pub mod overview;
pub mod prompts;
pub mod scorer;
