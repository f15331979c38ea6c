// Read-side accessors for interview lists and interviews.

pub mod handlers;
