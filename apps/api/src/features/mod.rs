// Feature controllers for the three generators.
// Each controller coordinates input validation, the LLM call, and history
// recording; no LLM or storage access happens outside `submit`.

pub mod controller;
pub mod handlers;
