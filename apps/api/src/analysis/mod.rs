// D.E.E.P. coaching analysis.
// Implements: prompt building, the single upstream call, reply extraction.
// All LLM calls go through llm_client.

pub mod analyzer;
pub mod extractor;
pub mod handlers;
pub mod models;
pub mod prompts;
