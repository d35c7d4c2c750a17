// DREAM Framework assessment: question bank, validation, scoring,
// recommendations, persistence, strategy generation and email deliverables.
// All LLM calls go through llm_client; all mail goes through email::Mailer.

pub mod handlers;
pub mod prompts;
pub mod questions;
pub mod recommendations;
pub mod referral;
pub mod report;
pub mod scoring;
pub mod store;
pub mod strategy;
pub mod validation;
