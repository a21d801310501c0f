//! Prompt templates for the three triage agents

mod template;

pub use template::{NO_FURTHER_QUESTIONS, PromptTemplate};
