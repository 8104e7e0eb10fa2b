//! Generative AI service access

pub mod gemini;
pub mod prompts;
