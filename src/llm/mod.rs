pub mod client;
pub mod parser;
pub mod prompt;

pub use client::{ChatMessage, ModelClient, SamplingParams, CHAT_SAMPLING, REVIEW_SAMPLING};
pub use parser::parse_review;
pub use prompt::{build_review_prompt, chat_system_prompt, Workflow};
