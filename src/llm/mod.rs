//! LLM module for vid2blog
//!
//! Builds the blog prompt and sends it to a completion provider
//! (OpenAI-compatible chat completions or Gemini).

mod client;
mod gemini;
mod openai;
pub mod prompts;

pub use client::{build_provider, LlmProvider};
pub use gemini::GeminiClient;
pub use openai::{OpenAiClient, DEFAULT_OPENAI_MODEL};
pub use prompts::build_blog_prompt;

/// Sampling temperature for every completion request.
pub const COMPLETION_TEMPERATURE: f32 = 0.3;
