//! AI assistant: recipe generation, weekly menu planning and recipe
//! search backed by a text-generation model.
//!
//! The model client sits behind the [`client::TextGenerator`] trait so
//! the planning logic is testable with scripted responses. Model output
//! is treated as untrusted JSON and run through [`json_repair`] before
//! deserialization.

pub mod client;
pub mod energy;
pub mod errors;
pub mod json_repair;
pub mod matching;
pub mod prompts;
pub mod service;
pub mod types;

pub use client::{GeminiClient, TextGenerator};
pub use errors::AiError;
pub use service::AiService;
