//! Generative-AI client and advisor prompts.

mod client;
mod prompts;

pub use client::*;
pub use prompts::{build_system_instruction, format_context, ADVISOR_SYSTEM_PROMPT};
