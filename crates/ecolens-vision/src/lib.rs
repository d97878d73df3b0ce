//! Vision inference client for waste-bin classification.
//!
//! This crate provides:
//! - `VisionClient` for one-shot image classification against an
//!   OpenAI-compatible chat-completions endpoint
//! - Typed request/response schemas for the wire contract
//! - A typed error taxonomy with HTTP status mapping
//! - Credential and endpoint configuration via environment variables

pub mod client;
pub mod error;
pub mod types;


pub use client::{VisionClient, VisionConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL, INSTRUCTION_PROMPT};
pub use error::{VisionError, VisionResult};
pub use types::{ChatRequest, ChatResponse, ContentPart};
