//! Claude provider implementation
//!
//! One client serves both the public Anthropic Messages API and Claude models
//! hosted on Google Cloud Platform's Vertex AI.

pub mod client;
pub mod mapper;
pub mod types;

// Re-export commonly used types
pub use client::ClaudeClient;
