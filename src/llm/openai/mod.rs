//! OpenAI provider implementation
//!
//! Speaks the Chat Completions API, either against OpenAI (or any compatible
//! server) or against an Azure OpenAI deployment.

pub mod client;
pub mod mapper;
pub mod types;

pub use client::OpenAiClient;
