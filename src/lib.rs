// LLM completion layer with request observers
pub mod llm;
