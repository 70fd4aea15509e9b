//! Generation and provider configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use super::error::LlmError;
use crate::llm::auth::credential::CredentialRef;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const MIN_TEMPERATURE: f32 = 0.0;
pub const MAX_TEMPERATURE: f32 = 2.0;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const AZURE_OPENAI_API_VERSION: &str = "2024-06-01";
pub const DEFAULT_GCP_LOCATION: &str = "us-central1";

/// Parameters sent with every completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Provider-side model identifier
    pub model: String,
    /// Randomness (0.0-2.0, higher = more random)
    pub temperature: f32,
    /// Maximum number of tokens to generate
    pub max_tokens: u32,
}

impl GenerationConfig {
    /// Create a new configuration for the given model
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// Set the temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Check the configuration before it is sent anywhere
    pub fn validate(&self) -> Result<(), LlmError> {
        if self.model.trim().is_empty() {
            return Err(LlmError::InvalidInput(
                "model identifier must not be empty".to_string(),
            ));
        }
        if !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&self.temperature) {
            return Err(LlmError::InvalidInput(format!(
                "temperature {} is outside [{}, {}]",
                self.temperature, MIN_TEMPERATURE, MAX_TEMPERATURE
            )));
        }
        if self.max_tokens == 0 {
            return Err(LlmError::InvalidInput(
                "max_tokens must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl GenerationConfig {
    /// Read `LLM_MODEL`, `LLM_TEMPERATURE` and `LLM_MAX_TOKENS`, falling back to defaults
    ///
    /// Values are parsed but not validated, so callers can override them first.
    pub fn from_env() -> Result<Self, LlmError> {
        let mut generation = GenerationConfig::new(env_or("LLM_MODEL", DEFAULT_MODEL));
        if let Ok(raw) = env::var("LLM_TEMPERATURE") {
            generation.temperature = raw.trim().parse().map_err(|_| {
                LlmError::InvalidInput(format!("LLM_TEMPERATURE is not a number: {}", raw))
            })?;
        }
        if let Ok(raw) = env::var("LLM_MAX_TOKENS") {
            generation.max_tokens = raw.trim().parse().map_err(|_| {
                LlmError::InvalidInput(format!("LLM_MAX_TOKENS is not an integer: {}", raw))
            })?;
        }
        Ok(generation)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.0,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// Which completion backend to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    AzureOpenAi,
    Anthropic,
    VertexClaude,
}

impl ProviderKind {
    /// Read `LLM_PROVIDER`, defaulting to OpenAI
    pub fn from_env() -> Result<Self, LlmError> {
        env_or("LLM_PROVIDER", "openai").parse()
    }
}

impl FromStr for ProviderKind {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "azure-openai" | "azure_openai" => Ok(ProviderKind::AzureOpenAi),
            "anthropic" => Ok(ProviderKind::Anthropic),
            "vertex-claude" | "claude_vertex" => Ok(ProviderKind::VertexClaude),
            other => Err(LlmError::InvalidInput(format!(
                "unknown provider '{}' (expected openai, azure-openai, anthropic or vertex-claude)",
                other
            ))),
        }
    }
}

/// Connection settings for one provider
///
/// Credentials are held as references and only resolved when a client is built.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderConfig {
    /// OpenAI Chat Completions API (or any compatible server)
    OpenAi {
        base_url: String,
        api_key: CredentialRef,
    },
    /// Azure OpenAI deployment
    AzureOpenAi {
        endpoint: String,
        deployment: String,
        api_version: String,
        api_key: CredentialRef,
    },
    /// Anthropic Messages API
    Anthropic {
        base_url: String,
        api_key: CredentialRef,
    },
    /// Anthropic Claude hosted on Google Cloud Vertex AI, authenticated through ADC
    VertexClaude {
        project_id: String,
        location: String,
    },
}

impl ProviderConfig {
    pub fn kind(&self) -> ProviderKind {
        match self {
            ProviderConfig::OpenAi { .. } => ProviderKind::OpenAi,
            ProviderConfig::AzureOpenAi { .. } => ProviderKind::AzureOpenAi,
            ProviderConfig::Anthropic { .. } => ProviderKind::Anthropic,
            ProviderConfig::VertexClaude { .. } => ProviderKind::VertexClaude,
        }
    }

    /// OpenAI with the public endpoint and `OPENAI_API_KEY`
    pub fn openai() -> Self {
        ProviderConfig::OpenAi {
            base_url: OPENAI_BASE_URL.to_string(),
            api_key: CredentialRef::env("OPENAI_API_KEY"),
        }
    }

    /// Anthropic with the public endpoint and `ANTHROPIC_API_KEY`
    pub fn anthropic() -> Self {
        ProviderConfig::Anthropic {
            base_url: ANTHROPIC_BASE_URL.to_string(),
            api_key: CredentialRef::env("ANTHROPIC_API_KEY"),
        }
    }

    /// Read the settings for `kind` from environment variables
    pub fn from_env(kind: ProviderKind) -> Result<Self, LlmError> {
        let config = match kind {
            ProviderKind::OpenAi => ProviderConfig::OpenAi {
                base_url: env_or("OPENAI_BASE_URL", OPENAI_BASE_URL),
                api_key: CredentialRef::env("OPENAI_API_KEY"),
            },
            ProviderKind::AzureOpenAi => ProviderConfig::AzureOpenAi {
                endpoint: required_env("AZURE_OPENAI_ENDPOINT")?,
                deployment: required_env("AZURE_OPENAI_DEPLOYMENT")?,
                api_version: env_or("AZURE_OPENAI_API_VERSION", AZURE_OPENAI_API_VERSION),
                api_key: CredentialRef::env("AZURE_OPENAI_API_KEY"),
            },
            ProviderKind::Anthropic => ProviderConfig::Anthropic {
                base_url: env_or("ANTHROPIC_BASE_URL", ANTHROPIC_BASE_URL),
                api_key: CredentialRef::env("ANTHROPIC_API_KEY"),
            },
            ProviderKind::VertexClaude => ProviderConfig::VertexClaude {
                project_id: required_env("GCP_PROJECT_ID")?,
                location: env_or("GCP_LOCATION", DEFAULT_GCP_LOCATION),
            },
        };
        Ok(config)
    }
}

/// Everything needed to build a client and send requests through it
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub provider: ProviderConfig,
    pub generation: GenerationConfig,
}

impl Settings {
    pub fn new(provider: ProviderConfig, generation: GenerationConfig) -> Self {
        Self {
            provider,
            generation,
        }
    }

    /// Build settings from `LLM_*` and provider-specific environment variables
    ///
    /// # Errors
    /// [`LlmError::InvalidInput`] for an unknown provider, a missing required
    /// variable, an unparsable number or a configuration that fails validation.
    pub fn from_env() -> Result<Self, LlmError> {
        Self::from_env_with(SettingsOverrides::default())
    }

    /// Like [`Settings::from_env`], with `overrides` taking precedence over the environment
    ///
    /// The provider kind is chosen before any provider variable is read, and the
    /// generation config is validated only after the overrides are applied.
    pub fn from_env_with(overrides: SettingsOverrides) -> Result<Self, LlmError> {
        let kind = match overrides.provider {
            Some(kind) => kind,
            None => ProviderKind::from_env()?,
        };
        let provider = ProviderConfig::from_env(kind)?;

        let mut generation = GenerationConfig::from_env()?;
        if let Some(model) = overrides.model {
            generation.model = model;
        }
        if let Some(temperature) = overrides.temperature {
            generation.temperature = temperature;
        }
        if let Some(max_tokens) = overrides.max_tokens {
            generation.max_tokens = max_tokens;
        }
        generation.validate()?;

        Ok(Self {
            provider,
            generation,
        })
    }
}

/// Values that replace their environment counterparts in [`Settings::from_env_with`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsOverrides {
    pub provider: Option<ProviderKind>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn required_env(name: &str) -> Result<String, LlmError> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| LlmError::InvalidInput(format!("{} must be set", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new() {
        let config = GenerationConfig::new("gpt-4o");
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn test_config_default() {
        let config = GenerationConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = GenerationConfig::new("claude-haiku-4-5")
            .with_temperature(0.7)
            .with_max_tokens(256);

        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_tokens, 256);
    }

    #[test]
    fn test_temperature_bounds() {
        assert!(GenerationConfig::default().with_temperature(0.0).validate().is_ok());
        assert!(GenerationConfig::default().with_temperature(2.0).validate().is_ok());
        assert!(matches!(
            GenerationConfig::default().with_temperature(2.5).validate(),
            Err(LlmError::InvalidInput(_))
        ));
        assert!(matches!(
            GenerationConfig::default().with_temperature(-0.1).validate(),
            Err(LlmError::InvalidInput(_))
        ));
        assert!(GenerationConfig::default()
            .with_temperature(f32::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_empty_model_rejected() {
        let config = GenerationConfig::new("  ");
        assert!(matches!(config.validate(), Err(LlmError::InvalidInput(_))));
    }

    #[test]
    fn test_zero_max_tokens_rejected() {
        let config = GenerationConfig::default().with_max_tokens(0);
        assert!(matches!(config.validate(), Err(LlmError::InvalidInput(_))));
    }

    #[test]
    fn test_config_serialization() {
        let config = GenerationConfig::new("gpt-4o").with_temperature(0.5);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"model\":\"gpt-4o\""));
        assert!(json.contains("\"temperature\":0.5"));
        assert!(json.contains("\"max_tokens\":1024"));
    }

    #[test]
    fn test_provider_kind_parsing() {
        assert_eq!("openai".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!("OpenAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!(
            "azure-openai".parse::<ProviderKind>().unwrap(),
            ProviderKind::AzureOpenAi
        );
        assert_eq!(
            "anthropic".parse::<ProviderKind>().unwrap(),
            ProviderKind::Anthropic
        );
        assert_eq!(
            "CLAUDE_VERTEX".parse::<ProviderKind>().unwrap(),
            ProviderKind::VertexClaude
        );
        assert!(matches!(
            "cohere".parse::<ProviderKind>(),
            Err(LlmError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_provider_presets() {
        match ProviderConfig::openai() {
            ProviderConfig::OpenAi { base_url, api_key } => {
                assert_eq!(base_url, OPENAI_BASE_URL);
                assert_eq!(api_key.name(), "OPENAI_API_KEY");
            }
            other => panic!("Expected OpenAi, got {:?}", other),
        }
        assert_eq!(ProviderConfig::anthropic().kind(), ProviderKind::Anthropic);
    }
}
