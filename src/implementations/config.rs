use serde::{ Deserialize, Serialize };
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::errors::MigrationError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Missing required API key: {0}")]
    MissingApiKey(String),
}

impl From<ConfigError> for MigrationError {
    fn from(err: ConfigError) -> Self {
        MigrationError::Config(err.to_string())
    }
}

/// Credentials for the oracle, resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleCredentials {
    pub provider: String,
    pub api_key: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    /// `openai` or `anthropic`
    pub provider: String,

    /// API key for LLM service; the provider's environment variable is used when absent
    pub api_key: Option<String>,

    /// API endpoint for LLM service
    pub api_endpoint: Option<String>,

    /// API model to use; each provider has its own default
    pub model: Option<String>,

    /// Temperature for generation (0.0-1.0)
    pub temperature: Option<f32>,

    /// Maximum tokens for API calls
    pub max_tokens: Option<usize>,

    /// HTTP timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            provider: "openai".to_string(),
            api_key: None,
            api_endpoint: None,
            model: None,
            temperature: Some(0.2),
            max_tokens: Some(4096),
            timeout_secs: Some(120),
        }
    }
}

/// Coordinates of the generated Spring Boot project
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ProjectConfig {
    pub base_package: String,
    pub group_id: String,
    pub artifact_id: String,
    pub application_class: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        ProjectConfig {
            base_package: "org.jboss.as.quickstarts.kitchensink".to_string(),
            group_id: "org.jboss.as.quickstarts".to_string(),
            artifact_id: "kitchensink".to_string(),
            application_class: "KitchensinkApplication".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct RetryConfig {
    /// Oracle calls per gateway query
    pub gateway_attempts: usize,
    /// Stricter regeneration rounds per artifact after the first
    pub artifact_retries: usize,
    /// Test/repair cycles per phase
    pub test_attempts: usize,
    /// Zero-based repair attempt from which comprehensive repair is tried
    pub comprehensive_after: usize,
    pub comprehensive_file_limit: usize,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            gateway_attempts: 3,
            artifact_retries: 3,
            test_attempts: 5,
            comprehensive_after: 2,
            comprehensive_file_limit: 10,
        }
    }
}

/// Character budgets
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_prompt_chars: usize,
    pub test_output_chars: usize,
    pub comprehensive_output_chars: usize,
    pub file_excerpt_chars: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        LimitsConfig {
            // 6000 tokens at roughly 4 characters each
            max_prompt_chars: 6000 * 4,
            test_output_chars: 10000,
            comprehensive_output_chars: 5000,
            file_excerpt_chars: 3000,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct MigrationConfig {
    /// Configuration for the LLM performing the code transformations
    pub llm_api: ApiConfig,

    pub project: ProjectConfig,

    pub retry: RetryConfig,

    pub limits: LimitsConfig,

    /// argv of the external build/test command
    pub test_command: Vec<String>,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        MigrationConfig {
            llm_api: ApiConfig::default(),
            project: ProjectConfig::default(),
            retry: RetryConfig::default(),
            limits: LimitsConfig::default(),
            test_command: vec!["mvn".to_string(), "test".to_string()],
        }
    }
}

impl MigrationConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: MigrationConfig = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise use defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    /// Get the API key, checking environment variables if not in config.
    /// If the configured provider has no key, the other known provider is tried.
    pub fn get_api_key(&self) -> Result<OracleCredentials, ConfigError> {
        use log::{ debug, info };

        let preferred_provider = self.llm_api.provider.to_lowercase();

        if let Some(api_key) = &self.llm_api.api_key {
            debug!("Using API key from config");
            return Ok(OracleCredentials {
                provider: preferred_provider,
                api_key: api_key.clone(),
            });
        }

        let providers = [
            ("openai", "OPENAI_API_KEY"),
            ("anthropic", "ANTHROPIC_API_KEY"),
        ];

        if let Some((_, env_var)) = providers.iter().find(|(p, _)| *p == preferred_provider) {
            match std::env::var(env_var) {
                Ok(key) => {
                    info!("Using preferred provider: {}", preferred_provider);
                    return Ok(OracleCredentials {
                        provider: preferred_provider,
                        api_key: key,
                    });
                }
                Err(_) => {
                    debug!("Preferred provider {} not available, trying others", preferred_provider);
                }
            }
        } else {
            debug!("Unknown provider: {}, will try known providers", preferred_provider);
        }

        for (provider, env_var) in providers {
            if provider == preferred_provider {
                continue;
            }
            match std::env::var(env_var) {
                Ok(key) => {
                    info!("Using alternative provider: {} (preferred was {})", provider, preferred_provider);
                    return Ok(OracleCredentials {
                        provider: provider.to_string(),
                        api_key: key,
                    });
                }
                Err(_) => {
                    debug!("Provider {} not available", provider);
                }
            }
        }

        Err(
            ConfigError::MissingApiKey(
                "set OPENAI_API_KEY or ANTHROPIC_API_KEY, or llm_api.api_key in the config file".to_string()
            )
        )
    }
}
