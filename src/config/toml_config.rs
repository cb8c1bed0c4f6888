use crate::core::flow::DEFAULT_MAX_TOOL_TURNS;
use crate::core::prompt::DEFAULT_MODEL;
use crate::core::GenerationSettings;
use crate::utils::error::{MenuAgentError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub menu: MenuConfig,
    pub completion: CompletionConfig,
    pub prompt: PromptConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    pub path: String,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            path: "data/menu.json".to_string(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub project: Option<String>,
    pub location: String,
    pub model: String,
    /// Overrides the Vertex AI publisher-models URL, e.g. for a proxy.
    pub base_url: Option<String>,
    pub access_token: Option<String>,
    pub api_key: Option<String>,
    pub max_tool_turns: usize,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            project: None,
            location: "us-east1".to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
            access_token: None,
            api_key: None,
            max_tool_turns: DEFAULT_MAX_TOOL_TURNS,
            temperature: None,
            max_output_tokens: None,
        }
    }
}

impl std::fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |secret: &Option<String>| secret.as_ref().map(|_| "***");
        f.debug_struct("CompletionConfig")
            .field("project", &self.project)
            .field("location", &self.location)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("access_token", &redact(&self.access_token))
            .field("api_key", &redact(&self.api_key))
            .field("max_tool_turns", &self.max_tool_turns)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}

impl CompletionConfig {
    /// Base URL that `{model}:generateContent` is appended to.
    pub fn models_url(&self) -> Result<String> {
        if let Some(base_url) = &self.base_url {
            return Ok(base_url.trim_end_matches('/').to_string());
        }

        let project = validation::validate_required_field("completion.project", &self.project)?;
        Ok(format!(
            "https://{location}-aiplatform.googleapis.com/v1/projects/{project}/locations/{location}/publishers/google/models",
            location = self.location,
            project = project
        ))
    }

    pub fn generation(&self) -> GenerationSettings {
        GenerationSettings {
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    pub template_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "debug".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MenuAgentError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MenuAgentError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` placeholders, e.g. `${GOOGLE_CLOUD_PROJECT}`.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| MenuAgentError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Fills unset credentials from the usual Google environment variables.
    pub fn apply_env_fallbacks(&mut self) {
        let completion = &mut self.completion;
        fill_from_env(&mut completion.project, "GOOGLE_CLOUD_PROJECT");
        fill_from_env(&mut completion.access_token, "VERTEX_ACCESS_TOKEN");
        fill_from_env(&mut completion.api_key, "GEMINI_API_KEY");
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("server.host", &self.server.host)?;
        validation::validate_range("server.port", self.server.port, 1, u16::MAX)?;
        validation::validate_positive_number(
            "server.cors_origins",
            self.server.cors_origins.len(),
            1,
        )?;

        validation::validate_path("menu.path", &self.menu.path)?;

        let completion = &self.completion;
        validation::validate_non_empty_string("completion.model", &completion.model)?;
        validation::validate_non_empty_string("completion.location", &completion.location)?;
        validation::validate_url("completion.base_url", &completion.models_url()?)?;
        validation::validate_range("completion.max_tool_turns", completion.max_tool_turns, 1, 20)?;
        if let Some(temperature) = completion.temperature {
            validation::validate_range("completion.temperature", temperature, 0.0, 2.0)?;
        }

        if let Some(path) = &self.prompt.template_path {
            validation::validate_path("prompt.template_path", path)?;
        }

        if completion.access_token.is_none() && completion.api_key.is_none() {
            tracing::warn!(
                "No completion credentials configured; requests will be unauthenticated"
            );
        }

        Ok(())
    }
}

fn fill_from_env(slot: &mut Option<String>, var_name: &str) {
    // An unresolved ${VAR} placeholder counts as unset.
    if slot.as_deref().is_some_and(|v| v.is_empty() || v.starts_with("${")) {
        *slot = None;
    }
    if slot.is_none() {
        *slot = std::env::var(var_name).ok().filter(|v| !v.is_empty());
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
