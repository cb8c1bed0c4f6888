use thiserror::Error;

#[derive(Error, Debug)]
pub enum MenuAgentError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Menu data error: {message}")]
    MenuDataError { message: String },

    #[error("Prompt error: {message}")]
    PromptError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Completion service returned {status}: {message}")]
    CompletionError { status: u16, message: String },

    #[error("Malformed completion response: {message}")]
    MalformedResponseError { message: String },

    #[error("Model requested unknown tool '{name}'")]
    UnknownToolError { name: String },

    #[error("Invalid input for tool '{tool}': {message}")]
    ToolInputError { tool: String, message: String },

    #[error("Model kept requesting tools after {max_turns} turns")]
    ToolLoopExceeded { max_turns: usize },
}

impl MenuAgentError {
    /// Errors caused by the caller's request rather than by this process or the model.
    pub fn is_client_error(&self) -> bool {
        matches!(self, MenuAgentError::ValidationError { .. })
    }

    /// Canonical status name reported in HTTP error bodies.
    pub fn canonical_status(&self) -> &'static str {
        match self {
            MenuAgentError::ValidationError { .. } => "INVALID_ARGUMENT",
            MenuAgentError::ApiError(_) => "UNAVAILABLE",
            MenuAgentError::CompletionError { status, .. } if *status == 429 || *status >= 500 => {
                "UNAVAILABLE"
            }
            _ => "INTERNAL",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            MenuAgentError::ApiError(_) | MenuAgentError::CompletionError { .. } => {
                format!("The completion service could not answer: {}", self)
            }
            MenuAgentError::MenuDataError { .. } => {
                format!("The menu file could not be loaded: {}", self)
            }
            MenuAgentError::ConfigError { .. }
            | MenuAgentError::ConfigValidationError { .. }
            | MenuAgentError::InvalidConfigValueError { .. }
            | MenuAgentError::MissingConfigError { .. } => {
                format!("Please check the configuration: {}", self)
            }
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MenuAgentError>;
