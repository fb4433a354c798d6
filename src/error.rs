/// Error types for task-agent
///
/// The classifier and router never fail. Everything in here comes from the
/// collaborators underneath them (stores, weather lookups, the calculator),
/// and handlers turn it into a reply with `user_message()`.

use thiserror::Error;

/// Main error type for task-agent operations
#[derive(Error, Debug)]
pub enum AgentError {
    /// I/O errors (data directory, JSON files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP transport errors from the weather client
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A built-in regex failed to compile
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// No OpenWeatherMap key configured
    #[error("Weather API key not configured")]
    MissingApiKey,

    /// Weather service answered but not with something usable
    #[error("Weather service error: {0}")]
    Weather(String),

    #[error("Division by zero")]
    DivisionByZero,

    /// Expression could not be parsed or evaluated
    #[error("Invalid expression: {0}")]
    InvalidExpression(String),

    /// Intent catalog failed validation at construction
    #[error("Invalid intent catalog: {0}")]
    InvalidCatalog(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for task-agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Convert AgentError to a user-friendly error message
impl AgentError {
    pub fn user_message(&self) -> String {
        match self {
            AgentError::Io(e) => {
                format!("File system error. Check permissions. Details: {}", e)
            }
            AgentError::Serialization(e) => {
                format!("Data format error: {}", e)
            }
            AgentError::Http(_) => {
                "Sorry, there was an error getting weather information.".to_string()
            }
            AgentError::Pattern(e) => {
                format!("Internal pattern error: {}", e)
            }
            AgentError::MissingApiKey => {
                "Weather API key not configured. Please set your OpenWeatherMap API key."
                    .to_string()
            }
            AgentError::Weather(msg) => {
                format!("Weather service problem: {}", msg)
            }
            AgentError::DivisionByZero => "Error: Division by zero is not allowed.".to_string(),
            AgentError::InvalidExpression(_) => {
                "Sorry, I couldn't calculate that expression. Please check your input."
                    .to_string()
            }
            AgentError::InvalidCatalog(msg) => {
                format!("Intent catalog is misconfigured: {}", msg)
            }
            AgentError::Config(msg) => {
                format!("Configuration issue: {}", msg)
            }
        }
    }
}
