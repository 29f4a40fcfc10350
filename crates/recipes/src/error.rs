use larder_core::ToolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Spoonacular API key is not configured (set SPOONACULAR_API_KEY)")]
    MissingApiKey,
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Upstream returned HTTP {0}")]
    Status(u16),
    #[error("{0}")]
    Malformed(String),
    #[error("{0}")]
    NotFound(String),
}

impl RecipeError {
    /// Treat an upstream 404 as "no such meal".
    pub(crate) fn or_not_found(self, message: String) -> Self {
        match self {
            RecipeError::Status(404) => RecipeError::NotFound(message),
            other => other,
        }
    }
}

impl From<RecipeError> for ToolError {
    fn from(e: RecipeError) -> Self {
        match e {
            RecipeError::InvalidInput(_) | RecipeError::MissingApiKey => ToolError::Input(e.to_string()),
            RecipeError::NotFound(msg) => ToolError::NotFound(msg),
            other => ToolError::Upstream(other.to_string()),
        }
    }
}
