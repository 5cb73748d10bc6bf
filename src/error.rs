use std::path::PathBuf;

use rmcp::model::ErrorData;

#[derive(Debug, thiserror::Error)]
pub enum McpSpellcheckError {
    #[error("GitHub API error: {0}")]
    GitHub(#[from] octocrab::Error),

    #[error("Missing required parameter: {0}")]
    MissingParam(String),

    #[error("Failed to read word list {}: {source}", .path.display())]
    Dictionary {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not decode file contents: {0}")]
    Decode(String),

    #[error("{0}")]
    Other(String),
}

impl McpSpellcheckError {
    pub fn to_mcp_error(&self) -> ErrorData {
        match self {
            McpSpellcheckError::MissingParam(_) => {
                ErrorData::invalid_params(self.to_string(), None)
            }
            McpSpellcheckError::GitHub(_)
            | McpSpellcheckError::Dictionary { .. }
            | McpSpellcheckError::Decode(_)
            | McpSpellcheckError::Other(_) => ErrorData::internal_error(self.to_string(), None),
        }
    }
}
