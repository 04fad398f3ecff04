use std::time::Duration;
use thiserror::Error;

/// Result type alias for design-scan operations
pub type Result<T> = std::result::Result<T, ScanError>;

/// Errors that can stop a scan
#[derive(Error, Debug)]
pub enum ScanError {
    /// A selector could not be parsed by the document's selector engine
    #[error("invalid selector `{selector}`")]
    InvalidSelector { selector: String },

    /// No WebDriver server accepted a session
    #[error("failed to connect to a WebDriver server at {url}")]
    WebDriverConnect { url: String },

    /// A WebDriver command failed after the session was established
    #[error("WebDriver command failed while {context}: {source}")]
    WebDriverCommand {
        context: String,
        #[source]
        source: fantoccini::error::CmdError,
    },

    /// The page never reported itself ready for analysis
    #[error("page was not ready for analysis within {0:?}")]
    Timeout(Duration),

    /// The snapshot returned by the browser did not have the expected shape
    #[error("malformed page snapshot: {0}")]
    Snapshot(String),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ScanError {
    /// Create an invalid selector error
    pub fn invalid_selector(selector: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
        }
    }

    /// Wrap a WebDriver command error with what was being attempted
    pub fn command(context: impl Into<String>, source: fantoccini::error::CmdError) -> Self {
        Self::WebDriverCommand {
            context: context.into(),
            source,
        }
    }

    /// Whether the error is an anticipated per-item failure that callers skip
    pub fn is_skippable(&self) -> bool {
        matches!(self, ScanError::InvalidSelector { .. })
    }
}
