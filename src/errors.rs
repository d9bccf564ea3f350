//! Error types shared by the page/file models and the transport.
//!
//! Exported items:
//! - `WikiError` - main error enum returned by every fallible operation.
//! - `ApiErrorInfo` - the `{code, info}` payload MediaWiki sends back on failure.
//! - `ErrorInfo` - cloneable summary stored as the "last error" of a page or file.
//! - `Result<T>` - convenient alias `std::result::Result<T, WikiError>`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::reqwest_client::RustError;

/// The canonical result type used across the crate.
pub type Result<T> = std::result::Result<T, WikiError>;

/// Structured error payload returned by the API (`{"error": {...}}`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiErrorInfo {
    pub code: String,
    #[serde(default)]
    pub info: String,
}

impl fmt::Display for ApiErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.info)
    }
}

/// Error from wiki operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum WikiError {
    /// The HTTP exchange could not be completed.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] RustError),

    /// The remote service returned a structured error.
    #[error("API error {0}")]
    Api(ApiErrorInfo),

    /// The title was rejected by the wiki.
    #[error("invalid title: {0}")]
    InvalidTitle(String),

    /// A section name or index did not resolve against the current index.
    #[error("section not found: {0}")]
    SectionNotFound(String),

    /// Section enumeration was asked for with an unknown key mode.
    #[error("unsupported section key mode '{0}'")]
    UnsupportedKeyMode(String),

    /// An edit/upload/delete came back without a `Success` result.
    #[error("request did not succeed: {0}")]
    Failed(String),

    /// JSON decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configured API url could not be parsed.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Client configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl WikiError {
    /// Short machine-friendly name of the error kind.
    pub fn code(&self) -> &str {
        match self {
            WikiError::Transport(_) => "transport",
            WikiError::Api(info) => &info.code,
            WikiError::InvalidTitle(_) => "invalidtitle",
            WikiError::SectionNotFound(_) => "sectionnotfound",
            WikiError::UnsupportedKeyMode(_) => "unsupportedkeymode",
            WikiError::Failed(_) => "failed",
            WikiError::Json(_) => "json",
            WikiError::Url(_) => "url",
            WikiError::Config(_) => "config",
        }
    }
}

impl From<reqwest::Error> for WikiError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(RustError::from(value))
    }
}

impl From<reqwest_middleware::Error> for WikiError {
    fn from(value: reqwest_middleware::Error) -> Self {
        Self::Transport(RustError::from(value))
    }
}

/// Snapshot of the last failure seen by a page or file object.
///
/// `WikiError` carries non-cloneable sources (reqwest errors), so objects keep
/// this flattened copy around for `get_error()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub code: String,
    pub info: String,
}

impl From<&WikiError> for ErrorInfo {
    fn from(value: &WikiError) -> Self {
        match value {
            WikiError::Api(api) => Self {
                code: api.code.clone(),
                info: api.info.clone(),
            },
            other => Self {
                code: other.code().to_owned(),
                info: other.to_string(),
            },
        }
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.info)
    }
}
