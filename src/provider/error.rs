//! # AWS API Errors
//!
//! Every AWS call made by a service client is collapsed into [`ApiError`].
//! The only distinction callers care about is whether the resource was not
//! found: Observe and Delete treat that as a normal outcome.

use aws_sdk_sts::error::{BuildError, DisplayErrorContext, ProvideErrorMetadata, SdkError};
use std::fmt::Debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{code}: {message}")]
    NotFound { code: String, message: String },
    #[error("{message}")]
    Service {
        code: Option<String>,
        message: String,
    },
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Service {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    /// Error code reported by AWS, if any
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::NotFound { code, .. } => Some(code),
            Self::Service { code, .. } => code.as_deref(),
            Self::InvalidRequest(_) => None,
        }
    }

    /// Classify an SDK error, mapping any of `not_found_codes` to [`ApiError::NotFound`]
    pub fn from_sdk<E, R>(err: SdkError<E, R>, not_found_codes: &[&str]) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
        R: Debug,
    {
        let code = err.code().map(ToString::to_string);
        let message = DisplayErrorContext(&err).to_string();
        match code {
            Some(code) if not_found_codes.contains(&code.as_str()) => {
                Self::NotFound { code, message }
            }
            code => Self::Service { code, message },
        }
    }
}

impl From<BuildError> for ApiError {
    fn from(err: BuildError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        let err = ApiError::not_found("NoSuchEntity", "role missing");
        assert!(err.is_not_found());
        assert_eq!(err.code(), Some("NoSuchEntity"));
    }

    #[test]
    fn test_service_error_is_not_not_found() {
        let err = ApiError::service("Throttling", "slow down");
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "slow down");
    }
}
