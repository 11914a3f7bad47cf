//! # Managed Resource Errors
//!
//! Errors surfaced by external clients, connectors and initializers.
//! Provider failures carry a closed [`Operation`] whose label names the
//! failed call, e.g. `cannot create Connection in AWS`.

use crate::provider::ApiError;
use std::fmt;
use thiserror::Error;

/// External operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Describe,
    Create,
    Update,
    Delete,
    Tag,
    Untag,
}

impl Operation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Describe => "describe",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Tag => "tag",
            Operation::Untag => "untag",
        }
    }

    /// Static message used to wrap a provider error for this operation
    #[must_use]
    pub fn label(self, kind: &str) -> String {
        match self {
            Operation::Describe => format!("failed to describe {kind}"),
            Operation::Create => format!("cannot create {kind} in AWS"),
            Operation::Update => format!("cannot update {kind} in AWS"),
            Operation::Delete => format!("failed to delete {kind}"),
            Operation::Tag => format!("cannot tag {kind}"),
            Operation::Untag => format!("cannot untag {kind}"),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hook stage that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    PreObserve,
    LateInitialize,
    IsUpToDate,
    PostObserve,
    PreCreate,
    PostCreate,
    PreUpdate,
    PostUpdate,
    PreDelete,
    PostDelete,
}

impl fmt::Display for HookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HookStage::PreObserve => "pre-observe failed",
            HookStage::LateInitialize => "late-init failed",
            HookStage::IsUpToDate => "isUpToDate check failed",
            HookStage::PostObserve => "post-observe failed",
            HookStage::PreCreate => "pre-create failed",
            HookStage::PostCreate => "post-create failed",
            HookStage::PreUpdate => "pre-update failed",
            HookStage::PostUpdate => "post-update failed",
            HookStage::PreDelete => "pre-delete failed",
            HookStage::PostDelete => "post-delete failed",
        })
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{}: {source}", .operation.label(.kind))]
    Provider {
        kind: &'static str,
        operation: Operation,
        #[source]
        source: ApiError,
    },
    #[error("{stage}: {source:#}")]
    Hook {
        stage: HookStage,
        #[source]
        source: anyhow::Error,
    },
    #[error("cannot create a new session: {0:#}")]
    Session(#[source] anyhow::Error),
    #[error("cannot update {kind} custom resource: {source:#}")]
    KubeUpdate {
        kind: String,
        #[source]
        source: anyhow::Error,
    },
}

impl Error {
    #[must_use]
    pub fn provider(kind: &'static str, operation: Operation, source: ApiError) -> Self {
        Self::Provider {
            kind,
            operation,
            source,
        }
    }

    #[must_use]
    pub fn hook(stage: HookStage, source: anyhow::Error) -> Self {
        Self::Hook { stage, source }
    }

    /// The failed operation, when the error came from an AWS call
    #[must_use]
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Self::Provider { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_carries_operation_label() {
        let err = Error::provider(
            "Connection",
            Operation::Create,
            ApiError::service("InternalServiceException", "boom"),
        );
        assert_eq!(err.to_string(), "cannot create Connection in AWS: boom");
        assert_eq!(err.operation(), Some(Operation::Create));
    }

    #[test]
    fn test_hook_error_names_stage() {
        let err = Error::hook(HookStage::PreObserve, anyhow::anyhow!("missing api id"));
        assert_eq!(err.to_string(), "pre-observe failed: missing api id");
    }

    #[test]
    fn test_describe_and_delete_labels() {
        assert_eq!(Operation::Describe.label("Role"), "failed to describe Role");
        assert_eq!(Operation::Delete.label("Role"), "failed to delete Role");
        assert_eq!(Operation::Update.label("Role"), "cannot update Role in AWS");
    }
}
