//! # Conditions
//!
//! Status conditions reported on managed resources.
//!
//! Two condition types are used:
//! - `Ready` - whether the external resource is usable (`Available`, `Creating`, `Deleting`, `Unavailable`)
//! - `Synced` - whether the last reconcile succeeded (`ReconcileSuccess`, `ReconcileError`, `ReconcilePaused`)

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
pub enum ConditionType {
    Ready,
    Synced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
pub enum ConditionStatus {
    True,
    False,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
pub enum ConditionReason {
    Available,
    Unavailable,
    Creating,
    Deleting,
    ReconcileSuccess,
    ReconcileError,
    ReconcilePaused,
}

impl fmt::Display for ConditionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Condition represents a status condition for the resource
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Type of condition
    pub r#type: ConditionType,
    /// Status of condition (True, False, Unknown)
    pub status: ConditionStatus,
    /// Last transition time (RFC3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<String>,
    /// Reason for condition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<ConditionReason>,
    /// Message describing condition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Condition {
    fn new(r#type: ConditionType, status: ConditionStatus, reason: ConditionReason) -> Self {
        Self {
            r#type,
            status,
            last_transition_time: Some(chrono::Utc::now().to_rfc3339()),
            reason: Some(reason),
            message: None,
        }
    }

    /// Condition returned for a type that has never been set
    #[must_use]
    pub fn unknown(r#type: ConditionType) -> Self {
        Self {
            r#type,
            status: ConditionStatus::Unknown,
            last_transition_time: None,
            reason: None,
            message: None,
        }
    }

    #[must_use]
    pub fn available() -> Self {
        Self::new(ConditionType::Ready, ConditionStatus::True, ConditionReason::Available)
    }

    #[must_use]
    pub fn unavailable() -> Self {
        Self::new(ConditionType::Ready, ConditionStatus::False, ConditionReason::Unavailable)
    }

    #[must_use]
    pub fn creating() -> Self {
        Self::new(ConditionType::Ready, ConditionStatus::False, ConditionReason::Creating)
    }

    #[must_use]
    pub fn deleting() -> Self {
        Self::new(ConditionType::Ready, ConditionStatus::False, ConditionReason::Deleting)
    }

    #[must_use]
    pub fn reconcile_success() -> Self {
        Self::new(
            ConditionType::Synced,
            ConditionStatus::True,
            ConditionReason::ReconcileSuccess,
        )
    }

    #[must_use]
    pub fn reconcile_error(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::new(
                ConditionType::Synced,
                ConditionStatus::False,
                ConditionReason::ReconcileError,
            )
        }
    }

    #[must_use]
    pub fn reconcile_paused() -> Self {
        Self::new(
            ConditionType::Synced,
            ConditionStatus::False,
            ConditionReason::ReconcilePaused,
        )
    }

    /// Equal apart from the transition time
    #[must_use]
    pub fn equal(&self, other: &Self) -> bool {
        self.r#type == other.r#type
            && self.status == other.status
            && self.reason == other.reason
            && self.message == other.message
    }
}

/// Get the condition of the given type, or an `Unknown` one when unset
#[must_use]
pub fn get_condition(conditions: &[Condition], r#type: ConditionType) -> Condition {
    conditions
        .iter()
        .find(|c| c.r#type == r#type)
        .cloned()
        .unwrap_or_else(|| Condition::unknown(r#type))
}

/// Set conditions, replacing any existing condition of the same type
///
/// A condition equal to the existing one keeps the existing transition time.
pub fn set_conditions(conditions: &mut Vec<Condition>, new: impl IntoIterator<Item = Condition>) {
    for condition in new {
        match conditions.iter_mut().find(|c| c.r#type == condition.r#type) {
            Some(existing) if existing.equal(&condition) => {}
            Some(existing) => *existing = condition,
            None => conditions.push(condition),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_condition_replaces_same_type() {
        let mut conditions = vec![Condition::creating()];
        set_conditions(&mut conditions, [Condition::available()]);
        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].reason, Some(ConditionReason::Available));
    }

    #[test]
    fn test_set_equal_condition_keeps_transition_time() {
        let mut first = Condition::available();
        first.last_transition_time = Some("2020-01-01T00:00:00+00:00".to_string());
        let mut conditions = vec![first];
        set_conditions(&mut conditions, [Condition::available()]);
        assert_eq!(
            conditions[0].last_transition_time.as_deref(),
            Some("2020-01-01T00:00:00+00:00")
        );
    }

    #[test]
    fn test_types_are_kept_independently() {
        let mut conditions = Vec::new();
        set_conditions(
            &mut conditions,
            [Condition::available(), Condition::reconcile_success()],
        );
        assert_eq!(conditions.len(), 2);
        assert_eq!(
            get_condition(&conditions, ConditionType::Synced).status,
            ConditionStatus::True
        );
    }

    #[test]
    fn test_get_missing_condition_is_unknown() {
        let condition = get_condition(&[], ConditionType::Ready);
        assert_eq!(condition.status, ConditionStatus::Unknown);
        assert!(condition.reason.is_none());
    }
}
