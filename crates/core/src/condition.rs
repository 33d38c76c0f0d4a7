//! Typed status conditions.
//!
//! Condition lists are keyed by type: a list holds at most one entry per type
//! and lookups never depend on position.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConditionStatus {
    True,
    False,
    #[default]
    Unknown,
}

impl ConditionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::True => "True",
            Self::False => "False",
            Self::Unknown => "Unknown",
        }
    }
}

/// Fine-grained condition as carried by hub statuses.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub type_: String,
    pub status: ConditionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<Time>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub reason: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
}

impl Condition {
    pub fn new(type_: impl Into<String>, status: ConditionStatus) -> Self {
        Self { type_: type_.into(), status, ..Default::default() }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn at(mut self, t: Option<Time>) -> Self {
        self.last_transition_time = t;
        self
    }

    pub fn is_true(&self) -> bool {
        self.status == ConditionStatus::True
    }

    pub fn is_false(&self) -> bool {
        self.status == ConditionStatus::False
    }
}

/// Access shared by every version's condition shape.
pub trait ConditionLike {
    fn condition_type(&self) -> &str;
    fn status(&self) -> ConditionStatus;
    fn last_transition_time(&self) -> Option<&Time>;
    fn set_last_transition_time(&mut self, t: Option<Time>);
}

impl ConditionLike for Condition {
    fn condition_type(&self) -> &str {
        &self.type_
    }

    fn status(&self) -> ConditionStatus {
        self.status
    }

    fn last_transition_time(&self) -> Option<&Time> {
        self.last_transition_time.as_ref()
    }

    fn set_last_transition_time(&mut self, t: Option<Time>) {
        self.last_transition_time = t;
    }
}

pub fn find<'a, C: ConditionLike>(conditions: &'a [C], type_: &str) -> Option<&'a C> {
    conditions.iter().find(|c| c.condition_type() == type_)
}

pub fn position<C: ConditionLike>(conditions: &[C], type_: &str) -> Option<usize> {
    conditions.iter().position(|c| c.condition_type() == type_)
}

/// True when any of `types` is present.
pub fn has_any<C: ConditionLike>(conditions: &[C], types: &[&str]) -> bool {
    conditions.iter().any(|c| types.contains(&c.condition_type()))
}

/// Remove the entry of the given type, returning it.
pub fn remove<C: ConditionLike>(conditions: &mut Vec<C>, type_: &str) -> Option<C> {
    position(conditions, type_).map(|idx| conditions.remove(idx))
}

/// Insert or replace by type.
///
/// A replaced entry keeps its list position, and keeps its transition time
/// when the status did not change.
pub fn set<C: ConditionLike>(conditions: &mut Vec<C>, mut condition: C) {
    match conditions.iter_mut().find(|c| c.condition_type() == condition.condition_type()) {
        Some(existing) => {
            if existing.status() == condition.status() {
                condition.set_last_transition_time(existing.last_transition_time().cloned());
            }
            *existing = condition;
        }
        None => conditions.push(condition),
    }
}
