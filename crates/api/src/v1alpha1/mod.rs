//! v1alpha1 schema, the oldest served version.
//!
//! Conditions at this version carry a severity and the VM status reports a
//! single aggregated prerequisite condition instead of one per dependency.

mod conversion;
mod virtualmachine;
mod virtualmachineclass;
mod virtualmachineservice;

pub use conversion::conditions::{
    CLASS_NOT_FOUND_REASONS, IMAGE_NOT_FOUND_REASONS, VIRTUAL_MACHINE_PREREQ_READY_CONDITION,
};
pub use conversion::virtualmachine::{
    BOOT_DISK_DEVICE_KEY, BOOT_DISK_VOLUME_NAME, NETWORK_PROVIDERS, PAUSE_RECONCILE_ANNOTATION,
};
pub use virtualmachine::*;
pub use virtualmachineclass::*;
pub use virtualmachineservice::*;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use serde::{Deserialize, Serialize};
use vmop_core::{ConditionLike, ConditionStatus};

pub const CONDITION_SEVERITY_ERROR: &str = "Error";
pub const CONDITION_SEVERITY_WARNING: &str = "Warning";
pub const CONDITION_SEVERITY_INFO: &str = "Info";

/// Condition with a severity, only meaningful while status is False.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub type_: String,
    pub status: ConditionStatus,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub severity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<Time>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub reason: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
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
