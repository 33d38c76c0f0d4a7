use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use kube::CustomResource;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use vmop_core::Condition;

use crate::is_default;

#[derive(CustomResource, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[kube(
    group = "vmoperator.vmware.com",
    version = "v1alpha4",
    kind = "VirtualMachineClass",
    namespaced,
    status = "VirtualMachineClassStatus",
    schema = "disabled",
    derive = "PartialEq",
    derive = "Default"
)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineClassSpec {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub controller_name: String,
    pub hardware: VirtualMachineClassHardware,
    pub policies: VirtualMachineClassPolicies,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Opaque vSphere ConfigSpec.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_spec: Option<Value>,
    #[serde(rename = "reservedProfileID", skip_serializing_if = "String::is_empty")]
    pub reserved_profile_id: String,
    #[serde(skip_serializing_if = "is_default")]
    pub reserved_slots: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineClassHardware {
    #[serde(skip_serializing_if = "is_default")]
    pub cpus: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<Quantity>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineClassPolicies {
    pub resources: VirtualMachineClassResources,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineClassResources {
    pub requests: VirtualMachineResourceSpec,
    pub limits: VirtualMachineResourceSpec,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineResourceSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<Quantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<Quantity>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineClassStatus {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
    #[serde(skip_serializing_if = "is_default")]
    pub ready: bool,
}
