use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::CustomResource;
use serde::{Deserialize, Serialize};
use vmop_core::string_enum;

use super::Condition;
use crate::is_default;

string_enum! {
    pub enum VirtualMachineMetadataTransport {
        ExtraConfig => "ExtraConfig",
        OvfEnv => "OvfEnv",
        VAppConfig => "vAppConfig",
        CloudInit => "CloudInit",
        Sysprep => "Sysprep",
    }
}

string_enum! {
    pub enum VmStatusPhase {
        Creating => "Creating",
        Created => "Created",
        Deleting => "Deleting",
        Deleted => "Deleted",
        Unknown => "Unknown",
    }
}

#[derive(CustomResource, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[kube(
    group = "vmoperator.vmware.com",
    version = "v1alpha1",
    kind = "VirtualMachine",
    namespaced,
    status = "VirtualMachineStatus",
    schema = "disabled",
    derive = "PartialEq",
    derive = "Default"
)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineSpec {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub image_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub class_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub power_state: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub power_off_mode: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub suspend_mode: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub next_restart_time: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub restart_mode: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<VirtualMachinePort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vm_metadata: Option<VirtualMachineMetadata>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub storage_class: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub network_interfaces: Vec<VirtualMachineNetworkInterface>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub resource_policy_name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<VirtualMachineVolume>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readiness_probe: Option<Probe>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advanced_options: Option<VirtualMachineAdvancedOptions>,
    #[serde(skip_serializing_if = "is_default")]
    pub min_hardware_version: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachinePort {
    pub port: i32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ip: String,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub protocol: String,
}

/// Bootstrap data source. At most one of the two object names is set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineMetadata {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub config_map_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub secret_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<VirtualMachineMetadataTransport>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineNetworkInterface {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub network_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub network_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub provider_ref: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ethernet_card_type: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineVolume {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistent_volume_claim: Option<PersistentVolumeClaimVolumeSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vsphere_volume: Option<VsphereVolumeSource>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersistentVolumeClaimVolumeSource {
    pub claim_name: String,
    #[serde(skip_serializing_if = "is_default")]
    pub read_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_volume_claim: Option<InstanceVolumeClaimVolumeSource>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InstanceVolumeClaimVolumeSource {
    pub storage_class: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Quantity>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VsphereVolumeSource {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub capacity: BTreeMap<String, Quantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_key: Option<i32>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Probe {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tcp_socket: Option<TcpSocketAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_heartbeat: Option<GuestHeartbeatAction>,
    #[serde(skip_serializing_if = "is_default")]
    pub timeout_seconds: i32,
    #[serde(skip_serializing_if = "is_default")]
    pub period_seconds: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TcpSocketAction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<IntOrString>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub host: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GuestHeartbeatAction {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub threshold_status: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineAdvancedOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_volume_provisioning_options: Option<VirtualMachineVolumeProvisioningOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_block_tracking: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineVolumeProvisioningOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thin_provisioned: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eager_zeroed: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineStatus {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub host: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub power_state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<VmStatusPhase>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
    #[serde(rename = "vmIp", skip_serializing_if = "String::is_empty")]
    pub vm_ip: String,
    #[serde(rename = "uniqueID", skip_serializing_if = "String::is_empty")]
    pub unique_id: String,
    #[serde(rename = "biosUUID", skip_serializing_if = "String::is_empty")]
    pub bios_uuid: String,
    #[serde(rename = "instanceUUID", skip_serializing_if = "String::is_empty")]
    pub instance_uuid: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<VirtualMachineVolumeStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_block_tracking: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub network_interfaces: Vec<NetworkInterfaceStatus>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub zone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_restart_time: Option<Time>,
    #[serde(skip_serializing_if = "is_default")]
    pub hardware_version: i32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub host_name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineVolumeStatus {
    pub name: String,
    #[serde(skip_serializing_if = "is_default")]
    pub attached: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub disk_uuid: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub error: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkInterfaceStatus {
    pub connected: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mac_address: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ip_addresses: Vec<String>,
}
