use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::CustomResource;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use vmop_core::{string_enum, Condition};

use crate::is_default;

string_enum! {
    pub enum VirtualMachinePowerState {
        PoweredOff => "PoweredOff",
        PoweredOn => "PoweredOn",
        Suspended => "Suspended",
    }
}

string_enum! {
    pub enum VirtualMachinePowerOpMode {
        Hard => "Hard",
        Soft => "Soft",
        TrySoft => "TrySoft",
    }
}

string_enum! {
    pub enum VolumeProvisioningMode {
        Thin => "Thin",
        Thick => "Thick",
        ThickEagerZero => "ThickEagerZero",
    }
}

string_enum! {
    pub enum VirtualMachineStorageDiskType {
        Classic => "Classic",
        Managed => "Managed",
    }
}

string_enum! {
    pub enum VirtualMachinePromoteDisksMode {
        Disabled => "Disabled",
        Online => "Online",
        Offline => "Offline",
    }
}

string_enum! {
    pub enum GuestHeartbeatStatus {
        Gray => "gray",
        Red => "red",
        Yellow => "yellow",
        Green => "green",
    }
}

#[derive(CustomResource, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[kube(
    group = "vmoperator.vmware.com",
    version = "v1alpha4",
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<VirtualMachineImageRef>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub class_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub storage_class: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bootstrap: Option<VirtualMachineBootstrapSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<VirtualMachineNetworkSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_state: Option<VirtualMachinePowerState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_off_mode: Option<VirtualMachinePowerOpMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspend_mode: Option<VirtualMachinePowerOpMode>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub next_restart_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restart_mode: Option<VirtualMachinePowerOpMode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<VirtualMachineVolume>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readiness_probe: Option<VirtualMachineReadinessProbeSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advanced: Option<VirtualMachineAdvancedSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserved: Option<VirtualMachineReservedSpec>,
    #[serde(skip_serializing_if = "is_default")]
    pub min_hardware_version: i32,
    #[serde(rename = "instanceUUID", skip_serializing_if = "String::is_empty")]
    pub instance_uuid: String,
    #[serde(rename = "biosUUID", skip_serializing_if = "String::is_empty")]
    pub bios_uuid: String,
    #[serde(rename = "guestID", skip_serializing_if = "String::is_empty")]
    pub guest_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cdrom: Vec<VirtualMachineCdromSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crypto: Option<VirtualMachineCryptoSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promote_disks_mode: Option<VirtualMachinePromoteDisksMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boot_options: Option<VirtualMachineBootOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affinity: Option<VirtualMachineAffinitySpec>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub group_name: String,
}

/// Reference to the image a VM was deployed from. `kind` is empty until a
/// controller resolves it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineImageRef {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SecretKeySelector {
    pub name: String,
    pub key: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyValuePair {
    pub key: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub value: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineBootstrapSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_init: Option<VirtualMachineBootstrapCloudInitSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linux_prep: Option<VirtualMachineBootstrapLinuxPrepSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sysprep: Option<VirtualMachineBootstrapSysprepSpec>,
    #[serde(rename = "vAppConfig", skip_serializing_if = "Option::is_none")]
    pub vapp_config: Option<VirtualMachineBootstrapVAppConfigSpec>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineBootstrapCloudInitSpec {
    #[serde(rename = "instanceID", skip_serializing_if = "String::is_empty")]
    pub instance_id: String,
    /// Inline cloud-config document, kept opaque.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_config: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_cloud_config: Option<SecretKeySelector>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ssh_authorized_keys: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_global_nameservers_as_default: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_global_search_domains_as_default: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_on_network4: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_on_network6: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineBootstrapLinuxPrepSpec {
    #[serde(rename = "hardwareClockIsUTC", skip_serializing_if = "Option::is_none")]
    pub hardware_clock_is_utc: Option<bool>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub time_zone: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineBootstrapSysprepSpec {
    /// Inline sysprep answers, kept opaque.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sysprep: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_sysprep: Option<SecretKeySelector>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineBootstrapVAppConfigSpec {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<KeyValuePair>,
    /// Name of the Secret holding the raw properties.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub raw_properties: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineNetworkSpec {
    #[serde(skip_serializing_if = "is_default")]
    pub disabled: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub host_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub domain_name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nameservers: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub search_domains: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<VirtualMachineNetworkInterfaceSpec>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineNetworkInterfaceSpec {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<PartialObjectRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub gateway4: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub gateway6: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtu: Option<i64>,
}

/// Typed reference to a network object of some provider.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartialObjectRef {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineVolume {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistent_volume_claim: Option<PersistentVolumeClaimVolumeSource>,
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
pub struct VirtualMachineReadinessProbeSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tcp_socket: Option<TcpSocketAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_heartbeat: Option<GuestHeartbeatAction>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub guest_info: Vec<GuestInfoAction>,
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold_status: Option<GuestHeartbeatStatus>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GuestInfoAction {
    pub key: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub value: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineAdvancedSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boot_disk_capacity: Option<Quantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_volume_provisioning_mode: Option<VolumeProvisioningMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_block_tracking: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineReservedSpec {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub resource_policy_name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineCdromSpec {
    pub name: String,
    pub image: VirtualMachineImageRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_guest_control: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineCryptoSpec {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub encryption_class_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_default_key_provider: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineBootOptions {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub firmware: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub boot_delay: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub boot_retry_delay: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub efi_secure_boot: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineAffinitySpec {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required_zones: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub preferred_zones: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<LocalObjectRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<LocalObjectRef>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub node_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_state: Option<VirtualMachinePowerState>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<VirtualMachineNetworkStatus>,
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
    #[serde(skip_serializing_if = "String::is_empty")]
    pub zone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_restart_time: Option<Time>,
    #[serde(skip_serializing_if = "is_default")]
    pub hardware_version: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocalObjectRef {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kind: String,
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineNetworkStatus {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub host_name: String,
    #[serde(rename = "primaryIP4", skip_serializing_if = "String::is_empty")]
    pub primary_ip4: String,
    #[serde(rename = "primaryIP6", skip_serializing_if = "String::is_empty")]
    pub primary_ip6: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<VirtualMachineNetworkInterfaceStatus>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineNetworkInterfaceStatus {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<VirtualMachineNetworkInterfaceIpStatus>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineNetworkInterfaceIpStatus {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<VirtualMachineNetworkInterfaceIpAddrStatus>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mac_addr: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineNetworkInterfaceIpAddrStatus {
    pub address: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualMachineVolumeStatus {
    pub name: String,
    #[serde(skip_serializing_if = "is_default")]
    pub attached: bool,
    #[serde(rename = "diskUUID", skip_serializing_if = "String::is_empty")]
    pub disk_uuid: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub error: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<VirtualMachineStorageDiskType>,
}
