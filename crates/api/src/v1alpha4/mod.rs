//! Hub schema version.

mod virtualmachine;
mod virtualmachineclass;
mod virtualmachineservice;

pub use virtualmachine::*;
pub use virtualmachineclass::*;
pub use virtualmachineservice::*;

use vmop_core::Hub;

impl Hub for VirtualMachine {}
impl Hub for VirtualMachineClass {}
impl Hub for VirtualMachineService {}

/// Annotation pausing reconciliation of a VM.
pub const PAUSE_ANNOTATION: &str = "vmoperator.vmware.com/paused";

/// Marks a VM whose v1alpha1 bootstrap object is a ConfigMap rather than a
/// Secret. Set on first up-conversion, read on every down-conversion.
pub const V1ALPHA1_CONFIGMAP_TRANSPORT_ANNOTATION: &str =
    "vmoperator.vmware.com/v1alpha1-configmap-md-transport";

pub const VIRTUAL_MACHINE_CONDITION_CLASS_READY: &str = "VirtualMachineClassReady";
pub const VIRTUAL_MACHINE_CONDITION_IMAGE_READY: &str = "VirtualMachineImageReady";
pub const VIRTUAL_MACHINE_CONDITION_VM_SET_RESOURCE_POLICY_READY: &str =
    "VirtualMachineConditionVMSetResourcePolicyReady";
pub const VIRTUAL_MACHINE_CONDITION_BOOTSTRAP_READY: &str = "VirtualMachineBootstrapReady";
pub const VIRTUAL_MACHINE_CONDITION_CREATED: &str = "VirtualMachineCreated";
