//! v1alpha2 schema. Only VirtualMachineClass is served at this version.

mod conversion;
mod virtualmachineclass;

pub use virtualmachineclass::*;
