pub(crate) mod conditions;
pub(crate) mod virtualmachine;
mod virtualmachineclass;
mod virtualmachineservice;
