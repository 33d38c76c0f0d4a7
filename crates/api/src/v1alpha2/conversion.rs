use tracing::trace;
use vmop_core::{structural, ConversionResult, Convertible};

use super::VirtualMachineClass;
use crate::restore_hub_only;
use crate::v1alpha4 as hub;

impl Convertible for VirtualMachineClass {
    type Hub = hub::VirtualMachineClass;

    fn convert_to(&self) -> ConversionResult<hub::VirtualMachineClass> {
        let mut dst: hub::VirtualMachineClass = structural::copy(self)?;
        dst.metadata = vmop_hubdata::strip(&self.metadata);
        if let Some(snapshot) = vmop_hubdata::read_lenient::<hub::VirtualMachineClass>(&self.metadata) {
            trace!(name = ?self.metadata.name, "restoring class reservation from snapshot");
            restore_hub_only!(dst.spec, snapshot.spec, reserved_profile_id, reserved_slots);
        }
        Ok(dst)
    }

    fn convert_from(hub: &hub::VirtualMachineClass) -> ConversionResult<Self> {
        let mut dst: Self = structural::copy(hub)?;
        vmop_hubdata::write(hub, &mut dst.metadata)?;
        Ok(dst)
    }
}
