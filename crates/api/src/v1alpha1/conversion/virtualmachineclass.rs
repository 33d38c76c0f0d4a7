use tracing::trace;
use vmop_core::{structural, ConversionResult, Convertible};

use crate::restore_hub_only;
use crate::v1alpha1 as spoke;
use crate::v1alpha4 as hub;

impl Convertible for spoke::VirtualMachineClass {
    type Hub = hub::VirtualMachineClass;

    fn convert_to(&self) -> ConversionResult<hub::VirtualMachineClass> {
        let mut dst: hub::VirtualMachineClass = structural::copy(self)?;
        dst.metadata = vmop_hubdata::strip(&self.metadata);
        if let Some(snapshot) = vmop_hubdata::read_lenient::<hub::VirtualMachineClass>(&self.metadata) {
            trace!(name = ?self.metadata.name, "restoring class from snapshot");
            restore_hub_only!(dst.spec, snapshot.spec, controller_name, config_spec, reserved_profile_id, reserved_slots);
            dst.status = snapshot.status;
        }
        Ok(dst)
    }

    fn convert_from(hub: &hub::VirtualMachineClass) -> ConversionResult<Self> {
        let mut dst: Self = structural::copy(hub)?;
        vmop_hubdata::write(hub, &mut dst.metadata)?;
        Ok(dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
    use serde_json::json;
    use vmop_core::{Condition, ConditionStatus};

    #[test]
    fn status_and_config_spec_travel_in_the_snapshot() {
        let mut hub = hub::VirtualMachineClass::new(
            "guaranteed-large",
            hub::VirtualMachineClassSpec {
                controller_name: "vsphere".into(),
                config_spec: Some(json!({"numCPUs": 8})),
                hardware: hub::VirtualMachineClassHardware { cpus: 8, memory: Some(Quantity("64Gi".into())) },
                ..Default::default()
            },
        );
        hub.status = Some(hub::VirtualMachineClassStatus {
            ready: true,
            conditions: vec![Condition::new("Ready", ConditionStatus::True)],
            ..Default::default()
        });

        let spoke = spoke::VirtualMachineClass::convert_from(&hub).unwrap();
        assert_eq!(spoke.spec.hardware.cpus, 8);
        assert_eq!(spoke.convert_to().unwrap(), hub);
    }

    #[test]
    fn plain_spoke_has_no_status() {
        let spoke = spoke::VirtualMachineClass::new("small", spoke::VirtualMachineClassSpec::default());
        let hub = spoke.convert_to().unwrap();
        assert!(hub.status.is_none());
        assert!(hub.spec.controller_name.is_empty());
    }
}
