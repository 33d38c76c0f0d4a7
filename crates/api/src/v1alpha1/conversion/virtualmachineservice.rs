use vmop_core::{structural, ConversionResult, Convertible};

use crate::v1alpha1 as spoke;
use crate::v1alpha4 as hub;

/// Services have the same shape at every version.
impl Convertible for spoke::VirtualMachineService {
    type Hub = hub::VirtualMachineService;

    fn convert_to(&self) -> ConversionResult<hub::VirtualMachineService> {
        structural::copy(self)
    }

    fn convert_from(hub: &hub::VirtualMachineService) -> ConversionResult<Self> {
        structural::copy(hub)
    }
}
