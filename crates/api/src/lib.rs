//! Versioned VM operator resource schemas.
//!
//! [`v1alpha4`] is the hub for every kind; [`v1alpha1`] and [`v1alpha2`] are
//! spokes, each implementing [`vmop_core::Convertible`] against the hub.
//! Spoke modules hold the conversion rules next to the types they target.

#![forbid(unsafe_code)]

pub mod v1alpha1;
pub mod v1alpha2;
pub mod v1alpha4;

/// API group shared by every kind and version.
pub const GROUP: &str = "vmoperator.vmware.com";

/// Version that all conversions route through.
pub const HUB_VERSION: &str = "v1alpha4";

pub(crate) fn is_default<T: Default + PartialEq>(v: &T) -> bool {
    *v == T::default()
}

/// Copy `field` from `snapshot` into `dst`, for fields that only exist at
/// the hub version and so can only come back through the side channel.
macro_rules! restore_hub_only {
    ($dst:expr, $snapshot:expr, $($field:ident),+ $(,)?) => {
        $( $dst.$field = $snapshot.$field.clone(); )+
    };
}
pub(crate) use restore_hub_only;
