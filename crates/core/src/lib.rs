//! VM operator conversion core: version-neutral building blocks shared by
//! every resource kind and schema version.
//!
//! - [`condition`]: typed status conditions and list operations keyed by type.
//! - [`annotations`]: copy-on-write edits of an object's annotation map.
//! - [`structural`]: name-based bulk copy between two schema shapes.
//! - [`remap`]: explicit legacy/typed enum dispatch tables.

#![forbid(unsafe_code)]

use serde::{de::DeserializeOwned, Serialize};

pub mod annotations;
pub mod condition;
pub mod error;
pub mod remap;
pub mod structural;

pub use annotations::Annotations;
pub use condition::{Condition, ConditionLike, ConditionStatus};
pub use error::{ConversionError, ConversionResult};
pub use remap::{EnumTable, LegacyValue};

/// Marker for the canonical schema version of a kind. Only hub objects are
/// ever snapshotted into the side channel.
pub trait Hub: Clone + Serialize + DeserializeOwned {}

/// A spoke version with exactly one conversion edge to and from its hub.
///
/// Both directions take their input by reference and build an owned output;
/// the input is never modified.
pub trait Convertible: Sized + Serialize + DeserializeOwned {
    type Hub: Hub;

    /// Spoke -> hub.
    fn convert_to(&self) -> ConversionResult<Self::Hub>;

    /// Hub -> spoke.
    fn convert_from(hub: &Self::Hub) -> ConversionResult<Self>;
}

pub mod prelude {
    pub use super::{
        Annotations, Condition, ConditionLike, ConditionStatus, ConversionError, ConversionResult,
        Convertible, EnumTable, Hub, LegacyValue,
    };
}

/// Declare a string-backed enum whose unrecognised wire values survive as
/// `Other(raw)` instead of failing to decode.
///
/// The generated type serialises to and from a plain string, so it can sit in
/// any field that used to be free text. Requires `serde` in the caller's
/// dependencies.
#[macro_export]
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(from = "String", into = "String")]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A value this version does not recognise, kept verbatim.
            Other(String),
        }

        impl $name {
            /// All recognised variants, in declaration order.
            pub const KNOWN: &'static [$name] = &[ $( $name::$variant ),+ ];

            pub fn as_str(&self) -> &str {
                match self {
                    $( $name::$variant => $wire, )+
                    $name::Other(raw) => raw.as_str(),
                }
            }
        }

        impl ::std::convert::From<String> for $name {
            fn from(raw: String) -> Self {
                match raw.as_str() {
                    $( $wire => $name::$variant, )+
                    _ => $name::Other(raw),
                }
            }
        }

        impl ::std::convert::From<$name> for String {
            fn from(v: $name) -> String {
                match v {
                    $( $name::$variant => $wire.to_owned(), )+
                    $name::Other(raw) => raw,
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $crate::remap::LegacyValue for $name {
            fn from_unrecognized(raw: &str) -> Self {
                $name::Other(raw.to_owned())
            }

            fn unrecognized(&self) -> Option<&str> {
                match self {
                    $name::Other(raw) => Some(raw.as_str()),
                    _ => None,
                }
            }
        }
    };
}
