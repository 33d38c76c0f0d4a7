//! Conversion error taxonomy.

use thiserror::Error;

/// Errors a conversion call can return.
///
/// `MalformedSideChannelSnapshot` is reported by the side-channel decoder
/// only; conversion drivers treat it as "no snapshot" and never surface it.
/// Unknown enum values are not an error at all: they pass through verbatim.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("unknown version {version} for kind {kind}")]
    UnknownVersion { kind: String, version: String },

    #[error("no conversion path for {kind} from {from} to {to}")]
    NoConversionPath { kind: String, from: String, to: String },

    #[error("malformed hub snapshot: {0}")]
    MalformedSideChannelSnapshot(String),

    /// A field shared by name between two versions has incompatible shapes.
    /// This is a bug in the schema definitions, not a runtime condition.
    #[error("structural mismatch converting into {target}: {reason}")]
    StructuralMismatch { target: &'static str, reason: String },

    #[error("invalid object: {0}")]
    InvalidObject(String),

    #[error("invalid registry: {0}")]
    InvalidRegistry(String),
}

pub type ConversionResult<T> = Result<T, ConversionError>;

impl ConversionError {
    pub fn unknown_version(kind: impl Into<String>, version: impl Into<String>) -> Self {
        Self::UnknownVersion { kind: kind.into(), version: version.into() }
    }

    /// Stable short label, used for metrics and CLI exit reporting.
    pub fn label(&self) -> &'static str {
        match self {
            Self::UnknownVersion { .. } => "unknown_version",
            Self::NoConversionPath { .. } => "no_conversion_path",
            Self::MalformedSideChannelSnapshot(_) => "malformed_snapshot",
            Self::StructuralMismatch { .. } => "structural_mismatch",
            Self::InvalidObject(_) => "invalid_object",
            Self::InvalidRegistry(_) => "invalid_registry",
        }
    }
}
