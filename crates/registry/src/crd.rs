//! Multi-version CustomResourceDefinition assembly and verification.

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::core::crd::merge_crds;
use vmop_core::{ConversionError, ConversionResult};

use crate::Registry;

impl Registry {
    /// One CRD serving every registered version of `kind`, with the hub as
    /// the storage version.
    pub fn crd(&self, kind: &str) -> ConversionResult<CustomResourceDefinition> {
        let entry = self
            .kinds
            .get(kind)
            .ok_or_else(|| ConversionError::InvalidRegistry(format!("kind {kind} is not registered")))?;
        let crds = std::iter::once(entry.hub_crd).chain(entry.spokes.values().map(|e| e.crd)).map(|f| f()).collect();
        merge_crds(crds, &entry.hub).map_err(|e| ConversionError::InvalidRegistry(format!("merging {kind} CRDs: {e}")))
    }

    /// Check an installed CRD against the registry: the hub must be the
    /// storage version and every served version must be convertible.
    pub fn check_crd(&self, crd: &CustomResourceDefinition) -> ConversionResult<()> {
        let kind = crd.spec.names.kind.as_str();
        let entry = self
            .kinds
            .get(kind)
            .ok_or_else(|| ConversionError::InvalidRegistry(format!("kind {kind} is not registered")))?;
        let storage: Vec<&str> = crd.spec.versions.iter().filter(|v| v.storage).map(|v| v.name.as_str()).collect();
        if storage != [entry.hub.as_str()] {
            return Err(ConversionError::InvalidRegistry(format!(
                "{kind} stores {storage:?}, expected {}",
                entry.hub
            )));
        }
        if let Some(v) = crd.spec.versions.iter().find(|v| v.served && !entry.knows(&v.name)) {
            return Err(ConversionError::unknown_version(kind, v.name.as_str()));
        }
        Ok(())
    }
}
