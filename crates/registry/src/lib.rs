//! Version registry: the single conversion entry point.
//!
//! Each kind registers exactly one hub version and any number of spokes.
//! Every conversion routes through the hub, so spoke-to-spoke requests are
//! two hops. The registry is immutable once built and safe to share.

#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::time::Instant;

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::core::DynamicObject;
use kube::{CustomResourceExt, Resource};
use metrics::{counter, histogram};
use once_cell::sync::OnceCell;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::debug;
use vmop_api::{v1alpha1, v1alpha2, v1alpha4};
use vmop_core::{ConversionError, ConversionResult, Convertible, Hub};

mod crd;
pub mod fidelity;

pub use fidelity::{diff_summary, DiffSummary, RoundTrip};

type ConvertFn = fn(&Value) -> ConversionResult<Value>;
type CrdFn = fn() -> CustomResourceDefinition;

struct SpokeEdge {
    to_hub: ConvertFn,
    from_hub: ConvertFn,
    crd: CrdFn,
}

struct KindEntry {
    hub: String,
    hub_crd: CrdFn,
    spokes: BTreeMap<String, SpokeEdge>,
}

impl KindEntry {
    fn knows(&self, version: &str) -> bool {
        version == self.hub || self.spokes.contains_key(version)
    }
}

pub struct Registry {
    kinds: BTreeMap<String, KindEntry>,
}

struct HubRegistration {
    kind: String,
    version: String,
    crd: CrdFn,
}

struct SpokeRegistration {
    kind: String,
    hub_version: String,
    version: String,
    edge: SpokeEdge,
}

#[derive(Default)]
pub struct RegistryBuilder {
    hubs: Vec<HubRegistration>,
    spokes: Vec<SpokeRegistration>,
}

impl RegistryBuilder {
    pub fn hub<H>(mut self) -> Self
    where
        H: Hub + Resource<DynamicType = ()> + CustomResourceExt,
    {
        self.hubs.push(HubRegistration {
            kind: H::kind(&()).into_owned(),
            version: H::version(&()).into_owned(),
            crd: H::crd,
        });
        self
    }

    pub fn spoke<S>(mut self) -> Self
    where
        S: Convertible + Resource<DynamicType = ()> + CustomResourceExt,
        S::Hub: Resource<DynamicType = ()>,
    {
        self.spokes.push(SpokeRegistration {
            kind: S::kind(&()).into_owned(),
            hub_version: <S::Hub as Resource>::version(&()).into_owned(),
            version: S::version(&()).into_owned(),
            edge: SpokeEdge { to_hub: to_hub::<S>, from_hub: from_hub::<S>, crd: S::crd },
        });
        self
    }

    pub fn build(self) -> ConversionResult<Registry> {
        let mut kinds = BTreeMap::new();
        for hub in self.hubs {
            if kinds.contains_key(&hub.kind) {
                return Err(ConversionError::InvalidRegistry(format!("duplicate hub for kind {}", hub.kind)));
            }
            kinds.insert(hub.kind, KindEntry { hub: hub.version, hub_crd: hub.crd, spokes: BTreeMap::new() });
        }
        for spoke in self.spokes {
            let entry = kinds.get_mut(&spoke.kind).ok_or_else(|| {
                ConversionError::InvalidRegistry(format!("spoke {}/{} has no registered hub", spoke.kind, spoke.version))
            })?;
            if entry.hub != spoke.hub_version {
                return Err(ConversionError::InvalidRegistry(format!(
                    "spoke {}/{} converts to {} but the hub is {}",
                    spoke.kind, spoke.version, spoke.hub_version, entry.hub
                )));
            }
            if entry.knows(&spoke.version) {
                return Err(ConversionError::InvalidRegistry(format!(
                    "version {} of {} registered twice",
                    spoke.version, spoke.kind
                )));
            }
            entry.spokes.insert(spoke.version, spoke.edge);
        }
        Ok(Registry { kinds })
    }
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Every kind and version this crate serves.
    pub fn builtin() -> ConversionResult<Self> {
        Self::builder()
            .hub::<v1alpha4::VirtualMachine>()
            .spoke::<v1alpha1::VirtualMachine>()
            .hub::<v1alpha4::VirtualMachineClass>()
            .spoke::<v1alpha1::VirtualMachineClass>()
            .spoke::<v1alpha2::VirtualMachineClass>()
            .hub::<v1alpha4::VirtualMachineService>()
            .spoke::<v1alpha1::VirtualMachineService>()
            .build()
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(String::as_str)
    }

    pub fn hub_version(&self, kind: &str) -> Option<&str> {
        self.kinds.get(kind).map(|e| e.hub.as_str())
    }

    /// Hub first, then spokes in version order.
    pub fn versions(&self, kind: &str) -> Option<Vec<&str>> {
        let entry = self.kinds.get(kind)?;
        Some(std::iter::once(entry.hub.as_str()).chain(entry.spokes.keys().map(String::as_str)).collect())
    }

    /// Convert an encoded object of version `from` to version `to`.
    ///
    /// The kind is read from the object. Same-version requests return an
    /// unchanged copy.
    pub fn convert(&self, obj: &Value, from: &str, to: &str) -> ConversionResult<Value> {
        let kind = obj
            .get("kind")
            .and_then(Value::as_str)
            .ok_or_else(|| ConversionError::InvalidObject("object has no kind".into()))?;
        if let Some(declared) = obj.get("apiVersion").and_then(Value::as_str).map(version_of) {
            if declared != from {
                return Err(ConversionError::InvalidObject(format!(
                    "object is {declared} but conversion source is {from}"
                )));
            }
        }
        let started = Instant::now();
        let result = self.route(kind, obj, from, to);
        histogram!("conversion_latency_ms", started.elapsed().as_secs_f64() * 1000.0, "kind" => kind.to_owned());
        counter!("conversion_total", 1u64, "kind" => kind.to_owned(), "to" => to.to_owned());
        if let Err(e) = &result {
            counter!("conversion_err_total", 1u64, "kind" => kind.to_owned(), "reason" => e.label());
        }
        result
    }

    /// [`convert`](Self::convert) for dynamic objects; the source version
    /// comes from the object's type metadata.
    pub fn convert_dynamic(&self, obj: &DynamicObject, to: &str) -> ConversionResult<DynamicObject> {
        let types = obj
            .types
            .as_ref()
            .ok_or_else(|| ConversionError::InvalidObject("dynamic object has no type metadata".into()))?;
        let raw = serde_json::to_value(obj).map_err(|e| ConversionError::InvalidObject(e.to_string()))?;
        let out = self.convert(&raw, version_of(&types.api_version), to)?;
        serde_json::from_value(out).map_err(|e| ConversionError::InvalidObject(e.to_string()))
    }

    fn route(&self, kind: &str, obj: &Value, from: &str, to: &str) -> ConversionResult<Value> {
        let entry = self.kinds.get(kind).ok_or_else(|| ConversionError::NoConversionPath {
            kind: kind.to_owned(),
            from: from.to_owned(),
            to: to.to_owned(),
        })?;
        for version in [from, to] {
            if !entry.knows(version) {
                return Err(ConversionError::unknown_version(kind, version));
            }
        }
        debug!(kind, from, to, "converting");
        if from == to {
            return Ok(obj.clone());
        }
        let hub = match entry.spokes.get(from) {
            Some(edge) => (edge.to_hub)(obj)?,
            None => obj.clone(),
        };
        match entry.spokes.get(to) {
            Some(edge) => (edge.from_hub)(&hub),
            None => Ok(hub),
        }
    }
}

static GLOBAL: OnceCell<Registry> = OnceCell::new();

/// Process-wide registry of the built-in kinds, built on first use.
pub fn global() -> ConversionResult<&'static Registry> {
    GLOBAL.get_or_try_init(Registry::builtin)
}

/// `group/version` or bare `version` -> `version`.
fn version_of(api_version: &str) -> &str {
    api_version.rsplit('/').next().unwrap_or(api_version)
}

fn to_hub<S>(raw: &Value) -> ConversionResult<Value>
where
    S: Convertible + Resource<DynamicType = ()>,
    S::Hub: Resource<DynamicType = ()>,
{
    let spoke: S = decode(raw)?;
    encode(&spoke.convert_to()?)
}

fn from_hub<S>(raw: &Value) -> ConversionResult<Value>
where
    S: Convertible + Resource<DynamicType = ()>,
    S::Hub: Resource<DynamicType = ()>,
{
    let hub: S::Hub = decode(raw)?;
    encode(&S::convert_from(&hub)?)
}

fn decode<T>(raw: &Value) -> ConversionResult<T>
where
    T: DeserializeOwned + Resource<DynamicType = ()>,
{
    let mut raw = raw.clone();
    if let Value::Object(map) = &mut raw {
        for key in ["metadata", "spec"] {
            map.entry(key).or_insert_with(|| Value::Object(Default::default()));
        }
    }
    serde_json::from_value(raw)
        .map_err(|e| ConversionError::InvalidObject(format!("decoding {}: {e}", T::api_version(&()))))
}

/// Encode with type metadata set from the target type.
fn encode<T>(obj: &T) -> ConversionResult<Value>
where
    T: Serialize + Resource<DynamicType = ()>,
{
    let mut v = serde_json::to_value(obj)
        .map_err(|e| ConversionError::InvalidObject(format!("encoding {}: {e}", T::api_version(&()))))?;
    if let Value::Object(map) = &mut v {
        map.insert("apiVersion".into(), Value::String(T::api_version(&()).into_owned()));
        map.insert("kind".into(), Value::String(T::kind(&()).into_owned()));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builtin_registry_lists_every_kind() {
        let reg = Registry::builtin().unwrap();
        let kinds: Vec<_> = reg.kinds().collect();
        assert_eq!(kinds, ["VirtualMachine", "VirtualMachineClass", "VirtualMachineService"]);
        assert_eq!(reg.hub_version("VirtualMachineClass"), Some("v1alpha4"));
        assert_eq!(reg.versions("VirtualMachineClass").unwrap(), ["v1alpha4", "v1alpha1", "v1alpha2"]);
        assert!(reg.versions("Pod").is_none());
    }

    #[test]
    fn global_is_built_once() {
        let a = global().unwrap() as *const Registry;
        let b = global().unwrap() as *const Registry;
        assert_eq!(a, b);
    }

    #[test]
    fn spoke_without_hub_is_rejected() {
        let err = Registry::builder().spoke::<v1alpha1::VirtualMachine>().build().err().unwrap();
        assert!(matches!(err, ConversionError::InvalidRegistry(_)), "{err}");
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let dup_hub = Registry::builder().hub::<v1alpha4::VirtualMachine>().hub::<v1alpha4::VirtualMachine>().build();
        assert!(matches!(dup_hub, Err(ConversionError::InvalidRegistry(_))));
        let dup_spoke = Registry::builder()
            .hub::<v1alpha4::VirtualMachine>()
            .spoke::<v1alpha1::VirtualMachine>()
            .spoke::<v1alpha1::VirtualMachine>()
            .build();
        assert!(matches!(dup_spoke, Err(ConversionError::InvalidRegistry(_))));
    }

    #[test]
    fn unknown_version_and_kind() {
        let reg = Registry::builtin().unwrap();
        let obj = json!({"apiVersion": "vmoperator.vmware.com/v1alpha1", "kind": "VirtualMachine", "metadata": {}, "spec": {}});
        let err = reg.convert(&obj, "v1alpha1", "v9").unwrap_err();
        assert!(matches!(err, ConversionError::UnknownVersion { .. }), "{err}");

        let pod = json!({"apiVersion": "v1", "kind": "Pod", "metadata": {}});
        let err = reg.convert(&pod, "v1", "v2").unwrap_err();
        assert!(matches!(err, ConversionError::NoConversionPath { .. }), "{err}");
    }

    #[test]
    fn mismatched_source_version_is_invalid() {
        let reg = Registry::builtin().unwrap();
        let obj = json!({"apiVersion": "vmoperator.vmware.com/v1alpha4", "kind": "VirtualMachine", "metadata": {}, "spec": {}});
        let err = reg.convert(&obj, "v1alpha1", "v1alpha4").unwrap_err();
        assert!(matches!(err, ConversionError::InvalidObject(_)), "{err}");
    }

    #[test]
    fn version_of_handles_core_group() {
        assert_eq!(version_of("v1"), "v1");
        assert_eq!(version_of("vmoperator.vmware.com/v1alpha2"), "v1alpha2");
    }
}
