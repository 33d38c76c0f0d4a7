//! Round-trip fidelity checks.
//!
//! A round trip converts an object to another version and back, then counts
//! what changed. The hub snapshot annotation is bookkeeping and never counts
//! as a difference.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use vmop_core::{ConversionError, ConversionResult};
use vmop_hubdata::HUB_DATA_ANNOTATION;

use crate::Registry;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub adds: usize,
    pub updates: usize,
    pub removes: usize,
}

impl DiffSummary {
    pub fn is_empty(&self) -> bool {
        self.adds == 0 && self.updates == 0 && self.removes == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundTrip {
    pub from: String,
    pub via: String,
    /// Intermediate object at the `via` version.
    pub intermediate: Value,
    /// Object converted back to `from`.
    pub restored: Value,
    pub summary: DiffSummary,
}

impl RoundTrip {
    pub fn is_lossless(&self) -> bool {
        self.summary.is_empty()
    }
}

/// Count keys present in `target` only (adds), in `base` only (removes) and
/// differing leaves or array slots (updates).
pub fn diff_summary(target: &Value, base: &Value) -> DiffSummary {
    fn walk(a: &Value, b: &Value, s: &mut DiffSummary) {
        match (a, b) {
            (Value::Object(ao), Value::Object(bo)) => {
                for (k, av) in ao {
                    match bo.get(k) {
                        Some(bv) if av == bv => {}
                        Some(bv) => walk(av, bv, s),
                        None => s.adds += 1,
                    }
                }
                s.removes += bo.keys().filter(|k| !ao.contains_key(*k)).count();
            }
            (Value::Array(aa), Value::Array(bb)) => {
                s.updates += aa.iter().zip(bb).filter(|(x, y)| x != y).count();
                if aa.len() > bb.len() { s.adds += aa.len() - bb.len(); }
                if bb.len() > aa.len() { s.removes += bb.len() - aa.len(); }
            }
            (av, bv) => { if av != bv { s.updates += 1; } }
        }
    }
    let mut s = DiffSummary::default();
    walk(target, base, &mut s);
    s
}

/// Drop the snapshot annotation, and the annotation map if that empties it.
fn without_snapshot(obj: &Value) -> Value {
    let mut v = obj.clone();
    if let Some(meta) = v.get_mut("metadata").and_then(Value::as_object_mut) {
        if let Some(Value::Object(ann)) = meta.get_mut("annotations") {
            ann.remove(HUB_DATA_ANNOTATION);
            if ann.is_empty() { meta.remove("annotations"); }
        }
    }
    v
}

impl Registry {
    /// Convert `obj` to `via` and back to its own version.
    pub fn roundtrip(&self, obj: &Value, via: &str) -> ConversionResult<RoundTrip> {
        let from = obj
            .get("apiVersion")
            .and_then(Value::as_str)
            .map(|av| av.rsplit('/').next().unwrap_or(av).to_owned())
            .ok_or_else(|| ConversionError::InvalidObject("object has no apiVersion".into()))?;
        let intermediate = self.convert(obj, &from, via)?;
        let restored = self.convert(&intermediate, via, &from)?;
        let summary = diff_summary(&without_snapshot(&restored), &without_snapshot(obj));
        Ok(RoundTrip { from, via: via.to_owned(), intermediate, restored, summary })
    }
}
