//! Hub snapshot side channel.
//!
//! When a hub object is delivered at a spoke version, a snapshot of the hub
//! object (without its metadata) rides along in one reserved annotation of
//! the spoke object. Converting that spoke object back up reads the snapshot
//! to recover what the spoke schema cannot express.
//!
//! Wire format of the annotation value: `"<format>:<payload>"`, currently
//! `v1:` followed by the JSON encoding of the hub object.

#![forbid(unsafe_code)]

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use metrics::counter;
use serde_json::Value;
use tracing::{trace, warn};
use vmop_core::structural::is_zero;
use vmop_core::{Annotations, ConversionError, ConversionResult, Hub};

/// Reserved annotation key holding the hub snapshot on spoke objects.
pub const HUB_DATA_ANNOTATION: &str = "vmoperator.vmware.com/conversion-data";

/// Current snapshot format tag.
pub const FORMAT_V1: &str = "v1";

/// Object keys never stored in a snapshot.
const EXCLUDED_KEYS: [&str; 3] = ["apiVersion", "kind", "metadata"];

/// Encode `hub` as an annotation value. `None` when the object carries
/// nothing beyond metadata.
pub fn encode<H: Hub>(hub: &H) -> ConversionResult<Option<String>> {
    let mut v = serde_json::to_value(hub)
        .map_err(|e| ConversionError::InvalidObject(format!("encoding hub snapshot: {e}")))?;
    if let Value::Object(map) = &mut v {
        for key in EXCLUDED_KEYS {
            map.remove(key);
        }
    }
    if is_zero(&v) {
        return Ok(None);
    }
    let payload = serde_json::to_string(&v)
        .map_err(|e| ConversionError::InvalidObject(format!("encoding hub snapshot: {e}")))?;
    Ok(Some(format!("{FORMAT_V1}:{payload}")))
}

/// Decode an annotation value produced by [`encode`].
pub fn decode<H: Hub>(raw: &str) -> ConversionResult<H> {
    let (format, payload) = raw
        .split_once(':')
        .ok_or_else(|| ConversionError::MalformedSideChannelSnapshot("missing format tag".into()))?;
    if format != FORMAT_V1 {
        return Err(ConversionError::MalformedSideChannelSnapshot(format!("unsupported format {format:?}")));
    }
    let mut v: Value = serde_json::from_str(payload)
        .map_err(|e| ConversionError::MalformedSideChannelSnapshot(e.to_string()))?;
    let map = v
        .as_object_mut()
        .ok_or_else(|| ConversionError::MalformedSideChannelSnapshot("payload is not an object".into()))?;
    map.insert("metadata".into(), Value::Object(Default::default()));
    map.entry("spec").or_insert_with(|| Value::Object(Default::default()));
    serde_json::from_value(v).map_err(|e| ConversionError::MalformedSideChannelSnapshot(e.to_string()))
}

/// Store a snapshot of `hub` on the spoke `target` metadata. A hub with
/// nothing to preserve clears any existing snapshot instead.
pub fn write<H: Hub>(hub: &H, target: &mut ObjectMeta) -> ConversionResult<()> {
    let annotations = Annotations::of(target);
    match encode(hub)? {
        Some(raw) => {
            trace!(bytes = raw.len(), "writing hub snapshot");
            annotations.with(HUB_DATA_ANNOTATION, raw).apply_to(target);
        }
        None => {
            trace!("hub object is empty; skipping snapshot");
            annotations.without(HUB_DATA_ANNOTATION).apply_to(target);
        }
    }
    Ok(())
}

/// Read the snapshot from spoke metadata.
///
/// `Ok(None)` when absent, `Err(MalformedSideChannelSnapshot)` when present
/// but unreadable.
pub fn read<H: Hub>(source: &ObjectMeta) -> ConversionResult<Option<H>> {
    match source.annotations.as_ref().and_then(|a| a.get(HUB_DATA_ANNOTATION)) {
        Some(raw) => decode(raw).map(Some),
        None => Ok(None),
    }
}

/// [`read`], degrading an unreadable snapshot to "absent".
///
/// A snapshot written by a format this build no longer understands must not
/// block conversion of the object forever.
pub fn read_lenient<H: Hub>(source: &ObjectMeta) -> Option<H> {
    match read(source) {
        Ok(found) => found,
        Err(e) => {
            counter!("hubdata_snapshot_discarded_total", 1u64);
            warn!(error = %e, name = ?source.name, "discarding unreadable hub snapshot");
            None
        }
    }
}

/// Copy of `meta` without the snapshot annotation.
pub fn strip(meta: &ObjectMeta) -> ObjectMeta {
    let mut out = meta.clone();
    Annotations::of(meta).without(HUB_DATA_ANNOTATION).apply_to(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Thing {
        metadata: ObjectMeta,
        spec: ThingSpec,
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct ThingSpec {
        #[serde(skip_serializing_if = "String::is_empty")]
        label: String,
    }

    impl Hub for Thing {}

    fn thing(label: &str) -> Thing {
        Thing {
            metadata: ObjectMeta { name: Some("t".into()), ..Default::default() },
            spec: ThingSpec { label: label.into() },
        }
    }

    #[test]
    fn write_then_read_recovers_everything_but_metadata() {
        let mut meta = ObjectMeta::default();
        write(&thing("keep"), &mut meta).unwrap();
        let raw = meta.annotations.as_ref().unwrap().get(HUB_DATA_ANNOTATION).unwrap();
        assert!(raw.starts_with("v1:{"), "{raw}");
        let back: Thing = read(&meta).unwrap().unwrap();
        assert_eq!(back.spec.label, "keep");
        assert_eq!(back.metadata, ObjectMeta::default());
    }

    #[test]
    fn empty_hub_writes_nothing() {
        let mut meta = ObjectMeta::default();
        write(&thing(""), &mut meta).unwrap();
        assert!(meta.annotations.is_none());
    }

    #[test]
    fn empty_hub_clears_stale_snapshot() {
        let mut meta = ObjectMeta::default();
        write(&thing("old"), &mut meta).unwrap();
        write(&thing(""), &mut meta).unwrap();
        assert!(meta.annotations.is_none());
    }

    #[test]
    fn absent_and_malformed_are_distinguished() {
        assert!(read::<Thing>(&ObjectMeta::default()).unwrap().is_none());
        for raw in ["{\"spec\":{}}", "v0:{}", "v1:not json", "v1:[1,2]"] {
            let meta = ObjectMeta {
                annotations: Some([(HUB_DATA_ANNOTATION.to_string(), raw.to_string())].into()),
                ..Default::default()
            };
            let err = read::<Thing>(&meta).unwrap_err();
            assert!(matches!(err, ConversionError::MalformedSideChannelSnapshot(_)), "{raw}: {err}");
            assert!(read_lenient::<Thing>(&meta).is_none());
        }
    }

    #[test]
    fn strip_removes_only_the_snapshot() {
        let mut meta = ObjectMeta {
            annotations: Some([("keep".to_string(), "me".to_string())].into()),
            ..Default::default()
        };
        write(&thing("x"), &mut meta).unwrap();
        let stripped = strip(&meta);
        let a = stripped.annotations.unwrap();
        assert_eq!(a.len(), 1);
        assert!(a.contains_key("keep"));
    }
}
