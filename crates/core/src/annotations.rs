//! Copy-on-write annotation edits.
//!
//! A conversion step never touches the caller's annotation map: it takes a
//! copy with [`Annotations::of`], chains edits on the owned value, and writes
//! the result into the object it is building.

use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations(BTreeMap<String, String>);

impl Annotations {
    pub fn of(meta: &ObjectMeta) -> Self {
        Self(meta.annotations.clone().unwrap_or_default())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.0.insert(key.to_owned(), value.into());
        self
    }

    /// Like [`with`](Self::with) but leaves an existing value alone.
    pub fn with_default(mut self, key: &str, value: impl Into<String>) -> Self {
        self.0.entry(key.to_owned()).or_insert_with(|| value.into());
        self
    }

    pub fn without(mut self, key: &str) -> Self {
        self.0.remove(key);
        self
    }

    /// Move the value stored under `from` to `to`. No-op when `from` is unset.
    pub fn renamed(mut self, from: &str, to: &str) -> Self {
        if let Some(v) = self.0.remove(from) {
            self.0.insert(to.to_owned(), v);
        }
        self
    }

    /// Store into `meta`; an empty set clears the field entirely.
    pub fn apply_to(self, meta: &mut ObjectMeta) {
        meta.annotations = if self.0.is_empty() { None } else { Some(self.0) };
    }
}

impl From<Annotations> for BTreeMap<String, String> {
    fn from(a: Annotations) -> Self {
        a.0
    }
}
