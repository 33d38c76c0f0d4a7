//! Legacy <-> typed enum dispatch tables.
//!
//! Each table lists every legacy literal next to the typed constant it stands
//! for. Lookups in either direction that miss the table fall back to the
//! value's own raw text, so an unrecognised value is carried unchanged
//! instead of being coerced to a default.

/// Typed enums that can hold a raw value they do not recognise.
pub trait LegacyValue: Sized {
    fn from_unrecognized(raw: &str) -> Self;
    fn unrecognized(&self) -> Option<&str>;
}

pub struct EnumTable<T: 'static> {
    name: &'static str,
    pairs: &'static [(&'static str, T)],
}

impl<T: PartialEq + Clone + LegacyValue> EnumTable<T> {
    pub const fn new(name: &'static str, pairs: &'static [(&'static str, T)]) -> Self {
        Self { name, pairs }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn pairs(&self) -> &'static [(&'static str, T)] {
        self.pairs
    }

    /// Legacy literal -> typed value. Unknown literals pass through.
    pub fn to_typed(&self, legacy: &str) -> T {
        self.pairs
            .iter()
            .find(|(l, _)| *l == legacy)
            .map(|(_, t)| t.clone())
            .unwrap_or_else(|| T::from_unrecognized(legacy))
    }

    /// Typed value -> legacy literal. Unknown values pass through; a typed
    /// constant with no legacy spelling yields `None`.
    pub fn to_legacy(&self, typed: &T) -> Option<String> {
        if let Some((l, _)) = self.pairs.iter().find(|(_, t)| t == typed) {
            return Some((*l).to_owned());
        }
        typed.unrecognized().map(str::to_owned)
    }

    /// Optional-field form of [`to_typed`](Self::to_typed): empty means unset.
    pub fn up(&self, legacy: &str) -> Option<T> {
        if legacy.is_empty() {
            None
        } else {
            Some(self.to_typed(legacy))
        }
    }

    /// Optional-field form of [`to_legacy`](Self::to_legacy): unset means empty.
    pub fn down(&self, typed: Option<&T>) -> String {
        typed.and_then(|t| self.to_legacy(t)).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Mode {
        Fast,
        Slow,
        Other(String),
    }

    impl LegacyValue for Mode {
        fn from_unrecognized(raw: &str) -> Self {
            Mode::Other(raw.to_owned())
        }

        fn unrecognized(&self) -> Option<&str> {
            match self {
                Mode::Other(s) => Some(s),
                _ => None,
            }
        }
    }

    static MODES: EnumTable<Mode> = EnumTable::new("mode", &[("fast", Mode::Fast)]);

    #[test]
    fn known_values_map_both_ways() {
        assert_eq!(MODES.to_typed("fast"), Mode::Fast);
        assert_eq!(MODES.to_legacy(&Mode::Fast).as_deref(), Some("fast"));
        assert_eq!(MODES.name(), "mode");
    }

    #[test]
    fn unknown_values_pass_through() {
        assert_eq!(MODES.to_typed("warp"), Mode::Other("warp".into()));
        assert_eq!(MODES.to_legacy(&Mode::Other("warp".into())).as_deref(), Some("warp"));
        assert_eq!(MODES.to_legacy(&Mode::Slow), None);
    }

    #[test]
    fn empty_means_unset() {
        assert_eq!(MODES.up(""), None);
        assert_eq!(MODES.down(None), "");
        assert_eq!(MODES.down(Some(&Mode::Fast)), "fast");
    }
}
