use std::fmt;

/// A fixed-width, filesystem-safe identifier for a cached payload.
///
/// All fingerprints produced by a given [`crate::hash::UriHasher`] have the
/// same byte length, which is what lets [`crate::policy::EvictionPolicy`]
/// round-trip its order through a flat byte blob (see
/// [`crate::policy::EvictionPolicy::set_index_data`]).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Wrap an already-computed hex digest.
    ///
    /// Callers implementing [`crate::hash::UriHasher`] should use this to
    /// construct the fingerprints they return; it performs no validation
    /// beyond taking ownership of the string.
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_underlying_string() {
        let fp = Fingerprint::new("abc123");
        assert_eq!(fp.to_string(), "abc123");
        assert_eq!(fp.as_str(), "abc123");
        assert_eq!(fp.len(), 6);
    }
}
