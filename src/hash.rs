//! Hash function implementations.
//!
//! The cache core treats hashing as an opaque, pure `uri -> fingerprint`
//! function (see [`UriHasher`]); this module just ships two concrete,
//! ready-to-use implementations so the crate is usable without callers
//! having to bring their own.

use crate::fingerprint::Fingerprint;
use sha1::{Digest, Sha1};

/// A pure function mapping a caller-supplied URI to a fixed-width
/// [`Fingerprint`].
///
/// Implementations must be deterministic: the same `uri` must always
/// produce the same fingerprint, and every fingerprint produced by a given
/// hasher must have the same length (in bytes of [`Fingerprint::as_str`]).
/// The cache does not defend against hash collisions; producing the same
/// fingerprint for two different URIs is undefined behavior from the
/// cache's point of view.
pub trait UriHasher: Send + Sync {
    /// Length, in bytes, of every fingerprint this hasher produces.
    fn hash_len(&self) -> usize;

    /// Compute the fingerprint of a URI.
    fn hash_uri(&self, uri: &str) -> Fingerprint;
}

/// SHA-1-backed hasher producing 40-character lowercase hex fingerprints.
///
/// This is the reference default described in the cache's external
/// interface: a fast, collision-resistant-enough-for-caching digest that is
/// also a valid file name on every supported platform.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha1Hasher;

impl UriHasher for Sha1Hasher {
    fn hash_len(&self) -> usize {
        40
    }

    fn hash_uri(&self, uri: &str) -> Fingerprint {
        let mut hasher = Sha1::new();
        hasher.update(uri.as_bytes());
        Fingerprint::new(hex::encode(hasher.finalize()))
    }
}

/// CRC-32-backed hasher producing 8-character lowercase hex fingerprints.
///
/// Not collision-resistant; included as a fast alternative and to exercise
/// the cache core against a hasher with a different fingerprint width than
/// [`Sha1Hasher`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Crc32Hasher;

impl UriHasher for Crc32Hasher {
    fn hash_len(&self) -> usize {
        8
    }

    fn hash_uri(&self, uri: &str) -> Fingerprint {
        let checksum = crc32fast::hash(uri.as_bytes());
        Fingerprint::new(format!("{checksum:08x}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha1_matches_known_vectors() {
        let hasher = Sha1Hasher;
        assert_eq!(
            hasher.hash_uri("").as_str(),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );
        assert_eq!(
            hasher
                .hash_uri("The quick brown fox jumps over the lazy dog")
                .as_str(),
            "2fd4e1c67a2d28fced849ee1bb76e7391b93eb12"
        );
        assert_eq!(hasher.hash_len(), 40);
    }

    #[test]
    fn crc32_matches_known_vectors() {
        let hasher = Crc32Hasher;
        assert_eq!(hasher.hash_uri("").as_str(), "00000000");
        assert_eq!(
            hasher
                .hash_uri("The quick brown fox jumps over the lazy dog")
                .as_str(),
            "414fa339"
        );
        assert_eq!(hasher.hash_uri("CRYPTO").as_str(), "98d0ef03");
        assert_eq!(hasher.hash_len(), 8);
    }

    #[test]
    fn fingerprint_length_is_stable_across_inputs() {
        let hasher = Sha1Hasher;
        for uri in ["", "a", "https://example.com/some/long/path?query=1"] {
            assert_eq!(hasher.hash_uri(uri).len(), hasher.hash_len());
        }
    }
}
