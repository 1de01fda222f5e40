//! A content-addressed cache engine with pluggable eviction policies and
//! disk- or memory-backed storage.
//!
//! Payloads are keyed by a caller-supplied URI, which is reduced to a
//! fixed-width [`Fingerprint`] by a [`UriHasher`]. Each store enforces a
//! size budget and evicts entries through an [`EvictionPolicy`] ([`LruPolicy`]
//! is the mandatory, reference implementation); the stores never inspect
//! policy internals beyond the ten operations the trait exposes.

pub mod config;
pub mod disk;
pub mod error;
pub mod fingerprint;
pub mod hash;
pub mod memory;
pub mod policy;
mod util;

pub use config::DiskCacheConfig;
pub use disk::{DiskCache, DEFAULT_DISK_CACHE_MAX_SIZE_MIB};
pub use error::{DiskCacheError, MemoryCacheError, PolicyError};
pub use fingerprint::Fingerprint;
pub use hash::{Crc32Hasher, Sha1Hasher, UriHasher};
pub use memory::{MemoryCache, DEFAULT_MEMORY_CACHE_MAX_SIZE_MIB};
pub use policy::{EvictionPolicy, FifoPolicy, LruPolicy};
