//! Memory-backed cache store: a single growable byte buffer plus a map from
//! fingerprint to the span it occupies.

use crate::error::MemoryCacheError;
use crate::fingerprint::Fingerprint;
use crate::hash::UriHasher;
use crate::policy::EvictionPolicy;
use std::collections::HashMap;

/// Default maximum cache size, in mebibytes, used by [`MemoryCache::open_with_defaults`].
pub const DEFAULT_MEMORY_CACHE_MAX_SIZE_MIB: u64 = 10;

const MIB: u64 = 1024 * 1024;

#[derive(Clone, Copy, Debug)]
struct Descriptor {
    position: usize,
    length: usize,
}

/// An in-process cache that packs payloads into one contiguous buffer.
///
/// Every live entry occupies a gap-free span of the buffer; removing an
/// entry compacts the buffer by shifting every later span left and
/// rewriting its descriptor, so the live region is always `buffer[0..size())`.
pub struct MemoryCache {
    hasher: Box<dyn UriHasher>,
    policy: Box<dyn EvictionPolicy>,
    buffer: Vec<u8>,
    descriptors: HashMap<Fingerprint, Descriptor>,
    max_cache_size: u64,
}

impl MemoryCache {
    /// Construct a memory cache with a `max_size_mib` mebibyte budget.
    pub fn new(hasher: Box<dyn UriHasher>, mut policy: Box<dyn EvictionPolicy>, max_size_mib: u64) -> Self {
        policy.set_hash_size(hasher.hash_len());
        let max_cache_size = max_size_mib.saturating_mul(MIB);
        Self {
            hasher,
            policy,
            buffer: Vec::with_capacity(max_cache_size.min(usize::MAX as u64) as usize),
            descriptors: HashMap::new(),
            max_cache_size,
        }
    }

    /// Construct with the reference default budget ([`DEFAULT_MEMORY_CACHE_MAX_SIZE_MIB`]).
    pub fn new_with_defaults(hasher: Box<dyn UriHasher>, policy: Box<dyn EvictionPolicy>) -> Self {
        Self::new(hasher, policy, DEFAULT_MEMORY_CACHE_MAX_SIZE_MIB)
    }

    /// Read the payload stored for `uri`.
    pub fn read(&mut self, uri: &str) -> Result<Vec<u8>, MemoryCacheError> {
        let fp = self.hasher.hash_uri(uri);
        let exists = self.policy.exists(&fp).unwrap_or(false);
        if !exists {
            return Err(MemoryCacheError::ItemDoesNotExist);
        }

        let descriptor = self
            .descriptors
            .get(&fp)
            .ok_or(MemoryCacheError::ItemDoesNotExist)?;
        Ok(self.buffer[descriptor.position..descriptor.position + descriptor.length].to_vec())
    }

    /// Store `bytes` under `uri`.
    ///
    /// Callers are expected not to double-write a live key; a redundant
    /// write surfaces as [`MemoryCacheError::CouldNotRemoveItem`], the same
    /// error a policy implementation violating its own "no duplicates"
    /// contract would produce.
    pub fn write(&mut self, uri: &str, bytes: &[u8]) -> Result<(), MemoryCacheError> {
        let fp = self.hasher.hash_uri(uri);
        if self.policy.exists(&fp).unwrap_or(false) {
            return Err(MemoryCacheError::CouldNotRemoveItem);
        }

        self.evict_until_fits(bytes.len() as u64)?;

        let position = self.buffer.len();
        self.buffer.extend_from_slice(bytes);
        self.descriptors.insert(
            fp.clone(),
            Descriptor {
                position,
                length: bytes.len(),
            },
        );
        self.policy.add(fp)?;
        Ok(())
    }

    /// Remove the entry stored for `uri`, if any.
    pub fn remove(&mut self, uri: &str) -> Result<(), MemoryCacheError> {
        let fp = self.hasher.hash_uri(uri);
        self.remove_entry(&fp)
    }

    /// Remove every entry, clearing the buffer, the descriptor map, and the policy.
    pub fn clear(&mut self) -> Result<(), MemoryCacheError> {
        self.buffer.clear();
        self.descriptors.clear();
        self.policy.clear();
        Ok(())
    }

    /// Live payload bytes currently held in the buffer.
    pub fn size(&self) -> u64 {
        self.buffer.len() as u64
    }

    /// Number of live entries.
    pub fn count(&self) -> usize {
        self.policy.count()
    }

    fn remove_entry(&mut self, fp: &Fingerprint) -> Result<(), MemoryCacheError> {
        let removed = self
            .descriptors
            .remove(fp)
            .ok_or(MemoryCacheError::ItemDoesNotExist)?;

        let start = removed.position;
        let end = removed.position + removed.length;
        self.buffer.drain(start..end);
        for descriptor in self.descriptors.values_mut() {
            if descriptor.position > removed.position {
                descriptor.position -= removed.length;
            }
        }

        let _ = self.policy.remove(fp);
        Ok(())
    }

    fn evict_until_fits(&mut self, need: u64) -> Result<(), MemoryCacheError> {
        if need > self.max_cache_size {
            return Err(MemoryCacheError::SizeExceedsCacheSize);
        }

        while (self.buffer.len() as u64) + need > self.max_cache_size {
            let victim = self
                .policy
                .back()
                .ok_or(MemoryCacheError::CouldNotRemoveItem)?;
            self.remove_entry(&victim)?;
        }
        Ok(())
    }
}
