//! Disk-backed cache store: one file per entry, plus a sidecar index file
//! that persists the eviction policy's order across restarts.

use crate::config::DiskCacheConfig;
use crate::error::DiskCacheError;
use crate::fingerprint::Fingerprint;
use crate::hash::UriHasher;
use crate::policy::EvictionPolicy;
use crate::util::{self, LOG_TARGET};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Default maximum cache size, in mebibytes, used by [`DiskCache::open_with_defaults`].
pub const DEFAULT_DISK_CACHE_MAX_SIZE_MIB: u64 = 50;

/// Fixed, well-known key the index file's own name is derived from.
///
/// Hashing this string with the same hasher used for payload URIs yields a
/// fingerprint that is exceedingly unlikely to collide with a real URI, so
/// the index file can live alongside payload files in the same directory.
const INDEX_FILE_KEY: &str = "myrmo_disk_cache_index";

const MIB: u64 = 1024 * 1024;

/// A directory of content-addressed files with LRU-style (or otherwise
/// policy-driven) eviction and a size budget.
///
/// Every entry is a single file named by the fingerprint of its URI. The
/// eviction policy's order is persisted to a sidecar index file on every
/// mutation and on [`Drop`], so a fresh [`DiskCache::open`] over the same
/// directory recovers the same ordering.
pub struct DiskCache {
    cache_dir: PathBuf,
    index_path: PathBuf,
    hasher: Box<dyn UriHasher>,
    policy: Box<dyn EvictionPolicy>,
    max_cache_size: u64,
    cache_size: u64,
}

impl DiskCache {
    /// Open (creating if necessary) a disk cache rooted at `cache_dir`.
    pub fn open(
        cache_dir: impl Into<PathBuf>,
        hasher: Box<dyn UriHasher>,
        mut policy: Box<dyn EvictionPolicy>,
        max_size_mib: u64,
    ) -> Result<Self, DiskCacheError> {
        let cache_dir = cache_dir.into();
        fs::create_dir_all(&cache_dir).map_err(DiskCacheError::CouldNotWriteFile)?;

        policy.set_hash_size(hasher.hash_len());
        let index_path = cache_dir.join(hasher.hash_uri(INDEX_FILE_KEY).as_str());

        load_index(&cache_dir, &index_path, policy.as_mut());

        let cache_size = reconcile_cache_size(&cache_dir, &index_path, policy.as_ref());

        Ok(Self {
            cache_dir,
            index_path,
            hasher,
            policy,
            max_cache_size: max_size_mib.saturating_mul(MIB),
            cache_size,
        })
    }

    /// Open with the reference default budget ([`DEFAULT_DISK_CACHE_MAX_SIZE_MIB`]).
    pub fn open_with_defaults(
        cache_dir: impl Into<PathBuf>,
        hasher: Box<dyn UriHasher>,
        policy: Box<dyn EvictionPolicy>,
    ) -> Result<Self, DiskCacheError> {
        Self::open(cache_dir, hasher, policy, DEFAULT_DISK_CACHE_MAX_SIZE_MIB)
    }

    /// Open a disk cache rooted at whatever `config` resolves to, falling
    /// back to `default_cache_dir` when `config` carries no override.
    ///
    /// This is the deployment-facing constructor: embedding applications
    /// build a `DiskCacheConfig` once (typically via
    /// [`DiskCacheConfig::from_env`]) and thread it through every cache they
    /// open, rather than hardcoding a cache root.
    pub fn open_with_config(
        default_cache_dir: impl Into<PathBuf>,
        config: &DiskCacheConfig,
        hasher: Box<dyn UriHasher>,
        policy: Box<dyn EvictionPolicy>,
        max_size_mib: u64,
    ) -> Result<Self, DiskCacheError> {
        Self::open(config.resolve(default_cache_dir), hasher, policy, max_size_mib)
    }

    /// Read the payload stored for `uri`.
    pub fn read(&mut self, uri: &str) -> Result<Vec<u8>, DiskCacheError> {
        let fp = self.hasher.hash_uri(uri);
        let exists = self.policy.exists(&fp).unwrap_or(false);
        if !exists {
            return Err(DiskCacheError::FileDoesNotExist);
        }

        fs::read(self.entry_path(&fp)).map_err(|_| DiskCacheError::FileDoesNotExist)
    }

    /// Store `bytes` under `uri`.
    ///
    /// Fails with [`DiskCacheError::FileExists`] if `uri` is already cached
    /// (callers are expected not to double-write), and with
    /// [`DiskCacheError::FileSizeGreaterThanMaxCacheSize`] if `bytes` alone
    /// exceeds the configured budget.
    pub fn write(&mut self, uri: &str, bytes: &[u8]) -> Result<(), DiskCacheError> {
        let fp = self.hasher.hash_uri(uri);
        if self.policy.exists(&fp).unwrap_or(false) {
            return Err(DiskCacheError::FileExists);
        }
        let path = self.entry_path(&fp);
        if path.exists() {
            return Err(DiskCacheError::FileExists);
        }

        self.evict_until_fits(bytes.len() as u64)?;

        fs::write(&path, bytes).map_err(DiskCacheError::CouldNotWriteFile)?;
        self.cache_size += bytes.len() as u64;
        self.policy.add(fp)?;

        self.rewrite_index()
    }

    /// Remove the entry stored for `uri`, if any.
    pub fn remove(&mut self, uri: &str) -> Result<(), DiskCacheError> {
        let fp = self.hasher.hash_uri(uri);
        self.remove_entry(&fp)?;
        self.rewrite_index()
    }

    /// Remove every entry. Post-condition: `size() == 0 && count() == 0`.
    pub fn clear(&mut self) -> Result<(), DiskCacheError> {
        while let Some(victim) = self.policy.back() {
            self.remove_entry(&victim)?;
        }
        self.rewrite_index()
    }

    /// Sum of live payload bytes (excludes the index file).
    pub fn size(&self) -> u64 {
        self.cache_size
    }

    /// Number of live entries.
    pub fn count(&self) -> usize {
        self.policy.count()
    }

    /// The eviction policy's current serialized order, matching what's on
    /// disk in the index file after the last successful mutation.
    pub fn index_data(&self) -> Vec<u8> {
        self.policy.index_data()
    }

    fn entry_path(&self, fp: &Fingerprint) -> PathBuf {
        self.cache_dir.join(fp.as_str())
    }

    /// Remove the file (and policy entry) for `fp`. Returns
    /// [`DiskCacheError::FileDoesNotExist`] if the file is already gone.
    fn remove_entry(&mut self, fp: &Fingerprint) -> Result<(), DiskCacheError> {
        let path = self.entry_path(fp);
        let size = match fs::metadata(&path) {
            Ok(meta) => meta.len(),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(DiskCacheError::FileDoesNotExist)
            }
            Err(err) => return Err(DiskCacheError::CouldNotDeleteFile(err)),
        };

        fs::remove_file(&path).map_err(DiskCacheError::CouldNotDeleteFile)?;
        self.cache_size = self.cache_size.saturating_sub(size);
        // Tolerate `fp` already being absent from the policy: reconciliation
        // at open() can leave orphaned policy entries for files that were
        // deleted out from under the cache.
        let _ = self.policy.remove(fp);
        Ok(())
    }

    fn evict_until_fits(&mut self, need: u64) -> Result<(), DiskCacheError> {
        let mut consecutive_failures = 0u32;
        while self.cache_size.saturating_add(need) > self.max_cache_size {
            let Some(victim) = self.policy.back() else {
                return Err(DiskCacheError::FileSizeGreaterThanMaxCacheSize);
            };

            match self.remove_entry(&victim) {
                Ok(()) => consecutive_failures = 0,
                Err(_) => {
                    consecutive_failures += 1;
                    if consecutive_failures > 5 {
                        return Err(DiskCacheError::CouldNotClearSpaceForFile);
                    }
                }
            }
        }
        Ok(())
    }

    fn rewrite_index(&self) -> Result<(), DiskCacheError> {
        let bytes = self.policy.index_data();
        util::atomic_write(&self.index_path, &bytes).map_err(DiskCacheError::CouldNotWriteIndexFile)
    }
}

impl Drop for DiskCache {
    fn drop(&mut self) {
        if let Err(err) = self.rewrite_index() {
            tracing::warn!(
                target = LOG_TARGET,
                cache_dir = %self.cache_dir.display(),
                error = %err,
                "failed to rewrite cache index file on shutdown"
            );
        }
    }
}

fn load_index(cache_dir: &std::path::Path, index_path: &std::path::Path, policy: &mut dyn EvictionPolicy) {
    match fs::read(index_path) {
        Ok(bytes) => {
            if let Err(err) = policy.set_index_data(&bytes) {
                tracing::warn!(
                    target = LOG_TARGET,
                    cache_dir = %cache_dir.display(),
                    error = %err,
                    "cache index file is corrupted; starting from an empty policy"
                );
                policy.clear();
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            // Fresh cache directory; nothing to load.
        }
        Err(err) => {
            tracing::warn!(
                target = LOG_TARGET,
                cache_dir = %cache_dir.display(),
                error = %err,
                "failed to read cache index file; starting from an empty policy"
            );
        }
    }
}

fn reconcile_cache_size(
    cache_dir: &std::path::Path,
    index_path: &std::path::Path,
    policy: &dyn EvictionPolicy,
) -> u64 {
    let mut cache_size = 0u64;
    let mut tracked = HashSet::new();
    {
        let mut accumulate = |fp: &Fingerprint| {
            tracked.insert(fp.as_str().to_string());
            match util::file_size(&cache_dir.join(fp.as_str())) {
                Some(size) => cache_size += size,
                None => {
                    tracing::debug!(
                        target = LOG_TARGET,
                        fingerprint = %fp,
                        "index references a file missing on disk; treating its contribution as zero"
                    );
                }
            }
        };
        policy.for_each(&mut accumulate);
    }

    if let Ok(entries) = fs::read_dir(cache_dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path == index_path {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !tracked.contains(name) {
                tracing::debug!(
                    target = LOG_TARGET,
                    path = %path.display(),
                    "orphaned cache file is not referenced by the index; leaving it in place"
                );
            }
        }
    }

    cache_size
}
