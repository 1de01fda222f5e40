use std::path::PathBuf;

/// Deployment-specific configuration for where a disk cache's root should
/// live.
///
/// Everything else about a cache (hasher, eviction policy, size budget) is a
/// constructor parameter supplied by the embedding application; only the
/// cache root is the kind of thing callers typically want to override from
/// the environment (tests, CI, multi-tenant deployments).
#[derive(Clone, Debug, Default)]
pub struct DiskCacheConfig {
    /// Override for the cache root directory.
    pub cache_dir_override: Option<PathBuf>,
}

impl DiskCacheConfig {
    /// Read `BLOBCACHE_DIR` from the environment, if set and non-empty.
    pub fn from_env() -> Self {
        let cache_dir_override = std::env::var_os("BLOBCACHE_DIR")
            .map(PathBuf::from)
            .filter(|path| !path.as_os_str().is_empty());
        Self { cache_dir_override }
    }

    /// Resolve the cache directory to use, given a caller-supplied default.
    pub fn resolve(&self, default: impl Into<PathBuf>) -> PathBuf {
        self.cache_dir_override
            .clone()
            .unwrap_or_else(|| default.into())
    }
}
