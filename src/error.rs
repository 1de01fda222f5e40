//! Per-component error taxonomies.
//!
//! Each store reports failures as its own enum rather than a single
//! catch-all error type, so callers can match on exactly the failure modes
//! that operation can produce.

/// Errors produced by an [`crate::policy::EvictionPolicy`] implementation.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone, Copy)]
pub enum PolicyError {
    #[error("fingerprint is already present in the eviction policy")]
    AlreadyExists,

    #[error("fingerprint is not present in the eviction policy")]
    DoesNotExist,

    #[error("index data length is not a multiple of the configured hash size")]
    DataCorrupted,

    #[error("fingerprint length does not match the configured hash size")]
    ErroneousHashSize,
}

/// Errors produced by [`crate::disk::DiskCache`].
#[derive(Debug, thiserror::Error)]
pub enum DiskCacheError {
    #[error("cache file does not exist")]
    FileDoesNotExist,

    #[error("cache file already exists")]
    FileExists,

    #[error("payload is larger than the configured maximum cache size")]
    FileSizeGreaterThanMaxCacheSize,

    #[error("failed to delete cache file")]
    CouldNotDeleteFile(#[source] std::io::Error),

    #[error("could not clear enough space for the new file after repeated eviction attempts")]
    CouldNotClearSpaceForFile,

    #[error("failed to write cache file")]
    CouldNotWriteFile(#[source] std::io::Error),

    #[error("failed to write cache index file")]
    CouldNotWriteIndexFile(#[source] std::io::Error),
}

impl From<PolicyError> for DiskCacheError {
    fn from(err: PolicyError) -> Self {
        // The stores never hand a policy a malformed fingerprint or a
        // duplicate `add`, so reaching this would indicate a policy
        // implementation violating its own contract. Surface it as the
        // closest disk-store equivalent rather than panicking.
        match err {
            PolicyError::AlreadyExists => DiskCacheError::FileExists,
            PolicyError::DoesNotExist => DiskCacheError::FileDoesNotExist,
            PolicyError::DataCorrupted | PolicyError::ErroneousHashSize => {
                DiskCacheError::FileDoesNotExist
            }
        }
    }
}

/// Errors produced by [`crate::memory::MemoryCache`].
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone, Copy)]
pub enum MemoryCacheError {
    #[error("item does not exist in the memory cache")]
    ItemDoesNotExist,

    #[error("failed to remove item from the memory cache")]
    CouldNotRemoveItem,

    #[error("payload size exceeds the configured maximum cache size")]
    SizeExceedsCacheSize,
}

impl From<PolicyError> for MemoryCacheError {
    fn from(_: PolicyError) -> Self {
        MemoryCacheError::CouldNotRemoveItem
    }
}
