//! Image storage collaborator contract.
//!
//! The core never reads pixel data or re-encodes images. Normalization
//! (bounded dimensions, JPEG re-encode) happens in the storage collaborator;
//! the core only moves bytes through an opaque reference.

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Upper bound on candidate images per analysis.
///
/// Enforced by the transport layer at upload time, not by the orchestrator.
pub const MAX_CANDIDATE_IMAGES: usize = 5;

/// Opaque handle to a stored, normalized image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    /// Wrap an existing storage reference.
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// The reference as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors from the image storage collaborator.
#[derive(Debug, Error)]
pub enum ImageStoreError {
    /// No image behind the given reference.
    #[error("image not found: {0}")]
    NotFound(String),

    /// Underlying storage failed.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Byte-level access to normalized images.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store normalized image bytes and return an opaque reference.
    async fn put(&self, bytes: Vec<u8>, label: &str) -> Result<ImageRef, ImageStoreError>;

    /// Fetch the bytes behind a reference.
    async fn fetch(&self, reference: &ImageRef) -> Result<Vec<u8>, ImageStoreError>;
}

/// In-memory image store for tests and embedded use.
pub struct MemoryImageStore {
    images: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryImageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            images: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored images.
    pub fn len(&self) -> usize {
        self.images.read().unwrap().len()
    }

    /// Whether the store holds no images.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryImageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn put(&self, bytes: Vec<u8>, label: &str) -> Result<ImageRef, ImageStoreError> {
        let key = format!("{label}-{}", Uuid::new_v4());
        self.images.write().unwrap().insert(key.clone(), bytes);
        Ok(ImageRef::new(key))
    }

    async fn fetch(&self, reference: &ImageRef) -> Result<Vec<u8>, ImageStoreError> {
        self.images
            .read()
            .unwrap()
            .get(reference.as_str())
            .cloned()
            .ok_or_else(|| ImageStoreError::NotFound(reference.to_string()))
    }
}
