// ABOUTME: Object storage operations used for source bundles.
// ABOUTME: A single typed upload call.

use super::shared_types::PutObjectRequest;
use crate::platform::PlatformError;
use async_trait::async_trait;

/// Upload of source bundles to object storage.
#[async_trait]
pub trait StorageOps: Send + Sync {
    /// Store the request body at its location, replacing any existing object.
    async fn put_object(&self, request: PutObjectRequest) -> Result<(), PlatformError>;
}
