//! S3 object storage implementation.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::{Error as ObjectStoreError, ObjectStoreExt};

use crate::traits::{ObjectStorage, StoreError, StoreResult};

/// S3 (or S3-compatible) object storage.
///
/// Canonical URLs name their own bucket, so clients are built per bucket on
/// first use and cached. Credentials come from the environment, the way the
/// rest of the AWS tooling expects them.
pub struct S3ObjectStorage {
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
    clients: Mutex<HashMap<String, AmazonS3>>,
}

impl S3ObjectStorage {
    /// Create a new S3ObjectStorage instance.
    ///
    /// # Arguments
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub fn new(region: String, endpoint_url: Option<String>) -> Self {
        S3ObjectStorage {
            region,
            endpoint_url,
            clients: Mutex::new(HashMap::new()),
        }
    }

    fn client_for(&self, bucket: &str) -> StoreResult<AmazonS3> {
        let mut clients = self
            .clients
            .lock()
            .map_err(|_| StoreError::Unavailable("S3 client cache poisoned".to_string()))?;

        if let Some(client) = clients.get(bucket) {
            return Ok(client.clone());
        }

        let mut builder = AmazonS3Builder::from_env()
            .with_region(self.region.clone())
            .with_bucket_name(bucket.to_string());

        if let Some(ref endpoint) = self.endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let client = builder
            .build()
            .map_err(|e| StoreError::ConfigError(e.to_string()))?;

        clients.insert(bucket.to_string(), client.clone());
        Ok(client)
    }
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn delete_object(&self, bucket: &str, key: &str) -> StoreResult<()> {
        let client = self.client_for(bucket)?;
        let location = Path::from(key);

        match client.delete(&location).await {
            Ok(()) => Ok(()),
            // Idempotent delete: an object that is already gone is success.
            Err(ObjectStoreError::NotFound { .. }) => {
                tracing::debug!(bucket = %bucket, key = %key, "Object already absent on delete");
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %bucket,
                    key = %key,
                    "S3 delete failed"
                );
                Err(StoreError::DeleteFailed(e.to_string()))
            }
        }
    }
}
