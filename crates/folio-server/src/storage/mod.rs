//! Blob store adapter
//!
//! S3-compatible object storage for author avatars, book covers, and book
//! files. Objects are keyed as `<namespace>/<base>.<ext>` and addressed in
//! the database by their public URL, so deletion works backwards from the
//! stored URL via [`Storage::key_from_url`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::{
    config::{Credentials, Region},
    primitives::ByteStream,
    Client,
};
use tracing::{debug, info, instrument, warn};

pub mod config;

/// Namespace for author profile images.
pub const AVATAR_NAMESPACE: &str = "avatar";
/// Namespace for book cover images.
pub const COVERS_NAMESPACE: &str = "covers";
/// Namespace for book content files.
pub const BOOKS_NAMESPACE: &str = "books";

/// Blob operations the feature command handlers depend on.
///
/// [`Storage`] is the S3-backed implementation. Handlers take any
/// implementation, which keeps upload ordering and compensating deletes
/// exercisable against a substitute store.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store a blob and return its public URL.
    async fn store(&self, key: &str, data: Vec<u8>, content_type: Option<String>)
        -> Result<String>;

    /// Delete the blob a public URL points at. Returns `Ok(false)` when
    /// `url` is empty.
    async fn delete_url(&self, url: &str) -> Result<bool>;
}

#[derive(Clone)]
pub struct Storage {
    client: Client,
    bucket: String,
    endpoint: Option<String>,
    region: String,
    path_style: bool,
}

impl Storage {
    pub fn new(config: config::StorageConfig) -> Self {
        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "folio-storage",
        );

        let mut s3_config_builder = aws_sdk_s3::Config::builder()
            .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(Region::new(config.region.clone()))
            .force_path_style(config.path_style);

        if let Some(endpoint) = &config.endpoint {
            s3_config_builder = s3_config_builder.endpoint_url(endpoint);
        }

        let client = Client::from_conf(s3_config_builder.build());

        info!(bucket = %config.bucket, "Storage client initialized");

        Self {
            client,
            bucket: config.bucket,
            endpoint: config.endpoint,
            region: config.region,
            path_style: config.path_style,
        }
    }

    /// Build the object key for a namespaced file.
    pub fn object_key(namespace: &str, base: &str, extension: &str) -> String {
        format!("{}/{}.{}", namespace, base, extension)
    }

    /// Public URL for an object key.
    pub fn public_url(&self, key: &str) -> String {
        match (&self.endpoint, self.path_style) {
            (Some(endpoint), _) => {
                format!("{}/{}/{}", endpoint.trim_end_matches('/'), self.bucket, key)
            }
            (None, true) => format!(
                "https://s3.{}.amazonaws.com/{}/{}",
                self.region, self.bucket, key
            ),
            (None, false) => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            ),
        }
    }

    /// Recover the object key from a public URL produced by
    /// [`Storage::public_url`].
    pub fn key_from_url(&self, url: &str) -> Result<String> {
        let parsed = url::Url::parse(url).with_context(|| format!("Invalid blob URL: {}", url))?;
        let path = parsed.path().trim_start_matches('/');

        let bucket_prefix = format!("{}/", self.bucket);
        let key = path.strip_prefix(&bucket_prefix).unwrap_or(path);

        if key.is_empty() {
            anyhow::bail!("Blob URL has no object key: {}", url);
        }

        Ok(key.to_string())
    }
}

#[async_trait]
impl BlobStore for Storage {
    /// Any existing object at the same key is overwritten (S3 put
    /// semantics), which is what file replacement relies on.
    #[instrument(skip(self, data), fields(size = data.len()))]
    async fn store(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<String> {
        debug!(bucket = %self.bucket, %key, "Uploading blob");

        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data));

        if let Some(ct) = content_type {
            request = request.content_type(ct);
        }

        request
            .send()
            .await
            .with_context(|| format!("Failed to upload s3://{}/{}", self.bucket, key))?;

        info!(bucket = %self.bucket, %key, "Blob stored");

        Ok(self.public_url(key))
    }

    /// Deleting a missing object succeeds (S3 delete is idempotent), so a
    /// record pointing at an already-gone blob never wedges its caller.
    /// Transport-level failures do propagate.
    #[instrument(skip(self))]
    async fn delete_url(&self, url: &str) -> Result<bool> {
        if url.is_empty() {
            warn!("Skipping blob delete for empty URL");
            return Ok(false);
        }

        let key = self.key_from_url(url)?;
        debug!(bucket = %self.bucket, %key, "Deleting blob");

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .with_context(|| format!("Failed to delete s3://{}/{}", self.bucket, key))?;

        info!(bucket = %self.bucket, %key, "Blob deleted");

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::config::StorageConfig;

    fn minio_storage() -> Storage {
        Storage::new(StorageConfig::for_minio("http://localhost:9000", "folio-media"))
    }

    #[test]
    fn test_object_key() {
        assert_eq!(
            Storage::object_key(COVERS_NAMESPACE, "the-great-gatsby", "png"),
            "covers/the-great-gatsby.png"
        );
    }

    #[test]
    fn test_public_url_roundtrip_path_style() {
        let storage = minio_storage();
        let url = storage.public_url("avatar/jane-austen.jpg");
        assert_eq!(url, "http://localhost:9000/folio-media/avatar/jane-austen.jpg");
        assert_eq!(storage.key_from_url(&url).unwrap(), "avatar/jane-austen.jpg");
    }

    #[test]
    fn test_public_url_roundtrip_virtual_hosted() {
        let storage = Storage::new(StorageConfig {
            endpoint: None,
            region: "eu-west-1".to_string(),
            bucket: "folio-media".to_string(),
            access_key: "k".to_string(),
            secret_key: "s".to_string(),
            path_style: false,
        });

        let url = storage.public_url("books/dune.pdf");
        assert_eq!(url, "https://folio-media.s3.eu-west-1.amazonaws.com/books/dune.pdf");
        assert_eq!(storage.key_from_url(&url).unwrap(), "books/dune.pdf");
    }

    #[test]
    fn test_key_from_url_rejects_garbage() {
        let storage = minio_storage();
        assert!(storage.key_from_url("not a url").is_err());
        assert!(storage.key_from_url("http://localhost:9000/").is_err());
    }
}
