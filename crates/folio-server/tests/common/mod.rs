//! Shared utilities for integration tests
//!
//! `TestPostgres` runs a disposable PostgreSQL container with migrations
//! applied. `RecordingStore` is an in-memory blob store that records every
//! operation and can be told to fail, which makes upload ordering and
//! compensating deletes observable from tests.

use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use testcontainers::{core::IntoContainerPort, runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::postgres::Postgres;

use folio_server::storage::BlobStore;

// ============================================================================
// PostgreSQL Test Container
// ============================================================================

/// PostgreSQL container with migrations pre-applied.
pub struct TestPostgres {
    _container: ContainerAsync<Postgres>,
    pool: PgPool,
}

impl TestPostgres {
    pub async fn start() -> Result<Self> {
        let container = Postgres::default()
            .start()
            .await
            .context("Failed to start PostgreSQL container")?;

        let host = container
            .get_host()
            .await
            .context("Failed to get container host")?;
        let port = container
            .get_host_port_ipv4(5432.tcp())
            .await
            .context("Failed to get container port")?;

        let connection_string =
            format!("postgresql://postgres:postgres@{}:{}/postgres", host, port);

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&connection_string)
            .await
            .context("Failed to connect to PostgreSQL")?;

        sqlx::migrate!("../../migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            _container: container,
            pool,
        })
    }

    /// Get a clone of the database pool.
    pub fn pool(&self) -> PgPool {
        self.pool.clone()
    }
}

// ============================================================================
// Recording Blob Store
// ============================================================================

/// A single operation the store was asked to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobOp {
    Stored { key: String },
    Deleted { url: String },
}

/// In-memory [`BlobStore`] that records operations in call order.
///
/// Stores are only recorded when they succeed; delete attempts are always
/// recorded, even when configured to fail, mirroring how a flaky backend
/// still receives the request.
#[derive(Default)]
pub struct RecordingStore {
    ops: Mutex<Vec<BlobOp>>,
    fail_store_prefix: Option<String>,
    fail_deletes: bool,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every store whose key starts with `prefix`.
    pub fn failing_store_for(prefix: &str) -> Self {
        Self {
            fail_store_prefix: Some(prefix.to_string()),
            ..Self::default()
        }
    }

    /// Fail every delete while still recording the attempt.
    pub fn with_failing_deletes() -> Self {
        Self {
            fail_deletes: true,
            ..Self::default()
        }
    }

    /// The URL a successful store of `key` returns.
    pub fn url_for(key: &str) -> String {
        format!("http://blobs.local/folio/{}", key)
    }

    pub fn ops(&self) -> Vec<BlobOp> {
        self.ops.lock().unwrap().clone()
    }

    pub fn deleted_urls(&self) -> Vec<String> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                BlobOp::Deleted { url } => Some(url),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl BlobStore for RecordingStore {
    async fn store(
        &self,
        key: &str,
        _data: Vec<u8>,
        _content_type: Option<String>,
    ) -> Result<String> {
        if let Some(ref prefix) = self.fail_store_prefix {
            if key.starts_with(prefix) {
                anyhow::bail!("store rejected for {}", key);
            }
        }
        self.ops.lock().unwrap().push(BlobOp::Stored {
            key: key.to_string(),
        });
        Ok(Self::url_for(key))
    }

    async fn delete_url(&self, url: &str) -> Result<bool> {
        self.ops.lock().unwrap().push(BlobOp::Deleted {
            url: url.to_string(),
        });
        if self.fail_deletes {
            anyhow::bail!("delete rejected for {}", url);
        }
        Ok(true)
    }
}

// ============================================================================
// Utility Functions
// ============================================================================

/// Initialize tracing for tests.
pub fn init_test_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let _ = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("info,folio_server=debug,sqlx=warn,testcontainers=info")
        }))
        .with_test_writer()
        .try_init();
}
