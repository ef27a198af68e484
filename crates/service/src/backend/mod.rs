//! Backend client factory.
//!
//! One handle per backend kind per factory, built on first request and shared
//! afterwards. Services receive handles (or repositories wrapping them) through
//! their constructors; `ClientFactory::global()` exists for callers that have
//! no injection point.

pub mod document;
pub mod relational;
pub mod storage;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use configs::{AnalyticsConfig, AppConfig, DatabaseConfig, DocumentStoreConfig, StorageConfig};
use once_cell::sync::{Lazy, OnceCell};
use thiserror::Error;
use tracing::{debug, info};

pub use document::DocumentClient;
pub use relational::RelationalClient;
pub use storage::StorageClient;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("decode error: {0}")]
    Decode(String),
    #[error("database error: {0}")]
    Db(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Document store with the `cats` and `vets` collections.
    Document,
    /// Relational store (`profiles`) plus object storage (`avatars`).
    Relational,
}

#[derive(Clone)]
pub enum BackendHandle {
    Document(Arc<DocumentClient>),
    Relational(Arc<RelationalClient>),
}

impl BackendHandle {
    pub fn kind(&self) -> BackendKind {
        match self {
            BackendHandle::Document(_) => BackendKind::Document,
            BackendHandle::Relational(_) => BackendKind::Relational,
        }
    }

    /// Whether both handles point at the same underlying client.
    pub fn same_instance(&self, other: &BackendHandle) -> bool {
        match (self, other) {
            (BackendHandle::Document(a), BackendHandle::Document(b)) => Arc::ptr_eq(a, b),
            (BackendHandle::Relational(a), BackendHandle::Relational(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Where the process runs. Telemetry is only ever started in a browser-like
/// context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionContext {
    Browser,
    Server,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsHandle {
    pub measurement_id: String,
}

/// Backend slice of [`AppConfig`].
#[derive(Debug, Clone, Default)]
pub struct BackendsConfig {
    pub document_store: DocumentStoreConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub analytics: AnalyticsConfig,
}

impl From<&AppConfig> for BackendsConfig {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            document_store: cfg.document_store.clone(),
            database: cfg.database.clone(),
            storage: cfg.storage.clone(),
            analytics: cfg.analytics.clone(),
        }
    }
}

pub struct ClientFactory {
    config: BackendsConfig,
    context: ExecutionContext,
    document: OnceCell<Arc<DocumentClient>>,
    relational: tokio::sync::OnceCell<Arc<RelationalClient>>,
    analytics: OnceCell<Option<Arc<AnalyticsHandle>>>,
    builds: AtomicUsize,
}

static GLOBAL: Lazy<ClientFactory> = Lazy::new(|| {
    let cfg = AppConfig::from_env();
    ClientFactory::new(BackendsConfig::from(&cfg), ExecutionContext::Server)
});

impl ClientFactory {
    pub fn new(config: BackendsConfig, context: ExecutionContext) -> Self {
        Self {
            config,
            context,
            document: OnceCell::new(),
            relational: tokio::sync::OnceCell::new(),
            analytics: OnceCell::new(),
            builds: AtomicUsize::new(0),
        }
    }

    /// Process-wide factory configured from the environment.
    pub fn global() -> &'static ClientFactory {
        &GLOBAL
    }

    pub fn config(&self) -> &BackendsConfig {
        &self.config
    }

    /// Number of backend handles this factory has constructed so far.
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    /// Cached handle for `kind`, constructed on the first call only.
    ///
    /// # Examples
    /// ```
    /// use service::backend::{BackendKind, BackendsConfig, ClientFactory, ExecutionContext};
    /// let mut cfg = configs::AppConfig::default();
    /// cfg.normalize_from_env();
    /// let factory = ClientFactory::new(BackendsConfig::from(&cfg), ExecutionContext::Server);
    /// let a = tokio_test::block_on(factory.get_client(BackendKind::Document)).unwrap();
    /// let b = tokio_test::block_on(factory.get_client(BackendKind::Document)).unwrap();
    /// assert!(a.same_instance(&b));
    /// assert_eq!(factory.builds(), 1);
    /// ```
    pub async fn get_client(&self, kind: BackendKind) -> Result<BackendHandle, BackendError> {
        match kind {
            BackendKind::Document => self.document().map(BackendHandle::Document),
            BackendKind::Relational => self.relational().await.map(BackendHandle::Relational),
        }
    }

    pub fn document(&self) -> Result<Arc<DocumentClient>, BackendError> {
        self.document
            .get_or_try_init(|| {
                let client = DocumentClient::new(&self.config.document_store)?;
                self.builds.fetch_add(1, Ordering::SeqCst);
                info!(project = %self.config.document_store.project_id, "document_store_client_built");
                Ok(Arc::new(client))
            })
            .map(Arc::clone)
    }

    pub async fn relational(&self) -> Result<Arc<RelationalClient>, BackendError> {
        self.relational
            .get_or_try_init(|| async {
                let client = RelationalClient::connect(&self.config.database, &self.config.storage).await?;
                self.builds.fetch_add(1, Ordering::SeqCst);
                info!(storage = %self.config.storage.url, "relational_client_built");
                Ok(Arc::new(client))
            })
            .await
            .map(Arc::clone)
    }

    /// Analytics handle, present only in a browser context with a
    /// measurement id configured. Never fails.
    pub fn analytics(&self) -> Option<Arc<AnalyticsHandle>> {
        self.analytics
            .get_or_init(|| {
                let id = self
                    .config
                    .analytics
                    .measurement_id
                    .as_deref()
                    .map(str::trim)
                    .filter(|id| !id.is_empty())?;
                match self.context {
                    ExecutionContext::Browser => Some(Arc::new(AnalyticsHandle { measurement_id: id.to_string() })),
                    ExecutionContext::Server => {
                        debug!("analytics not started outside a browser context");
                        None
                    }
                }
            })
            .clone()
    }
}
