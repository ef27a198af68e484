use std::sync::Arc;

use async_trait::async_trait;
use models::cat::Cat;
use tracing::warn;

use crate::adapters::cat_from_document;
use crate::backend::document::{DocumentClient, CATS_COLLECTION};
use crate::errors::ServiceError;

#[async_trait]
pub trait CatRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Cat>, ServiceError>;
}

/// Document-store repository; documents that fail to decode are skipped.
pub struct DocumentCatRepository {
    pub client: Arc<DocumentClient>,
}

#[async_trait]
impl CatRepository for DocumentCatRepository {
    async fn list(&self) -> Result<Vec<Cat>, ServiceError> {
        let docs = self.client.list_documents(CATS_COLLECTION).await?;
        Ok(docs
            .iter()
            .filter_map(|doc| match cat_from_document(doc) {
                Ok(cat) => Some(cat),
                Err(e) => {
                    warn!(doc_id = %doc.id(), error = %e, "skipping malformed cat document");
                    None
                }
            })
            .collect())
    }
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Mutex, PoisonError};

    use crate::backend::BackendError;

    #[derive(Default)]
    pub struct MockCatRepository {
        cats: Mutex<Vec<Cat>>,
        failing: AtomicBool,
        calls: AtomicUsize,
    }

    impl MockCatRepository {
        pub fn with_cats(cats: Vec<Cat>) -> Self {
            Self { cats: Mutex::new(cats), ..Default::default() }
        }

        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CatRepository for MockCatRepository {
        async fn list(&self) -> Result<Vec<Cat>, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(BackendError::Status { status: 503, body: "unavailable".into() }.into());
            }
            Ok(self.cats.lock().unwrap_or_else(PoisonError::into_inner).clone())
        }
    }
}
