use std::sync::Arc;

use async_trait::async_trait;
use models::vet::VetClinic;
use tracing::warn;

use crate::adapters::vet_from_document;
use crate::backend::document::{DocumentClient, VETS_COLLECTION};
use crate::errors::ServiceError;

#[async_trait]
pub trait VetRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<VetClinic>, ServiceError>;
}

pub struct DocumentVetRepository {
    pub client: Arc<DocumentClient>,
}

#[async_trait]
impl VetRepository for DocumentVetRepository {
    async fn list(&self) -> Result<Vec<VetClinic>, ServiceError> {
        let docs = self.client.list_documents(VETS_COLLECTION).await?;
        Ok(docs
            .iter()
            .filter_map(|doc| match vet_from_document(doc) {
                Ok(vet) => Some(vet),
                Err(e) => {
                    warn!(doc_id = %doc.id(), error = %e, "skipping malformed vet document");
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
    pub struct MockVetRepository {
        vets: Mutex<Vec<VetClinic>>,
        failing: AtomicBool,
        calls: AtomicUsize,
    }

    impl MockVetRepository {
        pub fn with_vets(vets: Vec<VetClinic>) -> Self {
            Self { vets: Mutex::new(vets), ..Default::default() }
        }

        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl VetRepository for MockVetRepository {
        async fn list(&self) -> Result<Vec<VetClinic>, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(BackendError::Decode("connection reset".into()).into());
            }
            Ok(self.vets.lock().unwrap_or_else(PoisonError::into_inner).clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::{FallbackPolicy, Origin};
    use crate::vets::bundled::STATIC_VETS;
    use crate::vets::VetService;
    use configs::DocumentStoreConfig;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn repo_for(server: &MockServer) -> Arc<DocumentVetRepository> {
        let cfg = DocumentStoreConfig {
            base_url: server.uri(),
            project_id: "shelter".into(),
            api_key: "k".into(),
            page_size: 50,
            request_timeout_secs: 5,
        };
        Arc::new(DocumentVetRepository { client: Arc::new(DocumentClient::new(&cfg).unwrap()) })
    }

    #[tokio::test]
    async fn nameless_vet_documents_are_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/shelter/databases/(default)/documents/vets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "documents": [
                    {
                        "name": "projects/shelter/databases/(default)/documents/vets/v1",
                        "fields": {"name": {"stringValue": "Harbor Clinic"}, "district": {"stringValue": "Old Town"}}
                    },
                    {
                        "name": "projects/shelter/databases/(default)/documents/vets/v2",
                        "fields": {"district": {"stringValue": "Old Town"}}
                    }
                ]
            })))
            .mount(&server)
            .await;

        let vets = repo_for(&server).list().await.unwrap();
        assert_eq!(vets.len(), 1);
        assert_eq!(vets[0].id, "v1");
    }

    #[tokio::test]
    async fn unavailable_store_serves_bundled_clinics() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .expect(1)
            .mount(&server)
            .await;

        let svc = VetService::new(repo_for(&server), FallbackPolicy::default());
        let resolved = svc.load().await;
        assert_eq!(resolved.origin, Origin::Fallback);
        assert_eq!(resolved.items.len(), STATIC_VETS.len());
        assert!(resolved.items.iter().all(|v| v.id.starts_with("static-") && v.legacy_id.is_some()));
    }
}
