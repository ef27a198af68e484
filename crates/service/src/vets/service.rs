use std::sync::Arc;

use models::vet::VetClinic;
use tracing::{debug, instrument};

use crate::fallback::{FallbackPolicy, Origin, Resolved};
use crate::vets::bundled::{self, StaticVet, STATIC_VETS};
use crate::vets::repository::VetRepository;

/// Read façade for clinics with bundled-data fallback.
pub struct VetService<R: VetRepository + ?Sized> {
    repo: Arc<R>,
    policy: FallbackPolicy,
    dataset: &'static [StaticVet],
}

impl<R: VetRepository + ?Sized> VetService<R> {
    pub fn new(repo: Arc<R>, policy: FallbackPolicy) -> Self {
        Self::with_dataset(repo, policy, STATIC_VETS)
    }

    pub fn with_dataset(repo: Arc<R>, policy: FallbackPolicy, dataset: &'static [StaticVet]) -> Self {
        Self { repo, policy, dataset }
    }

    /// Clinics plus where they came from. One backend round trip at most.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Resolved<VetClinic> {
        let primary = self.repo.list().await;
        let resolved = self.policy.resolve("vets", primary, || bundled::remap(self.dataset));
        debug!(count = resolved.items.len(), fallback = resolved.origin == Origin::Fallback, "vets_loaded");
        resolved
    }

    /// All clinics; bundled data when the policy fires. Never fails.
    ///
    /// # Examples
    /// ```
    /// use service::fallback::FallbackPolicy;
    /// use service::vets::{VetService, repository::mock::MockVetRepository};
    /// use std::sync::Arc;
    /// let svc = VetService::new(Arc::new(MockVetRepository::default()), FallbackPolicy::default());
    /// let vets = tokio_test::block_on(svc.get_all());
    /// assert!(vets.iter().all(|v| v.legacy_id.is_some()));
    /// ```
    pub async fn get_all(&self) -> Vec<VetClinic> {
        self.load().await.items
    }

    /// Clinics in one district, with the origin of the whole set.
    pub async fn load_by_district(&self, district: &str) -> Resolved<VetClinic> {
        let mut resolved = self.load().await;
        resolved.items.retain(|v| v.district == district);
        resolved
    }

    pub async fn get_by_district(&self, district: &str) -> Vec<VetClinic> {
        self.load_by_district(district).await.items
    }

    pub async fn get_by_id(&self, id: &str) -> Option<VetClinic> {
        self.get_all().await.into_iter().find(|v| v.id == id)
    }
}
