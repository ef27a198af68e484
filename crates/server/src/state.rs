use std::sync::Arc;

use configs::AppConfig;
use service::backend::ClientFactory;
use service::cats::repository::{CatRepository, DocumentCatRepository};
use service::cats::CatService;
use service::contact::ContactRelay;
use service::fallback::FallbackPolicy;
use service::profiles::repository::{AssetStore, BucketAssetStore, ProfileRepository, SeaOrmProfileRepository};
use service::profiles::ProfileService;
use service::vets::repository::{DocumentVetRepository, VetRepository};
use service::vets::VetService;

use crate::errors::StartupError;

#[derive(Clone)]
pub struct AppState {
    pub cats: Arc<CatService<dyn CatRepository>>,
    pub vets: Arc<VetService<dyn VetRepository>>,
    pub profiles: Arc<ProfileService<dyn ProfileRepository, dyn AssetStore>>,
    pub relay: Arc<ContactRelay>,
    pub site_base_url: String,
}

impl AppState {
    /// Wire repositories to the factory's backend handles.
    pub async fn from_factory(cfg: &AppConfig, factory: &ClientFactory) -> Result<Self, StartupError> {
        let document = factory.document()?;
        let relational = factory.relational().await?;

        let cat_repo: Arc<dyn CatRepository> = Arc::new(DocumentCatRepository { client: Arc::clone(&document) });
        let vet_repo: Arc<dyn VetRepository> = Arc::new(DocumentVetRepository { client: document });
        let profile_repo: Arc<dyn ProfileRepository> = Arc::new(SeaOrmProfileRepository { client: Arc::clone(&relational) });
        let assets: Arc<dyn AssetStore> = Arc::new(BucketAssetStore {
            client: relational,
            bucket: cfg.storage.avatar_bucket.clone(),
        });
        let relay = ContactRelay::new(&cfg.relay).map_err(|e| StartupError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            cats: Arc::new(CatService::new(cat_repo)),
            vets: Arc::new(VetService::new(vet_repo, FallbackPolicy::new(cfg.fallback.vets))),
            profiles: Arc::new(ProfileService::new(profile_repo, assets)),
            relay: Arc::new(relay),
            site_base_url: cfg.site.base_url.clone(),
        })
    }
}
