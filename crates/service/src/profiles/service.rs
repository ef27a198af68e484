use std::path::Path;
use std::sync::Arc;

use models::profile::{Profile, ProfileUpdate};
use tracing::{error, info, instrument, warn};

use crate::errors::ServiceError;
use crate::profiles::repository::{AssetStore, ProfileRepository};

/// Binary file supplied by a caller for upload.
#[derive(Debug, Clone)]
pub struct AssetUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Object name `<random fraction>.<ext>`; the extension comes from the
/// original file name and is omitted when it has none.
pub fn randomized_object_name(file_name: &str) -> String {
    let suffix: f64 = rand::random();
    match Path::new(file_name).extension().and_then(|e| e.to_str()).filter(|e| !e.is_empty()) {
        Some(ext) => format!("{suffix}.{ext}"),
        None => suffix.to_string(),
    }
}

/// Profile reads absorb failures; writes and uploads propagate them.
pub struct ProfileService<R: ProfileRepository + ?Sized, A: AssetStore + ?Sized> {
    repo: Arc<R>,
    assets: Arc<A>,
}

impl<R: ProfileRepository + ?Sized, A: AssetStore + ?Sized> ProfileService<R, A> {
    pub fn new(repo: Arc<R>, assets: Arc<A>) -> Self {
        Self { repo, assets }
    }

    #[instrument(skip(self))]
    pub async fn get_profile(&self, id: &str) -> Option<Profile> {
        match self.repo.get(id).await {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, "profile read failed");
                None
            }
        }
    }

    /// Merge `patch` into the stored profile and return the result.
    ///
    /// # Examples
    /// ```
    /// use service::profiles::{ProfileService, repository::mock::{MockProfileRepository, MockAssetStore}};
    /// use models::profile::{Profile, ProfileUpdate, Role};
    /// use std::sync::Arc;
    /// let p = Profile { id: "u1".into(), full_name: None, avatar_url: None, phone: None, role: Role::User, updated_at: None };
    /// let svc = ProfileService::new(Arc::new(MockProfileRepository::with_profiles(vec![p])), Arc::new(MockAssetStore::default()));
    /// let patch = ProfileUpdate { full_name: Some("Ploy".into()), ..Default::default() };
    /// let updated = tokio_test::block_on(svc.update_profile("u1", patch)).unwrap();
    /// assert_eq!(updated.full_name.as_deref(), Some("Ploy"));
    /// ```
    #[instrument(skip(self, patch))]
    pub async fn update_profile(&self, id: &str, patch: ProfileUpdate) -> Result<Profile, ServiceError> {
        if let Some(name) = &patch.full_name {
            if name.trim().is_empty() {
                return Err(ServiceError::Validation("full_name must not be blank".into()));
            }
        }
        match self.repo.update(id, &patch).await {
            Ok(Some(profile)) => {
                info!(profile_id = %profile.id, "profile_updated");
                Ok(profile)
            }
            Ok(None) => Err(ServiceError::not_found("profile")),
            Err(e) => {
                error!(error = %e, "profile update failed");
                Err(e)
            }
        }
    }

    /// Store an avatar under a randomized name and return its public URL.
    #[instrument(skip(self, upload), fields(file_name = %upload.file_name, size = upload.bytes.len()))]
    pub async fn upload_avatar(&self, upload: AssetUpload) -> Result<String, ServiceError> {
        if upload.bytes.is_empty() {
            return Err(ServiceError::Validation("empty upload".into()));
        }
        let object = randomized_object_name(&upload.file_name);
        let content_type = upload.content_type.as_deref().unwrap_or("application/octet-stream");
        match self.assets.put(&object, upload.bytes, content_type).await {
            Ok(url) => {
                info!(%object, "avatar_uploaded");
                Ok(url)
            }
            Err(e) => {
                error!(error = %e, %object, "avatar upload failed");
                Err(e)
            }
        }
    }

    /// Upload a new avatar for an existing profile and point `avatar_url`
    /// at it. Nothing is stored when the profile is missing or unreadable.
    #[instrument(skip(self, upload), fields(file_name = %upload.file_name))]
    pub async fn set_avatar(&self, id: &str, upload: AssetUpload) -> Result<Profile, ServiceError> {
        if upload.bytes.is_empty() {
            return Err(ServiceError::Validation("empty upload".into()));
        }
        match self.repo.get(id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Err(ServiceError::not_found("profile")),
            Err(e) => {
                error!(error = %e, "profile lookup before avatar upload failed");
                return Err(e);
            }
        }
        let url = self.upload_avatar(upload).await?;
        let patch = ProfileUpdate { avatar_url: Some(url), ..Default::default() };
        self.update_profile(id, patch).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::repository::mock::{MockAssetStore, MockProfileRepository};
    use models::profile::Role;

    fn profile(id: &str) -> Profile {
        Profile { id: id.into(), full_name: Some("Ann".into()), avatar_url: None, phone: None, role: Role::User, updated_at: None }
    }

    type MockService = ProfileService<MockProfileRepository, MockAssetStore>;

    fn service() -> (Arc<MockProfileRepository>, Arc<MockAssetStore>, MockService) {
        let repo = Arc::new(MockProfileRepository::with_profiles(vec![profile("u1")]));
        let assets = Arc::new(MockAssetStore::default());
        let svc = ProfileService::new(repo.clone(), assets.clone());
        (repo, assets, svc)
    }

    fn png() -> AssetUpload {
        AssetUpload { file_name: "me.png".into(), content_type: Some("image/png".into()), bytes: vec![0x89, 0x50] }
    }

    #[tokio::test]
    async fn update_merges_partial_fields() {
        let (_, _, svc) = service();
        let patch = ProfileUpdate { phone: Some("080".into()), role: Some(Role::Admin), ..Default::default() };
        let updated = svc.update_profile("u1", patch).await.unwrap();
        assert_eq!(updated.full_name.as_deref(), Some("Ann"));
        assert_eq!(updated.phone.as_deref(), Some("080"));
        assert_eq!(updated.role, Role::Admin);
        assert_eq!(svc.get_profile("u1").await.unwrap().phone.as_deref(), Some("080"));
    }

    #[tokio::test]
    async fn update_failure_propagates() {
        let (repo, _, svc) = service();
        repo.set_failing(true);
        let res = svc.update_profile("u1", ProfileUpdate { phone: Some("1".into()), ..Default::default() }).await;
        assert!(matches!(res, Err(ServiceError::Backend(_))));
    }

    #[tokio::test]
    async fn update_unknown_profile_is_not_found() {
        let (_, _, svc) = service();
        let res = svc.update_profile("nobody", ProfileUpdate::default()).await;
        assert!(matches!(res, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn blank_name_is_rejected_before_the_backend() {
        let (repo, _, svc) = service();
        repo.set_failing(true);
        let res = svc.update_profile("u1", ProfileUpdate { full_name: Some("  ".into()), ..Default::default() }).await;
        assert!(matches!(res, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn read_failure_is_absorbed() {
        let (repo, _, svc) = service();
        repo.set_failing(true);
        assert!(svc.get_profile("u1").await.is_none());
    }

    #[tokio::test]
    async fn upload_uses_randomized_name_and_returns_url() {
        let (_, assets, svc) = service();
        let url = svc.upload_avatar(png()).await.unwrap();
        let names = assets.object_names();
        assert_eq!(names.len(), 1);
        assert!(names[0].ends_with(".png"));
        assert!(names[0].starts_with("0."));
        assert_eq!(url, format!("mock://avatars/{}", names[0]));
        assert_eq!(assets.content_type(&names[0]).as_deref(), Some("image/png"));
    }

    #[tokio::test]
    async fn upload_failure_propagates() {
        let (_, assets, svc) = service();
        assets.set_failing(true);
        assert!(svc.upload_avatar(png()).await.is_err());
    }

    #[tokio::test]
    async fn avatar_for_existing_profile_updates_url() {
        let (_, assets, svc) = service();
        let updated = svc.set_avatar("u1", png()).await.unwrap();
        let names = assets.object_names();
        assert_eq!(updated.avatar_url, Some(format!("mock://avatars/{}", names[0])));
    }

    #[tokio::test]
    async fn avatar_for_unknown_profile_stores_nothing() {
        let (_, assets, svc) = service();
        let res = svc.set_avatar("nobody", png()).await;
        assert!(matches!(res, Err(ServiceError::NotFound(_))));
        assert!(assets.object_names().is_empty());
    }

    #[tokio::test]
    async fn avatar_lookup_failure_stores_nothing() {
        let (repo, assets, svc) = service();
        repo.set_failing(true);
        assert!(svc.set_avatar("u1", png()).await.is_err());
        assert!(assets.object_names().is_empty());
    }

    #[test]
    fn object_names_differ_and_keep_extension() {
        let a = randomized_object_name("cat.photo.jpeg");
        let b = randomized_object_name("cat.photo.jpeg");
        assert!(a.ends_with(".jpeg"));
        assert_ne!(a, b);
        let bare = randomized_object_name("README");
        assert!(bare.parse::<f64>().is_ok());
    }
}
