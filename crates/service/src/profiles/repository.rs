use std::sync::Arc;

use async_trait::async_trait;
use models::profile::{self, Profile, ProfileUpdate};

use crate::backend::{BackendError, RelationalClient};
use crate::errors::ServiceError;

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<Profile>, ServiceError>;
    /// `Ok(None)` when no profile has this id.
    async fn update(&self, id: &str, patch: &ProfileUpdate) -> Result<Option<Profile>, ServiceError>;
}

/// Binary object store returning a public reference for each stored object.
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn put(&self, object: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, ServiceError>;
}

pub struct SeaOrmProfileRepository {
    pub client: Arc<RelationalClient>,
}

#[async_trait]
impl ProfileRepository for SeaOrmProfileRepository {
    async fn get(&self, id: &str) -> Result<Option<Profile>, ServiceError> {
        let uuid = profile::parse_id(id)?;
        let found = profile::find(&self.client.db, uuid).await?;
        Ok(found.map(Profile::try_from).transpose()?)
    }

    async fn update(&self, id: &str, patch: &ProfileUpdate) -> Result<Option<Profile>, ServiceError> {
        let uuid = profile::parse_id(id)?;
        let saved = profile::update(&self.client.db, uuid, patch).await?;
        Ok(saved.map(Profile::try_from).transpose()?)
    }
}

/// Avatar bucket on the relational backend's object storage.
pub struct BucketAssetStore {
    pub client: Arc<RelationalClient>,
    pub bucket: String,
}

#[async_trait]
impl AssetStore for BucketAssetStore {
    async fn put(&self, object: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, ServiceError> {
        self.client.storage.upload(&self.bucket, object, bytes, content_type).await?;
        Ok(self.client.storage.public_url(&self.bucket, object))
    }
}

/// Simple in-memory mocks for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Mutex, PoisonError};

    #[derive(Default)]
    pub struct MockProfileRepository {
        profiles: Mutex<HashMap<String, Profile>>,
        failing: AtomicBool,
    }

    impl MockProfileRepository {
        pub fn with_profiles(profiles: Vec<Profile>) -> Self {
            let map = profiles.into_iter().map(|p| (p.id.clone(), p)).collect();
            Self { profiles: Mutex::new(map), ..Default::default() }
        }

        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        fn check(&self) -> Result<(), ServiceError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(BackendError::Db("permission denied for table profiles".into()).into());
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ProfileRepository for MockProfileRepository {
        async fn get(&self, id: &str) -> Result<Option<Profile>, ServiceError> {
            self.check()?;
            Ok(self.profiles.lock().unwrap_or_else(PoisonError::into_inner).get(id).cloned())
        }

        async fn update(&self, id: &str, patch: &ProfileUpdate) -> Result<Option<Profile>, ServiceError> {
            self.check()?;
            let mut profiles = self.profiles.lock().unwrap_or_else(PoisonError::into_inner);
            Ok(profiles.get_mut(id).map(|p| {
                patch.apply_to(p);
                p.clone()
            }))
        }
    }

    #[derive(Default)]
    pub struct MockAssetStore {
        objects: Mutex<HashMap<String, (Vec<u8>, String)>>,
        failing: AtomicBool,
    }

    impl MockAssetStore {
        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        pub fn object_names(&self) -> Vec<String> {
            self.objects.lock().unwrap_or_else(PoisonError::into_inner).keys().cloned().collect()
        }

        pub fn content_type(&self, object: &str) -> Option<String> {
            self.objects.lock().unwrap_or_else(PoisonError::into_inner).get(object).map(|(_, ct)| ct.clone())
        }
    }

    #[async_trait]
    impl AssetStore for MockAssetStore {
        async fn put(&self, object: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, ServiceError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(BackendError::Status { status: 413, body: "Payload too large".into() }.into());
            }
            self.objects
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(object.to_string(), (bytes, content_type.to_string()));
            Ok(format!("mock://avatars/{object}"))
        }
    }
}
