use std::sync::Arc;

use models::cat::{Cat, CatStatus};
use tracing::{debug, instrument};

use crate::cats::repository::CatRepository;
use crate::fallback::FallbackPolicy;

/// Read façade for adoptable cats. Cats have no bundled dataset, so a failed
/// read yields an empty list.
pub struct CatService<R: CatRepository + ?Sized> {
    repo: Arc<R>,
    policy: FallbackPolicy,
}

impl<R: CatRepository + ?Sized> CatService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo, policy: FallbackPolicy::never() }
    }

    /// All cats in backend order. Never fails.
    ///
    /// # Examples
    /// ```
    /// use service::cats::{CatService, repository::mock::MockCatRepository};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockCatRepository::default());
    /// repo.set_failing(true);
    /// let svc = CatService::new(repo);
    /// assert!(tokio_test::block_on(svc.get_all()).is_empty());
    /// ```
    #[instrument(skip(self))]
    pub async fn get_all(&self) -> Vec<Cat> {
        let resolved = self.policy.resolve("cats", self.repo.list().await, Vec::new);
        debug!(count = resolved.items.len(), "cats_loaded");
        resolved.items
    }

    pub async fn get_by_id(&self, id: &str) -> Option<Cat> {
        self.get_all().await.into_iter().find(|c| c.id == id)
    }

    pub async fn get_by_status(&self, status: CatStatus) -> Vec<Cat> {
        self.get_all().await.into_iter().filter(|c| c.status == status).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cats::repository::mock::MockCatRepository;
    use indexmap::IndexMap;
    use models::cat::Gender;

    fn cat(id: &str, status: CatStatus) -> Cat {
        Cat {
            id: id.into(),
            name: format!("cat-{id}"),
            age_months: 6,
            gender: Gender::Male,
            breed: None,
            location: "Shelter".into(),
            images: vec![],
            description: String::new(),
            attributes: IndexMap::new(),
            status,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn filters_by_id_and_status() {
        let repo = Arc::new(MockCatRepository::with_cats(vec![
            cat("a", CatStatus::Available),
            cat("b", CatStatus::Adopted),
            cat("c", CatStatus::Available),
        ]));
        let svc = CatService::new(repo.clone());

        assert_eq!(svc.get_by_id("b").await.map(|c| c.status), Some(CatStatus::Adopted));
        assert!(svc.get_by_id("zzz").await.is_none());
        let ids: Vec<_> = svc.get_by_status(CatStatus::Available).await.into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(repo.calls(), 3);
    }

    #[tokio::test]
    async fn backend_failure_reads_as_empty() {
        let repo = Arc::new(MockCatRepository::with_cats(vec![cat("a", CatStatus::Available)]));
        repo.set_failing(true);
        let svc = CatService::new(repo);
        assert!(svc.get_all().await.is_empty());
        assert!(svc.get_by_id("a").await.is_none());
    }
}
