use std::sync::Arc;
use async_trait::async_trait;
use tracing::info;
use crate::core::library::{LibraryError, LibraryResult, PatronGroup};
use crate::patrons::domain::model::PatronEntity;
use crate::patrons::domain::PatronService;
use crate::patrons::dto::PatronDto;
use crate::patrons::repository::PatronRepository;
use crate::utils::date::Clock;

pub(crate) struct PatronServiceImpl {
    patron_repository: Arc<dyn PatronRepository>,
    clock: Arc<dyn Clock>,
}

impl PatronServiceImpl {
    pub(crate) fn new(patron_repository: Arc<dyn PatronRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            patron_repository,
            clock,
        }
    }
}

#[async_trait]
impl PatronService for PatronServiceImpl {
    async fn add_patron(&self, patron_id: &str, full_name: &str, group: PatronGroup) -> LibraryResult<PatronDto> {
        if patron_id.trim().is_empty() {
            return Err(LibraryError::validation("patron id is required", Some("400".to_string())));
        }
        let patron = PatronEntity::new(patron_id.trim(), full_name, group, self.clock.now());
        self.patron_repository.create(&patron).await?;
        info!(patron_id = patron.patron_id.as_str(), group = %group, "added patron");
        Ok(PatronDto::from(&patron))
    }

    async fn update_patron(&self, patron: &PatronDto) -> LibraryResult<PatronDto> {
        let mut existing = self.patron_repository.get(patron.patron_id.as_str()).await?;
        if existing.version != patron.version {
            return Err(LibraryError::conflict(
                format!("patron {} version {} is stale", patron.patron_id, patron.version).as_str(), None));
        }
        existing.full_name = patron.full_name.to_string();
        existing.patron_group = patron.patron_group;
        existing.blocked = patron.blocked;
        existing.updated_at = self.clock.now();
        self.patron_repository.update(&existing).await?;
        let updated = self.patron_repository.get(patron.patron_id.as_str()).await?;
        Ok(PatronDto::from(&updated))
    }

    async fn find_patron_by_id(&self, id: &str) -> LibraryResult<PatronDto> {
        let patron = self.patron_repository.get(id).await?;
        Ok(PatronDto::from(&patron))
    }

    async fn find_patrons_by_group(&self, group: PatronGroup) -> LibraryResult<Vec<PatronDto>> {
        let patrons = self.patron_repository.find_by_group(group).await?;
        Ok(patrons.iter().map(PatronDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::core::library::{LibraryError, PatronGroup};
    use crate::patrons::domain::PatronService;
    use crate::utils::testing::TestContext;

    #[tokio::test]
    async fn test_should_add_find_update_patron() {
        let ctx = TestContext::new().await;
        let patron_svc = ctx.state.patrons.clone();
        let added = patron_svc.add_patron("ST-2024-001", "John Doe", PatronGroup::Student).await.expect("should add patron");
        assert!(matches!(patron_svc.add_patron("ST-2024-001", "John Doe", PatronGroup::Student).await,
            Err(LibraryError::DuplicateKey { .. })));

        let mut loaded = patron_svc.find_patron_by_id("ST-2024-001").await.expect("should find patron");
        assert_eq!(added, loaded);
        loaded.blocked = true;
        loaded.patron_group = PatronGroup::Teacher;
        let updated = patron_svc.update_patron(&loaded).await.expect("should update patron");
        assert!(updated.blocked);
        assert_eq!(1, updated.version);
        assert!(patron_svc.update_patron(&loaded).await.expect_err("should be stale").is_conflict());

        let teachers = patron_svc.find_patrons_by_group(PatronGroup::Teacher).await.expect("should find");
        assert_eq!(1, teachers.len());
    }

    #[tokio::test]
    async fn test_should_reject_blank_patron_id() {
        let ctx = TestContext::new().await;
        assert!(matches!(ctx.state.patrons.add_patron(" ", "Nobody", PatronGroup::Student).await,
            Err(LibraryError::Validation { .. })));
        assert!(matches!(ctx.state.patrons.find_patron_by_id("missing").await,
            Err(LibraryError::NotFound { .. })));
    }
}
