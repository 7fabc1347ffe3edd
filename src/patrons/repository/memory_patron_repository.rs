use async_trait::async_trait;
use crate::core::library::{LibraryResult, PatronGroup};
use crate::patrons::domain::model::PatronEntity;
use crate::patrons::repository::PatronRepository;
use crate::utils::memory::MemoryRepository;

#[async_trait]
impl PatronRepository for MemoryRepository<PatronEntity> {
    async fn find_by_group(&self, group: PatronGroup) -> LibraryResult<Vec<PatronEntity>> {
        let tables = self.db().read().await;
        let mut patrons: Vec<PatronEntity> = tables.patrons.values()
            .filter(|p| p.patron_group == group)
            .cloned()
            .collect();
        patrons.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(patrons)
    }
}
