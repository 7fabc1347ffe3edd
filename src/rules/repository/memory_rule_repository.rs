use async_trait::async_trait;
use crate::core::library::LibraryResult;
use crate::rules::domain::model::CirculationRuleEntity;
use crate::rules::repository::RuleRepository;
use crate::utils::memory::MemoryRepository;

#[async_trait]
impl RuleRepository for MemoryRepository<CirculationRuleEntity> {
    async fn find_all(&self) -> LibraryResult<Vec<CirculationRuleEntity>> {
        let tables = self.db().read().await;
        Ok(tables.rules.values().cloned().collect())
    }
}
