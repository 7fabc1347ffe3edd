pub mod ddb_rule_repository;
pub mod memory_rule_repository;

use async_trait::async_trait;
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;
use crate::rules::domain::model::CirculationRuleEntity;

#[async_trait]
pub(crate) trait RuleRepository: Repository<CirculationRuleEntity> {
    async fn find_all(&self) -> LibraryResult<Vec<CirculationRuleEntity>>;
}
