use std::sync::Arc;
use crate::core::repository::RepositoryStore;
use crate::rules::domain::model::CirculationRuleEntity;
use crate::rules::domain::RuleService;
use crate::rules::domain::service::RuleServiceImpl;
use crate::rules::repository::ddb_rule_repository::DDBRuleRepository;
use crate::rules::repository::RuleRepository;
use crate::utils::ddb::{build_db_client, create_table, RULES_TABLE};
use crate::utils::memory::MemoryRepository;

pub(crate) async fn create_rule_repository(store: &RepositoryStore) -> Arc<dyn RuleRepository> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await;
            Arc::new(DDBRuleRepository::new(client))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await;
            let _ = create_table(&client, &RULES_TABLE).await;
            Arc::new(DDBRuleRepository::new(client))
        }
        RepositoryStore::Memory(db) => {
            Arc::new(MemoryRepository::<CirculationRuleEntity>::new(db.clone()))
        }
    }
}

pub(crate) async fn create_rule_service(store: &RepositoryStore) -> Arc<dyn RuleService> {
    let rule_repo = create_rule_repository(store).await;
    Arc::new(RuleServiceImpl::new(rule_repo))
}
