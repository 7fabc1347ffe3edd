use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;
use crate::rules::domain::model::CirculationRuleEntity;
use crate::rules::repository::RuleRepository;
use crate::utils::ddb::{DDBTable, RULES_TABLE};

#[derive(Debug)]
pub(crate) struct DDBRuleRepository {
    table: DDBTable,
}

impl DDBRuleRepository {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            table: DDBTable::new(client, RULES_TABLE),
        }
    }
}

#[async_trait]
impl Repository<CirculationRuleEntity> for DDBRuleRepository {
    async fn create(&self, entity: &CirculationRuleEntity) -> LibraryResult<usize> {
        self.table.put_new(entity).await
    }

    async fn update(&self, entity: &CirculationRuleEntity) -> LibraryResult<usize> {
        self.table.put_versioned(entity).await
    }

    async fn get(&self, id: &str) -> LibraryResult<CirculationRuleEntity> {
        self.table.get(id).await
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        self.table.delete(id).await
    }
}

#[async_trait]
impl RuleRepository for DDBRuleRepository {
    // the rule table is small, a consistent scan is the whole snapshot
    async fn find_all(&self) -> LibraryResult<Vec<CirculationRuleEntity>> {
        self.table.scan(None, &[], &[]).await
    }
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use aws_sdk_dynamodb::Client;
    use lazy_static::lazy_static;
    use rust_decimal::Decimal;
    use crate::core::library::PatronGroup;
    use crate::core::repository::{Repository, RepositoryStore};
    use crate::rules::domain::model::CirculationRuleEntity;
    use crate::rules::repository::ddb_rule_repository::DDBRuleRepository;
    use crate::rules::repository::RuleRepository;
    use crate::utils::ddb::{build_db_client, create_table, delete_table, RULES_TABLE};

    lazy_static! {
        static ref CLIENT: AsyncOnce<Client> = AsyncOnce::new(async {
                let client = build_db_client(&RepositoryStore::LocalDynamoDB).await;
                let _ = delete_table(&client, RULES_TABLE.name).await;
                let _ = create_table(&client, &RULES_TABLE).await;
                client
            });
    }

    #[tokio::test]
    #[ignore = "needs DynamoDB Local on localhost:8000"]
    async fn test_should_create_find_rules() {
        let rule_repo = DDBRuleRepository::new(CLIENT.get().await.clone());
        let rule = CirculationRuleEntity::new(PatronGroup::Student, "REGULAR", 14, 5, Decimal::new(50, 2));
        rule_repo.create(&rule).await.expect("should create rule");
        let loaded = rule_repo.get("STUDENT#REGULAR").await.expect("should get rule");
        assert_eq!(Decimal::new(50, 2), loaded.fine_per_day);
        assert!(rule_repo.find_all().await.expect("should scan").iter().any(|r| r.rule_id == rule.rule_id));
    }
}
