use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use crate::core::library::{LibraryResult, PatronGroup};
use crate::core::repository::Repository;
use crate::patrons::domain::model::PatronEntity;
use crate::patrons::repository::PatronRepository;
use crate::utils::ddb::{DDBTable, PATRONS_TABLE};

#[derive(Debug)]
pub(crate) struct DDBPatronRepository {
    table: DDBTable,
}

impl DDBPatronRepository {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            table: DDBTable::new(client, PATRONS_TABLE),
        }
    }
}

#[async_trait]
impl Repository<PatronEntity> for DDBPatronRepository {
    async fn create(&self, entity: &PatronEntity) -> LibraryResult<usize> {
        self.table.put_new(entity).await
    }

    async fn update(&self, entity: &PatronEntity) -> LibraryResult<usize> {
        self.table.put_versioned(entity).await
    }

    async fn get(&self, id: &str) -> LibraryResult<PatronEntity> {
        self.table.get(id).await
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        self.table.delete(id).await
    }
}

#[async_trait]
impl PatronRepository for DDBPatronRepository {
    async fn find_by_group(&self, group: PatronGroup) -> LibraryResult<Vec<PatronEntity>> {
        self.table.query_index("patron_group = :patron_group", None, &[],
                               &[(":patron_group", AttributeValue::S(group.to_string()))], true).await
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
    use crate::patrons::domain::model::PatronEntity;
    use crate::patrons::repository::ddb_patron_repository::DDBPatronRepository;
    use crate::patrons::repository::PatronRepository;
    use crate::utils::ddb::{build_db_client, create_table, delete_table, PATRONS_TABLE};
    use crate::utils::date::{Clock, SystemClock};

    lazy_static! {
        static ref CLIENT: AsyncOnce<Client> = AsyncOnce::new(async {
                let client = build_db_client(&RepositoryStore::LocalDynamoDB).await;
                let _ = delete_table(&client, PATRONS_TABLE.name).await;
                let _ = create_table(&client, &PATRONS_TABLE).await;
                client
            });
    }

    #[tokio::test]
    #[ignore = "needs DynamoDB Local on localhost:8000"]
    async fn test_should_create_update_patron() {
        let patron_repo = DDBPatronRepository::new(CLIENT.get().await.clone());
        let patron = PatronEntity::new("DDB-P-1", "Jane Roe", PatronGroup::Librarian, SystemClock.now());
        assert_eq!(1, patron_repo.create(&patron).await.expect("should create patron"));

        let mut loaded = patron_repo.get("DDB-P-1").await.expect("should return patron");
        loaded.fines = Decimal::new(275, 2);
        patron_repo.update(&loaded).await.expect("should update patron");
        let updated = patron_repo.get("DDB-P-1").await.expect("should return patron");
        assert_eq!(Decimal::new(275, 2), updated.fines);
        assert_eq!(1, updated.version);

        let librarians = patron_repo.find_by_group(PatronGroup::Librarian).await.expect("should query");
        assert!(librarians.iter().any(|p| p.patron_id == "DDB-P-1"));
    }
}
