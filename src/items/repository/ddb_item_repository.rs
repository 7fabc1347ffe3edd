use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use crate::core::library::{ItemStatus, LibraryResult};
use crate::core::repository::Repository;
use crate::items::domain::model::ItemEntity;
use crate::items::repository::ItemRepository;
use crate::utils::ddb::{DDBTable, ITEMS_TABLE};

#[derive(Debug)]
pub(crate) struct DDBItemRepository {
    table: DDBTable,
}

impl DDBItemRepository {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            table: DDBTable::new(client, ITEMS_TABLE),
        }
    }
}

#[async_trait]
impl Repository<ItemEntity> for DDBItemRepository {
    async fn create(&self, entity: &ItemEntity) -> LibraryResult<usize> {
        self.table.put_new(entity).await
    }

    async fn update(&self, entity: &ItemEntity) -> LibraryResult<usize> {
        self.table.put_versioned(entity).await
    }

    async fn get(&self, id: &str) -> LibraryResult<ItemEntity> {
        self.table.get(id).await
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        self.table.delete(id).await
    }
}

#[async_trait]
impl ItemRepository for DDBItemRepository {
    async fn find_by_status(&self, status: ItemStatus) -> LibraryResult<Vec<ItemEntity>> {
        self.table.query_index("item_status = :item_status", None, &[],
                               &[(":item_status", AttributeValue::S(status.to_string()))], true).await
    }
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use aws_sdk_dynamodb::Client;
    use lazy_static::lazy_static;
    use crate::core::library::{ItemStatus, LibraryError};
    use crate::core::repository::{Repository, RepositoryStore};
    use crate::items::domain::model::ItemEntity;
    use crate::items::repository::ddb_item_repository::DDBItemRepository;
    use crate::items::repository::ItemRepository;
    use crate::utils::ddb::{build_db_client, create_table, delete_table, ITEMS_TABLE};
    use crate::utils::date::{Clock, SystemClock};

    lazy_static! {
        static ref CLIENT: AsyncOnce<Client> = AsyncOnce::new(async {
                let client = build_db_client(&RepositoryStore::LocalDynamoDB).await;
                let _ = delete_table(&client, ITEMS_TABLE.name).await;
                let _ = create_table(&client, &ITEMS_TABLE).await;
                client
            });
    }

    #[tokio::test]
    #[ignore = "needs DynamoDB Local on localhost:8000"]
    async fn test_should_create_get_update_item() {
        let item_repo = DDBItemRepository::new(CLIENT.get().await.clone());
        let item = ItemEntity::new("DDB-B-1", "Dune", "REGULAR", ItemStatus::Available, SystemClock.now());
        assert_eq!(1, item_repo.create(&item).await.expect("should create item"));
        assert!(matches!(item_repo.create(&item).await, Err(LibraryError::DuplicateKey { .. })));

        let mut loaded = item_repo.get("DDB-B-1").await.expect("should return item");
        assert_eq!(item, loaded);
        loaded.item_status = ItemStatus::Lost;
        assert_eq!(1, item_repo.update(&loaded).await.expect("should update item"));
        assert!(item_repo.update(&loaded).await.expect_err("should be stale").is_conflict());

        let lost = item_repo.find_by_status(ItemStatus::Lost).await.expect("should query items");
        assert!(lost.iter().any(|i| i.barcode == "DDB-B-1"));
    }

    #[tokio::test]
    #[ignore = "needs DynamoDB Local on localhost:8000"]
    async fn test_should_create_delete_item() {
        let item_repo = DDBItemRepository::new(CLIENT.get().await.clone());
        let item = ItemEntity::new("DDB-B-2", "Emma", "REGULAR", ItemStatus::Available, SystemClock.now());
        item_repo.create(&item).await.expect("should create item");
        assert_eq!(1, item_repo.delete("DDB-B-2").await.expect("should delete item"));
        assert!(item_repo.get("DDB-B-2").await.is_err());
    }
}
