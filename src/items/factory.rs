use std::sync::Arc;
use crate::core::repository::RepositoryStore;
use crate::items::domain::ItemService;
use crate::items::domain::model::ItemEntity;
use crate::items::domain::service::ItemServiceImpl;
use crate::items::repository::ddb_item_repository::DDBItemRepository;
use crate::items::repository::ItemRepository;
use crate::utils::date::Clock;
use crate::utils::ddb::{build_db_client, create_table, ITEMS_TABLE};
use crate::utils::memory::MemoryRepository;

pub(crate) async fn create_item_repository(store: &RepositoryStore) -> Arc<dyn ItemRepository> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await;
            Arc::new(DDBItemRepository::new(client))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await;
            let _ = create_table(&client, &ITEMS_TABLE).await;
            Arc::new(DDBItemRepository::new(client))
        }
        RepositoryStore::Memory(db) => {
            Arc::new(MemoryRepository::<ItemEntity>::new(db.clone()))
        }
    }
}

pub(crate) async fn create_item_service(store: &RepositoryStore, clock: Arc<dyn Clock>) -> Arc<dyn ItemService> {
    let item_repo = create_item_repository(store).await;
    Arc::new(ItemServiceImpl::new(item_repo, clock))
}
