use std::sync::Arc;
use crate::core::repository::RepositoryStore;
use crate::holds::domain::model::HoldEntity;
use crate::holds::repository::ddb_hold_repository::DDBHoldRepository;
use crate::holds::repository::HoldRepository;
use crate::utils::ddb::{build_db_client, create_table, HOLDS_TABLE};
use crate::utils::memory::MemoryRepository;

pub(crate) async fn create_hold_repository(store: &RepositoryStore) -> Arc<dyn HoldRepository> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await;
            Arc::new(DDBHoldRepository::new(client))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await;
            let _ = create_table(&client, &HOLDS_TABLE).await;
            Arc::new(DDBHoldRepository::new(client))
        }
        RepositoryStore::Memory(db) => {
            Arc::new(MemoryRepository::<HoldEntity>::new(db.clone()))
        }
    }
}
