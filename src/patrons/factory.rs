use std::sync::Arc;
use crate::core::repository::RepositoryStore;
use crate::patrons::domain::model::PatronEntity;
use crate::patrons::domain::PatronService;
use crate::patrons::domain::service::PatronServiceImpl;
use crate::patrons::repository::ddb_patron_repository::DDBPatronRepository;
use crate::patrons::repository::PatronRepository;
use crate::utils::date::Clock;
use crate::utils::ddb::{build_db_client, create_table, PATRONS_TABLE};
use crate::utils::memory::MemoryRepository;

pub(crate) async fn create_patron_repository(store: &RepositoryStore) -> Arc<dyn PatronRepository> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await;
            Arc::new(DDBPatronRepository::new(client))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await;
            let _ = create_table(&client, &PATRONS_TABLE).await;
            Arc::new(DDBPatronRepository::new(client))
        }
        RepositoryStore::Memory(db) => {
            Arc::new(MemoryRepository::<PatronEntity>::new(db.clone()))
        }
    }
}

pub(crate) async fn create_patron_service(store: &RepositoryStore, clock: Arc<dyn Clock>) -> Arc<dyn PatronService> {
    let patron_repo = create_patron_repository(store).await;
    Arc::new(PatronServiceImpl::new(patron_repo, clock))
}
