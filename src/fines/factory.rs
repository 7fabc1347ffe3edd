use std::sync::Arc;
use crate::core::domain::Configuration;
use crate::core::repository::{create_unit_of_work, RepositoryStore};
use crate::fines::domain::LedgerService;
use crate::fines::domain::model::TransactionEntity;
use crate::fines::domain::service::LedgerServiceImpl;
use crate::fines::repository::ddb_transaction_repository::DDBTransactionRepository;
use crate::fines::repository::TransactionRepository;
use crate::gateway::factory::create_publisher;
use crate::patrons::factory::create_patron_repository;
use crate::utils::date::Clock;
use crate::utils::ddb::{build_db_client, create_table, TRANSACTIONS_TABLE};
use crate::utils::memory::MemoryRepository;

pub(crate) async fn create_transaction_repository(store: &RepositoryStore) -> Arc<dyn TransactionRepository> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await;
            Arc::new(DDBTransactionRepository::new(client))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await;
            let _ = create_table(&client, &TRANSACTIONS_TABLE).await;
            Arc::new(DDBTransactionRepository::new(client))
        }
        RepositoryStore::Memory(db) => {
            Arc::new(MemoryRepository::<TransactionEntity>::new(db.clone()))
        }
    }
}

pub(crate) async fn create_ledger_service(config: &Configuration, store: &RepositoryStore, clock: Arc<dyn Clock>) -> Arc<dyn LedgerService> {
    let patron_repo = create_patron_repository(store).await;
    let transaction_repo = create_transaction_repository(store).await;
    let unit_of_work = create_unit_of_work(store).await;
    let publisher = create_publisher(store.gateway_publisher()).await;
    Arc::new(LedgerServiceImpl::new(config, patron_repo, transaction_repo, unit_of_work, publisher, clock))
}
