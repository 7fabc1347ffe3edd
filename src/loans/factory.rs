use std::sync::Arc;
use crate::core::repository::RepositoryStore;
use crate::items::factory::create_item_repository;
use crate::loans::domain::LoanLedger;
use crate::loans::domain::model::LoanEntity;
use crate::loans::domain::service::LoanLedgerImpl;
use crate::loans::repository::ddb_loan_repository::DDBLoanRepository;
use crate::loans::repository::LoanRepository;
use crate::patrons::factory::create_patron_repository;
use crate::utils::date::Clock;
use crate::utils::ddb::{build_db_client, create_table, LOANS_TABLE};
use crate::utils::memory::MemoryRepository;

pub(crate) async fn create_loan_repository(store: &RepositoryStore) -> Arc<dyn LoanRepository> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await;
            Arc::new(DDBLoanRepository::new(client))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await;
            let _ = create_table(&client, &LOANS_TABLE).await;
            Arc::new(DDBLoanRepository::new(client))
        }
        RepositoryStore::Memory(db) => {
            Arc::new(MemoryRepository::<LoanEntity>::new(db.clone()))
        }
    }
}

pub(crate) async fn create_loan_ledger(store: &RepositoryStore, clock: Arc<dyn Clock>) -> Arc<dyn LoanLedger> {
    let loan_repo = create_loan_repository(store).await;
    let patron_repo = create_patron_repository(store).await;
    let item_repo = create_item_repository(store).await;
    Arc::new(LoanLedgerImpl::new(loan_repo, patron_repo, item_repo, clock))
}
