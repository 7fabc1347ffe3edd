pub mod ddb_transaction_repository;
pub mod memory_transaction_repository;

use async_trait::async_trait;
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;
use crate::fines::domain::model::TransactionEntity;

#[async_trait]
pub(crate) trait TransactionRepository: Repository<TransactionEntity> {
    // transactions of the patron, newest first
    async fn find_by_patron(&self, patron_id: &str) -> LibraryResult<Vec<TransactionEntity>>;

    async fn find_all(&self) -> LibraryResult<Vec<TransactionEntity>>;
}
