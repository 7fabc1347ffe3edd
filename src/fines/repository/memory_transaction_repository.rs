use async_trait::async_trait;
use crate::core::library::LibraryResult;
use crate::fines::domain::model::TransactionEntity;
use crate::fines::repository::TransactionRepository;
use crate::utils::memory::MemoryRepository;

#[async_trait]
impl TransactionRepository for MemoryRepository<TransactionEntity> {
    async fn find_by_patron(&self, patron_id: &str) -> LibraryResult<Vec<TransactionEntity>> {
        let tables = self.db().read().await;
        let mut txs: Vec<TransactionEntity> = tables.transactions.values()
            .filter(|t| t.patron_id == patron_id)
            .cloned()
            .collect();
        txs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.transaction_id.cmp(&a.transaction_id)));
        Ok(txs)
    }

    async fn find_all(&self) -> LibraryResult<Vec<TransactionEntity>> {
        let tables = self.db().read().await;
        Ok(tables.transactions.values().cloned().collect())
    }
}
