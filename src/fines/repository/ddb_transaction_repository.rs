use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::Repository;
use crate::fines::domain::model::TransactionEntity;
use crate::fines::repository::TransactionRepository;
use crate::utils::ddb::{DDBTable, TRANSACTIONS_TABLE};

#[derive(Debug)]
pub(crate) struct DDBTransactionRepository {
    table: DDBTable,
}

impl DDBTransactionRepository {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            table: DDBTable::new(client, TRANSACTIONS_TABLE),
        }
    }
}

#[async_trait]
impl Repository<TransactionEntity> for DDBTransactionRepository {
    async fn create(&self, entity: &TransactionEntity) -> LibraryResult<usize> {
        self.table.put_new(entity).await
    }

    // the ledger is append-only
    async fn update(&self, entity: &TransactionEntity) -> LibraryResult<usize> {
        Err(LibraryError::validation(
            format!("transaction {} cannot be changed", entity.transaction_id).as_str(), None))
    }

    async fn get(&self, id: &str) -> LibraryResult<TransactionEntity> {
        self.table.get(id).await
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        Err(LibraryError::validation(format!("transaction {} cannot be removed", id).as_str(), None))
    }
}

#[async_trait]
impl TransactionRepository for DDBTransactionRepository {
    async fn find_by_patron(&self, patron_id: &str) -> LibraryResult<Vec<TransactionEntity>> {
        // the index range key is the timestamp, read backwards
        self.table.query_index("patron_id = :patron_id", None, &[],
                               &[(":patron_id", AttributeValue::S(patron_id.to_string()))], false).await
    }

    async fn find_all(&self) -> LibraryResult<Vec<TransactionEntity>> {
        self.table.scan(None, &[], &[]).await
    }
}
