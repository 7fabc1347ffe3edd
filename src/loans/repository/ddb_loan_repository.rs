use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::NaiveDateTime;
use tracing::warn;
use crate::core::library::{LibraryResult, LoanStatus};
use crate::core::repository::Repository;
use crate::loans::domain::model::LoanEntity;
use crate::loans::repository::{first_open, LoanRepository};
use crate::utils::date::format_date;
use crate::utils::ddb::{DDBTable, LOANS_TABLE};

#[derive(Debug)]
pub(crate) struct DDBLoanRepository {
    table: DDBTable,
}

impl DDBLoanRepository {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            table: DDBTable::new(client, LOANS_TABLE),
        }
    }

    fn active_status() -> (&'static str, AttributeValue) {
        (":loan_status", AttributeValue::S(LoanStatus::Active.to_string()))
    }
}

#[async_trait]
impl Repository<LoanEntity> for DDBLoanRepository {
    async fn create(&self, entity: &LoanEntity) -> LibraryResult<usize> {
        self.table.put_new(entity).await
    }

    async fn update(&self, entity: &LoanEntity) -> LibraryResult<usize> {
        self.table.put_versioned(entity).await
    }

    async fn get(&self, id: &str) -> LibraryResult<LoanEntity> {
        self.table.get(id).await
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        self.table.delete(id).await
    }
}

// Note you cannot use certain reserved words per https://docs.aws.amazon.com/amazondynamodb/latest/developerguide/ReservedWords.html
#[async_trait]
impl LoanRepository for DDBLoanRepository {
    async fn find_active_by_item(&self, item_barcode: &str) -> LibraryResult<Option<LoanEntity>> {
        let loans: Vec<LoanEntity> = self.table.query_lookup(
            "item_barcode = :item_barcode AND loan_status = :loan_status",
            &[Self::active_status(), (":item_barcode", AttributeValue::S(item_barcode.to_string()))]).await?;
        if loans.len() > 1 {
            warn!(item_barcode, open_loans = loans.len(), "item has more than one open loan");
        }
        Ok(first_open(loans))
    }

    async fn find_active(&self) -> LibraryResult<Vec<LoanEntity>> {
        self.table.query_index("loan_status = :loan_status", None, &[],
                               &[Self::active_status()], true).await
    }

    async fn find_overdue(&self, now: NaiveDateTime) -> LibraryResult<Vec<LoanEntity>> {
        self.table.query_index("loan_status = :loan_status AND due_at < :now", None, &[],
                               &[Self::active_status(), (":now", AttributeValue::S(format_date(now)))],
                               true).await
    }

    async fn find_active_by_patron(&self, patron_id: &str) -> LibraryResult<Vec<LoanEntity>> {
        self.table.query_index(
            "loan_status = :loan_status", Some("patron_id = :patron_id"), &[],
            &[Self::active_status(), (":patron_id", AttributeValue::S(patron_id.to_string()))],
            true).await
    }
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use aws_sdk_dynamodb::Client;
    use chrono::Duration;
    use lazy_static::lazy_static;
    use crate::core::repository::{Repository, RepositoryStore};
    use crate::loans::domain::model::LoanEntity;
    use crate::loans::repository::ddb_loan_repository::DDBLoanRepository;
    use crate::loans::repository::LoanRepository;
    use crate::utils::ddb::{build_db_client, create_table, delete_table, LOANS_TABLE};
    use crate::utils::date::{Clock, SystemClock};

    lazy_static! {
        static ref CLIENT: AsyncOnce<Client> = AsyncOnce::new(async {
                let client = build_db_client(&RepositoryStore::LocalDynamoDB).await;
                let _ = delete_table(&client, LOANS_TABLE.name).await;
                let _ = create_table(&client, &LOANS_TABLE).await;
                client
            });
    }

    #[tokio::test]
    #[ignore = "needs DynamoDB Local on localhost:8000"]
    async fn test_should_query_active_and_overdue_loans() {
        let loan_repo = DDBLoanRepository::new(CLIENT.get().await.clone());
        let now = SystemClock.now();
        let overdue = LoanEntity::issue("test", "DDB-L-1", "DDB-P-1", now - Duration::days(30), 14);
        let current = LoanEntity::issue("test", "DDB-L-2", "DDB-P-1", now, 14);
        let mut returned = LoanEntity::issue("test", "DDB-L-3", "DDB-P-2", now - Duration::days(30), 14);
        returned.close(now);
        for loan in [&overdue, &current, &returned] {
            loan_repo.create(loan).await.expect("should create loan");
        }

        let found = loan_repo.find_active_by_item("DDB-L-1").await.expect("should query").expect("should find");
        assert_eq!(overdue.loan_id, found.loan_id);
        assert!(loan_repo.find_active_by_item("DDB-L-3").await.expect("should query").is_none());

        let late = loan_repo.find_overdue(now).await.expect("should query");
        assert!(late.iter().any(|l| l.loan_id == overdue.loan_id));
        assert!(!late.iter().any(|l| l.loan_id == current.loan_id));
        assert_eq!(2, loan_repo.find_active_by_patron("DDB-P-1").await.expect("should query").len());
    }
}
