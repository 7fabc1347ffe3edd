use std::sync::Arc;
use async_trait::async_trait;
use tracing::warn;
use crate::core::library::{LibraryError, LibraryResult};
use crate::items::repository::ItemRepository;
use crate::loans::domain::LoanLedger;
use crate::loans::dto::{LoanDto, OverdueLoanDto};
use crate::loans::repository::LoanRepository;
use crate::patrons::repository::PatronRepository;
use crate::utils::date::Clock;

// a missing row is reported, any other failure aborts the read
fn found<T>(res: LibraryResult<T>) -> LibraryResult<Option<T>> {
    match res {
        Ok(row) => Ok(Some(row)),
        Err(LibraryError::NotFound { .. }) => Ok(None),
        Err(err) => Err(err),
    }
}

pub(crate) struct LoanLedgerImpl {
    loan_repository: Arc<dyn LoanRepository>,
    patron_repository: Arc<dyn PatronRepository>,
    item_repository: Arc<dyn ItemRepository>,
    clock: Arc<dyn Clock>,
}

impl LoanLedgerImpl {
    pub(crate) fn new(loan_repository: Arc<dyn LoanRepository>,
                      patron_repository: Arc<dyn PatronRepository>,
                      item_repository: Arc<dyn ItemRepository>,
                      clock: Arc<dyn Clock>) -> Self {
        Self {
            loan_repository,
            patron_repository,
            item_repository,
            clock,
        }
    }
}

#[async_trait]
impl LoanLedger for LoanLedgerImpl {
    async fn active_loans(&self) -> LibraryResult<Vec<LoanDto>> {
        let loans = self.loan_repository.find_active().await?;
        Ok(loans.iter().map(LoanDto::from).collect())
    }

    async fn overdue_loans(&self) -> LibraryResult<Vec<OverdueLoanDto>> {
        let now = self.clock.now();
        let loans = self.loan_repository.find_overdue(now).await?;
        let mut report = Vec::with_capacity(loans.len());
        for loan in loans {
            // a dangling reference still shows up in the report
            let patron = found(self.patron_repository.get(loan.patron_id.as_str()).await)?;
            let item = found(self.item_repository.get(loan.item_barcode.as_str()).await)?;
            if patron.is_none() || item.is_none() {
                warn!(loan_id = loan.loan_id.as_str(), barcode = loan.item_barcode.as_str(),
                    patron_id = loan.patron_id.as_str(), "overdue loan references a missing row");
            }
            report.push(OverdueLoanDto {
                loan_id: loan.loan_id.to_string(),
                patron_id: loan.patron_id.to_string(),
                patron_name: patron.as_ref().map(|p| p.full_name.to_string()).unwrap_or_default(),
                patron_group: patron.as_ref().map(|p| p.patron_group),
                item_title: item.as_ref().map(|i| i.title.to_string()).unwrap_or_default(),
                item_barcode: loan.item_barcode.to_string(),
                due_at: loan.due_at,
                days_overdue: loan.days_overdue(now),
            });
        }
        Ok(report)
    }

    async fn patron_loans(&self, patron_id: &str) -> LibraryResult<Vec<LoanDto>> {
        let loans = self.loan_repository.find_active_by_patron(patron_id).await?;
        Ok(loans.iter().map(LoanDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use async_trait::async_trait;
    use chrono::Duration;
    use crate::core::library::{ItemStatus, LibraryError, LibraryResult, PatronGroup};
    use crate::core::repository::Repository;
    use crate::items::domain::model::ItemEntity;
    use crate::items::repository::ItemRepository;
    use crate::loans::domain::LoanLedger;
    use crate::loans::domain::model::LoanEntity;
    use crate::loans::domain::service::LoanLedgerImpl;
    use crate::patrons::domain::model::PatronEntity;
    use crate::utils::memory::MemoryRepository;
    use crate::utils::testing::TestContext;

    struct UnavailableItems;

    #[async_trait]
    impl Repository<ItemEntity> for UnavailableItems {
        async fn create(&self, _entity: &ItemEntity) -> LibraryResult<usize> {
            Err(LibraryError::database("table unavailable", None, true))
        }

        async fn update(&self, _entity: &ItemEntity) -> LibraryResult<usize> {
            Err(LibraryError::database("table unavailable", None, true))
        }

        async fn get(&self, _id: &str) -> LibraryResult<ItemEntity> {
            Err(LibraryError::database("table unavailable", None, true))
        }

        async fn delete(&self, _id: &str) -> LibraryResult<usize> {
            Err(LibraryError::database("table unavailable", None, true))
        }
    }

    #[async_trait]
    impl ItemRepository for UnavailableItems {
        async fn find_by_status(&self, _status: ItemStatus) -> LibraryResult<Vec<ItemEntity>> {
            Err(LibraryError::database("table unavailable", None, true))
        }
    }

    #[tokio::test]
    async fn test_should_fail_overdue_report_when_item_lookup_fails() {
        let ctx = TestContext::new().await;
        ctx.add_patron("ST-001", PatronGroup::Student).await;
        ctx.add_item("B-1", "REGULAR").await;
        ctx.state.circulation.checkout("ST-001", &["B-1".to_string()]).await.expect("should checkout");
        ctx.clock.advance(Duration::days(20));

        let ledger = LoanLedgerImpl::new(
            Arc::new(MemoryRepository::<LoanEntity>::new(ctx.db.clone())),
            Arc::new(MemoryRepository::<PatronEntity>::new(ctx.db.clone())),
            Arc::new(UnavailableItems),
            Arc::new(ctx.clock.clone()));
        assert!(matches!(ledger.overdue_loans().await, Err(LibraryError::Database { .. })));
    }

    #[tokio::test]
    async fn test_should_report_overdue_loan_with_missing_item() {
        let ctx = TestContext::new().await;
        ctx.add_patron("ST-001", PatronGroup::Student).await;
        ctx.add_item("B-1", "REGULAR").await;
        ctx.state.circulation.checkout("ST-001", &["B-1".to_string()]).await.expect("should checkout");
        ctx.clock.advance(Duration::days(20));
        MemoryRepository::<ItemEntity>::new(ctx.db.clone()).delete("B-1").await.expect("should delete item");

        let overdue = ctx.state.loans.overdue_loans().await.expect("should list");
        assert_eq!(1, overdue.len());
        assert_eq!("", overdue[0].item_title);
        assert_eq!("Patron ST-001", overdue[0].patron_name);
    }

    #[tokio::test]
    async fn test_should_report_overdue_loans() {
        let ctx = TestContext::new().await;
        ctx.add_patron("ST-001", PatronGroup::Student).await;
        ctx.add_item("B-1", "REGULAR").await;
        ctx.add_item("B-2", "REGULAR").await;
        ctx.state.circulation.checkout("ST-001", &["B-1".to_string()]).await.expect("should checkout");
        ctx.clock.advance(Duration::days(7));
        ctx.state.circulation.checkout("ST-001", &["B-2".to_string()]).await.expect("should checkout");

        let active = ctx.state.loans.active_loans().await.expect("should list");
        assert_eq!(vec!["B-1", "B-2"], active.iter().map(|l| l.item_barcode.as_str()).collect::<Vec<_>>());
        assert!(ctx.state.loans.overdue_loans().await.expect("should list").is_empty());

        ctx.clock.advance(Duration::days(10));
        let overdue = ctx.state.loans.overdue_loans().await.expect("should list");
        assert_eq!(1, overdue.len());
        assert_eq!("B-1", overdue[0].item_barcode);
        assert_eq!(3, overdue[0].days_overdue);
        assert_eq!("Patron ST-001", overdue[0].patron_name);
        assert_eq!(Some(PatronGroup::Student), overdue[0].patron_group);
        assert_eq!("Title B-1", overdue[0].item_title);

        assert_eq!(2, ctx.state.loans.patron_loans("ST-001").await.expect("should list").len());
        assert!(ctx.state.loans.patron_loans("ST-404").await.expect("should list").is_empty());
    }
}
