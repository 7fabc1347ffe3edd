use async_trait::async_trait;
use chrono::NaiveDateTime;
use crate::core::library::LibraryResult;
use crate::loans::domain::model::LoanEntity;
use crate::loans::repository::{first_open, LoanRepository};
use crate::utils::memory::MemoryRepository;

impl MemoryRepository<LoanEntity> {
    async fn active_where<F: Fn(&LoanEntity) -> bool>(&self, pred: F) -> Vec<LoanEntity> {
        let tables = self.db().read().await;
        let mut loans: Vec<LoanEntity> = tables.loans.values()
            .filter(|l| l.is_active() && pred(l))
            .cloned()
            .collect();
        loans.sort_by(|a, b| a.due_at.cmp(&b.due_at).then(a.loan_id.cmp(&b.loan_id)));
        loans
    }
}

#[async_trait]
impl LoanRepository for MemoryRepository<LoanEntity> {
    async fn find_active_by_item(&self, item_barcode: &str) -> LibraryResult<Option<LoanEntity>> {
        Ok(first_open(self.active_where(|l| l.item_barcode == item_barcode).await))
    }

    async fn find_active(&self) -> LibraryResult<Vec<LoanEntity>> {
        Ok(self.active_where(|_| true).await)
    }

    async fn find_overdue(&self, now: NaiveDateTime) -> LibraryResult<Vec<LoanEntity>> {
        Ok(self.active_where(|l| l.is_overdue(now)).await)
    }

    async fn find_active_by_patron(&self, patron_id: &str) -> LibraryResult<Vec<LoanEntity>> {
        Ok(self.active_where(|l| l.patron_id == patron_id).await)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};
    use crate::core::repository::Repository;
    use crate::loans::domain::model::LoanEntity;
    use crate::loans::repository::LoanRepository;
    use crate::utils::memory::{MemoryDatabase, MemoryRepository};

    #[tokio::test]
    async fn test_should_query_active_loans() {
        let repo = MemoryRepository::<LoanEntity>::new(MemoryDatabase::new());
        let now = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap().and_hms_opt(10, 0, 0).unwrap();
        let late = LoanEntity::issue("test", "B-1", "P-1", now - Duration::days(20), 14);
        let current = LoanEntity::issue("test", "B-2", "P-1", now, 7);
        let mut returned = LoanEntity::issue("test", "B-3", "P-2", now - Duration::days(20), 14);
        returned.close(now);
        for loan in [&current, &late, &returned] {
            repo.create(loan).await.expect("should create loan");
        }

        let active = repo.find_active().await.expect("should find");
        assert_eq!(vec![late.loan_id.clone(), current.loan_id.clone()],
                   active.iter().map(|l| l.loan_id.clone()).collect::<Vec<_>>());
        let overdue = repo.find_overdue(now).await.expect("should find");
        assert_eq!(1, overdue.len());
        assert_eq!(late.loan_id, overdue[0].loan_id);
        assert_eq!(Some(current.loan_id.clone()), repo.find_active_by_item("B-2").await.expect("should find").map(|l| l.loan_id));
        assert_eq!(None, repo.find_active_by_item("B-3").await.expect("should find"));
        assert_eq!(2, repo.find_active_by_patron("P-1").await.expect("should find").len());
    }
}
