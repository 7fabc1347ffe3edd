pub mod ddb_loan_repository;
pub mod memory_loan_repository;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;
use crate::loans::domain::model::LoanEntity;

#[async_trait]
pub(crate) trait LoanRepository: Repository<LoanEntity> {
    // the loan of the item that has not been returned, if any
    async fn find_active_by_item(&self, item_barcode: &str) -> LibraryResult<Option<LoanEntity>>;

    // active loans ordered by due date
    async fn find_active(&self) -> LibraryResult<Vec<LoanEntity>>;

    // active loans due before now, ordered by due date
    async fn find_overdue(&self, now: NaiveDateTime) -> LibraryResult<Vec<LoanEntity>>;

    async fn find_active_by_patron(&self, patron_id: &str) -> LibraryResult<Vec<LoanEntity>>;
}

// earliest issued wins when a desynced store holds more than one open loan for an item
pub(crate) fn first_open(mut loans: Vec<LoanEntity>) -> Option<LoanEntity> {
    loans.sort_by(|a, b| a.issued_at.cmp(&b.issued_at));
    loans.into_iter().next()
}
