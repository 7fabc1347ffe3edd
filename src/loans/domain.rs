pub mod model;
pub mod service;

use async_trait::async_trait;
use crate::core::library::LibraryResult;
use crate::loans::dto::{LoanDto, OverdueLoanDto};

// LoanLedger serves the read models over the custody history; loans are only written by
// circulation.
#[async_trait]
pub(crate) trait LoanLedger: Sync + Send {
    // open loans ordered by due date
    async fn active_loans(&self) -> LibraryResult<Vec<LoanDto>>;
    async fn overdue_loans(&self) -> LibraryResult<Vec<OverdueLoanDto>>;
    async fn patron_loans(&self, patron_id: &str) -> LibraryResult<Vec<LoanDto>>;
}
