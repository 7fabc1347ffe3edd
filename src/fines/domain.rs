pub mod model;
pub mod service;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};
use crate::core::library::{LibraryResult, PaymentMethod, TransactionKind};
use crate::fines::domain::model::{SYSTEM_ACTOR, TransactionEntity};
use crate::fines::dto::{LedgerReceiptDto, LedgerSummaryDto, TransactionDto};
use crate::loans::domain::model::LoanEntity;
use crate::patrons::domain::model::PatronEntity;
use crate::rules::domain::CirculationPolicy;

#[derive(Debug, PartialEq, Clone, Copy)]
pub(crate) struct FineAssessment {
    pub days_overdue: i64,
    pub amount: Decimal,
}

// FineAssessor prices an overdue return: whole days overdue times the daily rate, rounded to
// cents with midpoint away from zero. A zero rate still yields a 0.00 assessment.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct FineAssessor;

impl FineAssessor {
    pub(crate) fn assess(&self, loan: &LoanEntity, policy: &CirculationPolicy, now: NaiveDateTime) -> Option<FineAssessment> {
        let days_overdue = loan.days_overdue(now);
        if days_overdue <= 0 {
            return None;
        }
        let mut amount = (Decimal::from(days_overdue) * policy.fine_per_day)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        // cents, so a zero rate prints as 0.00
        amount.rescale(2);
        Some(FineAssessment { days_overdue, amount })
    }

    // adds the fine to the balance and builds the matching ledger entry
    pub(crate) fn charge(&self, patron: &PatronEntity, item_title: &str,
                         assessment: &FineAssessment, now: NaiveDateTime) -> (PatronEntity, TransactionEntity) {
        let mut charged = patron.clone();
        charged.fines += assessment.amount;
        charged.updated_at = now;
        let tx = TransactionEntity::new(patron.patron_id.as_str(), assessment.amount,
                                        TransactionKind::FineAssessment, PaymentMethod::System,
                                        SYSTEM_ACTOR, now)
            .with_item_title(item_title)
            .with_note(Some(format!("{} days overdue", assessment.days_overdue).as_str()));
        (charged, tx)
    }
}

#[async_trait]
pub(crate) trait LedgerService: Sync + Send {
    // cash payment against the balance, 0 < amount <= balance
    async fn pay_fine(&self, patron_id: &str, amount: Decimal, actor_id: &str) -> LibraryResult<LedgerReceiptDto>;
    async fn waive_fine(&self, patron_id: &str, amount: Decimal, actor_id: &str, note: Option<&str>) -> LibraryResult<LedgerReceiptDto>;
    async fn patron_transactions(&self, patron_id: &str) -> LibraryResult<Vec<TransactionDto>>;
    async fn summary(&self, patron_id: Option<&str>) -> LibraryResult<LedgerSummaryDto>;
}
