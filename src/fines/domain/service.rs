use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::info;
use crate::core::domain::Configuration;
use crate::core::events::DomainEvent;
use crate::core::library::{LibraryError, LibraryResult, PaymentMethod, TransactionKind};
use crate::core::repository::{ChangeSet, Mutation, RetryPolicy, UnitOfWork};
use crate::fines::domain::LedgerService;
use crate::fines::domain::model::TransactionEntity;
use crate::fines::dto::{LedgerReceiptDto, LedgerSummaryDto, TransactionDto};
use crate::fines::repository::TransactionRepository;
use crate::gateway::events::{EventPublisher, publish_events};
use crate::patrons::dto::PatronDto;
use crate::patrons::repository::PatronRepository;
use crate::utils::date::Clock;

const INVALID_AMOUNT: &str = "INVALID_AMOUNT";

// Settlement is a credit against the fine balance
#[derive(Debug, Clone, Copy, PartialEq)]
enum Settlement {
    Payment,
    Waiver,
}

pub(crate) struct LedgerServiceImpl {
    patron_repository: Arc<dyn PatronRepository>,
    transaction_repository: Arc<dyn TransactionRepository>,
    unit_of_work: Arc<dyn UnitOfWork>,
    publisher: Arc<dyn EventPublisher>,
    retry: RetryPolicy,
    clock: Arc<dyn Clock>,
}

impl LedgerServiceImpl {
    pub(crate) fn new(config: &Configuration,
                      patron_repository: Arc<dyn PatronRepository>,
                      transaction_repository: Arc<dyn TransactionRepository>,
                      unit_of_work: Arc<dyn UnitOfWork>,
                      publisher: Arc<dyn EventPublisher>,
                      clock: Arc<dyn Clock>) -> Self {
        Self {
            patron_repository,
            transaction_repository,
            unit_of_work,
            publisher,
            retry: RetryPolicy::new(config),
            clock,
        }
    }

    async fn try_settle(&self, patron_id: &str, amount: Decimal, actor_id: &str,
                        settlement: Settlement, note: Option<&str>) -> LibraryResult<LedgerReceiptDto> {
        let patron = self.patron_repository.get(patron_id).await?;
        if amount <= Decimal::ZERO || amount > patron.fines {
            return Err(LibraryError::precondition(
                format!("amount {} must be positive and at most the balance {}", amount, patron.fines).as_str(),
                Some(INVALID_AMOUNT.to_string())));
        }
        let now = self.clock.now();
        let mut settled = patron.clone();
        settled.fines -= amount;
        settled.updated_at = now;
        let (kind, method, event_name) = match settlement {
            Settlement::Payment => {
                settled.total_paid += amount;
                (TransactionKind::FinePayment, PaymentMethod::Cash, "fine_paid")
            }
            Settlement::Waiver => {
                (TransactionKind::Waive, PaymentMethod::System, "fine_waived")
            }
        };
        let tx = TransactionEntity::new(patron_id, -amount, kind, method, actor_id, now).with_note(note);
        let receipt = LedgerReceiptDto {
            patron: PatronDto { version: patron.version + 1, ..PatronDto::from(&settled) },
            transaction: TransactionDto::from(&tx),
        };

        let mut changes = ChangeSet::new();
        changes.push(Mutation::UpdatePatron(settled))
            .push(Mutation::AppendTransaction(tx))
            .emit(DomainEvent::added(event_name, "fines", patron_id,
                                     &HashMap::from([("actor_id".to_string(), actor_id.to_string())]),
                                     &receipt.transaction)?);
        self.unit_of_work.commit(&changes).await?;
        info!(patron_id, amount = %amount, kind = %kind, balance = %receipt.patron.fines, "settled fine");
        publish_events(self.publisher.as_ref(), &changes.events).await;
        Ok(receipt)
    }
}

#[async_trait]
impl LedgerService for LedgerServiceImpl {
    async fn pay_fine(&self, patron_id: &str, amount: Decimal, actor_id: &str) -> LibraryResult<LedgerReceiptDto> {
        self.retry.run("pay_fine", patron_id, || {
            self.try_settle(patron_id, amount, actor_id, Settlement::Payment, None)
        }).await
    }

    async fn waive_fine(&self, patron_id: &str, amount: Decimal, actor_id: &str, note: Option<&str>) -> LibraryResult<LedgerReceiptDto> {
        self.retry.run("waive_fine", patron_id, || {
            self.try_settle(patron_id, amount, actor_id, Settlement::Waiver, note)
        }).await
    }

    async fn patron_transactions(&self, patron_id: &str) -> LibraryResult<Vec<TransactionDto>> {
        let txs = self.transaction_repository.find_by_patron(patron_id).await?;
        Ok(txs.iter().map(TransactionDto::from).collect())
    }

    async fn summary(&self, patron_id: Option<&str>) -> LibraryResult<LedgerSummaryDto> {
        let txs = match patron_id {
            Some(id) => self.transaction_repository.find_by_patron(id).await?,
            None => self.transaction_repository.find_all().await?,
        };
        Ok(LedgerSummaryDto::from_transactions(&txs))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use crate::core::library::{LibraryError, PatronGroup, PaymentMethod, TransactionKind};
    use crate::fines::domain::LedgerService;
    use crate::utils::testing::TestContext;

    #[tokio::test]
    async fn test_should_pay_part_of_balance() {
        let ctx = TestContext::new().await;
        ctx.add_patron_with_fines("ST-001", PatronGroup::Student, Decimal::new(300, 2)).await;

        let receipt = ctx.state.ledger.pay_fine("ST-001", Decimal::new(125, 2), "LIB-1").await.expect("should pay");
        assert_eq!(Decimal::new(175, 2), receipt.patron.fines);
        assert_eq!(Decimal::new(125, 2), receipt.patron.total_paid);
        assert_eq!(Decimal::new(-125, 2), receipt.transaction.amount);
        assert_eq!(TransactionKind::FinePayment, receipt.transaction.kind);
        assert_eq!(PaymentMethod::Cash, receipt.transaction.method);

        let stored = ctx.patron("ST-001").await;
        assert_eq!(receipt.patron.fines, stored.fines);
        assert_eq!(receipt.patron.version, stored.version);
        assert_eq!(vec!["fine_paid"], ctx.event_names().await);
    }

    #[tokio::test]
    async fn test_should_reject_invalid_amounts() {
        let ctx = TestContext::new().await;
        ctx.add_patron_with_fines("ST-001", PatronGroup::Student, Decimal::new(300, 2)).await;
        for amount in [Decimal::ZERO, Decimal::new(-1, 0), Decimal::new(301, 2)] {
            assert!(matches!(ctx.state.ledger.pay_fine("ST-001", amount, "LIB-1").await,
                Err(LibraryError::PreconditionFailed { .. })));
        }
        assert!(matches!(ctx.state.ledger.pay_fine("ST-404", Decimal::ONE, "LIB-1").await,
            Err(LibraryError::NotFound { .. })));
        assert_eq!(Decimal::new(300, 2), ctx.patron("ST-001").await.fines);
        assert!(ctx.state.ledger.patron_transactions("ST-001").await.expect("should list").is_empty());
    }

    #[tokio::test]
    async fn test_should_waive_and_summarize() {
        let ctx = TestContext::new().await;
        ctx.add_patron_with_fines("ST-001", PatronGroup::Student, Decimal::new(300, 2)).await;
        ctx.add_patron_with_fines("ST-002", PatronGroup::Student, Decimal::new(100, 2)).await;

        let receipt = ctx.state.ledger.waive_fine("ST-001", Decimal::new(300, 2), "LIB-1", Some("first offence"))
            .await.expect("should waive");
        assert_eq!(Decimal::ZERO, receipt.patron.fines);
        assert_eq!(Decimal::ZERO, receipt.patron.total_paid);
        assert_eq!(Some("first offence".to_string()), receipt.transaction.note);
        ctx.state.ledger.pay_fine("ST-002", Decimal::ONE, "LIB-1").await.expect("should pay");

        let all = ctx.state.ledger.summary(None).await.expect("should summarize");
        assert_eq!(Decimal::new(300, 2), all.total_waived);
        assert_eq!(Decimal::ONE, all.total_collected);
        let mine = ctx.state.ledger.summary(Some("ST-002")).await.expect("should summarize");
        assert_eq!(Decimal::ZERO, mine.total_waived);
        assert_eq!(1, ctx.state.ledger.patron_transactions("ST-002").await.expect("should list").len());
    }
}
