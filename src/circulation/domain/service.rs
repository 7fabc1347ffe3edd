use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use tracing::{info, warn};
use crate::circulation::domain::{CirculationService, HELD_FOR_ANOTHER_PATRON, HOLD_LIMIT_REACHED,
                                 HOLD_NOT_ALLOWED, PATRON_BLOCKED, RENEWAL_LIMIT_REACHED};
use crate::circulation::dto::{CheckoutReport, CirculationFailure, ExpireHoldsReport, ReturnReport};
use crate::core::domain::Configuration;
use crate::core::events::DomainEvent;
use crate::core::library::{HoldStatus, ItemStatus, LibraryError, LibraryResult};
use crate::core::repository::{ChangeSet, Mutation, RetryPolicy, UnitOfWork};
use crate::fines::domain::FineAssessor;
use crate::fines::dto::TransactionDto;
use crate::gateway::events::{EventPublisher, publish_events};
use crate::holds::domain::HoldQueue;
use crate::holds::dto::HoldDto;
use crate::items::domain::model::ItemEntity;
use crate::items::domain::state::{ItemEvent, transition};
use crate::items::dto::ItemDto;
use crate::items::repository::ItemRepository;
use crate::loans::domain::model::LoanEntity;
use crate::loans::dto::LoanDto;
use crate::loans::repository::LoanRepository;
use crate::patrons::domain::model::PatronEntity;
use crate::patrons::dto::PatronDto;
use crate::patrons::repository::PatronRepository;
use crate::rules::domain::{PolicySnapshot, RuleResolver, RuleService};
use crate::utils::date::{Clock, format_date};

const CIRCULATION_GROUP: &str = "circulation";
const HOLDS_GROUP: &str = "holds";
const FINES_GROUP: &str = "fines";

pub(crate) struct CirculationServiceImpl {
    config: Configuration,
    item_repository: Arc<dyn ItemRepository>,
    patron_repository: Arc<dyn PatronRepository>,
    loan_repository: Arc<dyn LoanRepository>,
    rule_service: Arc<dyn RuleService>,
    hold_queue: HoldQueue,
    fine_assessor: FineAssessor,
    unit_of_work: Arc<dyn UnitOfWork>,
    publisher: Arc<dyn EventPublisher>,
    retry: RetryPolicy,
    clock: Arc<dyn Clock>,
}

fn metadata(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn ensure_not_blocked(patron: &PatronEntity) -> LibraryResult<()> {
    if patron.blocked {
        return Err(LibraryError::precondition(
            format!("patron {} is blocked", patron.patron_id).as_str(), Some(PATRON_BLOCKED.to_string())));
    }
    Ok(())
}

impl CirculationServiceImpl {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(config: &Configuration,
                      item_repository: Arc<dyn ItemRepository>,
                      patron_repository: Arc<dyn PatronRepository>,
                      loan_repository: Arc<dyn LoanRepository>,
                      rule_service: Arc<dyn RuleService>,
                      hold_queue: HoldQueue,
                      unit_of_work: Arc<dyn UnitOfWork>,
                      publisher: Arc<dyn EventPublisher>,
                      clock: Arc<dyn Clock>) -> Self {
        Self {
            config: config.clone(),
            item_repository,
            patron_repository,
            loan_repository,
            rule_service,
            hold_queue,
            fine_assessor: FineAssessor,
            unit_of_work,
            publisher,
            retry: RetryPolicy::new(config),
            clock,
        }
    }

    async fn load_item(&self, barcode: &str) -> LibraryResult<ItemEntity> {
        match self.item_repository.get(barcode).await {
            Err(LibraryError::NotFound { .. }) => {
                Err(LibraryError::not_found(format!("item {} not found", barcode).as_str()))
            }
            other => other,
        }
    }

    async fn load_patron(&self, patron_id: &str) -> LibraryResult<PatronEntity> {
        match self.patron_repository.get(patron_id).await {
            Err(LibraryError::NotFound { .. }) => {
                Err(LibraryError::not_found(format!("patron {} not found", patron_id).as_str()))
            }
            other => other,
        }
    }

    async fn commit_and_publish(&self, changes: &ChangeSet) -> LibraryResult<()> {
        self.unit_of_work.commit(changes).await?;
        publish_events(self.publisher.as_ref(), &changes.events).await;
        Ok(())
    }

    async fn try_checkout_item(&self, patron: &PatronEntity, barcode: &str,
                               snapshot: &PolicySnapshot) -> LibraryResult<LoanEntity> {
        let item = self.load_item(barcode).await?;
        let next_status = transition(item.item_status, ItemEvent::CheckedOut)?;
        if let Some(open) = self.loan_repository.find_active_by_item(barcode).await? {
            warn!(barcode, loan_id = open.loan_id.as_str(), status = %item.item_status,
                "item has an open loan but is not marked loaned");
            return Err(LibraryError::precondition(
                format!("item {} is already on loan", barcode).as_str(), None));
        }

        let now = self.clock.now();
        let mut changes = ChangeSet::new();
        match self.hold_queue.peek_oldest_active(barcode).await? {
            Some(hold) if hold.patron_id != patron.patron_id => {
                return Err(LibraryError::precondition(
                    "held for another patron", Some(HELD_FOR_ANOTHER_PATRON.to_string())));
            }
            Some(hold) => {
                changes.push(Mutation::UpdateHold(self.hold_queue.consume(&hold, now)));
            }
            None if item.item_status == ItemStatus::Held => {
                warn!(barcode, patron_id = patron.patron_id.as_str(), "held item has no active hold, releasing it");
            }
            None => {}
        }

        let policy = snapshot.resolve(patron.patron_group, item.material_type.as_str());
        let loan = LoanEntity::issue(self.config.branch_id.as_str(), barcode,
                                     patron.patron_id.as_str(), now, policy.loan_days);
        let mut loaned = item.clone();
        loaned.item_status = next_status;
        loaned.loan_count += 1;
        loaned.updated_at = now;
        changes.push(Mutation::UpdateItem(loaned))
            .push(Mutation::CreateLoan(loan.clone()))
            .emit(DomainEvent::added("item_checked_out", CIRCULATION_GROUP, barcode,
                                     &metadata(&[("patron_id", patron.patron_id.as_str())]),
                                     &LoanDto::from(&loan))?);
        self.commit_and_publish(&changes).await?;
        info!(barcode, patron_id = patron.patron_id.as_str(), loan_id = loan.loan_id.as_str(),
            due_at = format_date(loan.due_at).as_str(), "checked out item");
        Ok(loan)
    }

    async fn try_return(&self, barcode: &str, snapshot: &PolicySnapshot) -> LibraryResult<ReturnReport> {
        let item = self.load_item(barcode).await?;
        let now = self.clock.now();
        let mut changes = ChangeSet::new();
        let mut fine_amount = Decimal::new(0, 2);
        let mut borrower: Option<PatronDto> = None;

        let closed = match self.loan_repository.find_active_by_item(barcode).await? {
            Some(loan) => {
                let mut closed = loan.clone();
                closed.close(now);
                changes.push(Mutation::UpdateLoan(closed.clone()));
                match self.patron_repository.get(loan.patron_id.as_str()).await {
                    Ok(patron) => {
                        let policy = snapshot.resolve(patron.patron_group, item.material_type.as_str());
                        match self.fine_assessor.assess(&loan, &policy, now) {
                            Some(assessment) => {
                                let (charged, tx) = self.fine_assessor.charge(&patron, item.title.as_str(), &assessment, now);
                                fine_amount = assessment.amount;
                                borrower = Some(PatronDto { version: charged.version + 1, ..PatronDto::from(&charged) });
                                info!(barcode, patron_id = patron.patron_id.as_str(), days_overdue = assessment.days_overdue,
                                    fine = %assessment.amount, "assessed overdue fine");
                                changes.emit(DomainEvent::added("fine_assessed", FINES_GROUP, patron.patron_id.as_str(),
                                                                &metadata(&[("barcode", barcode)]),
                                                                &TransactionDto::from(&tx))?);
                                changes.push(Mutation::UpdatePatron(charged))
                                    .push(Mutation::AppendTransaction(tx));
                            }
                            None => {
                                borrower = Some(PatronDto::from(&patron));
                            }
                        }
                    }
                    Err(LibraryError::NotFound { .. }) => {
                        warn!(barcode, patron_id = loan.patron_id.as_str(), "borrower not found, no fine assessed");
                    }
                    Err(err) => { return Err(err); }
                }
                Some(closed)
            }
            None => {
                info!(barcode, "no open loan for returned item");
                None
            }
        };

        if item.item_status != ItemStatus::Loaned {
            warn!(barcode, status = %item.item_status, "reconciling return of an item that was not on loan");
        }
        let next_hold = self.hold_queue.peek_oldest_active(barcode).await?;
        let mut returned = item.clone();
        returned.item_status = transition(item.item_status, ItemEvent::Returned { holds_waiting: next_hold.is_some() })?;
        returned.updated_at = now;
        let item_dto = ItemDto { version: item.version + 1, ..ItemDto::from(&returned) };
        let reserved_patron_id = next_hold.as_ref().map(|h| h.patron_id.to_string());
        if let Some(hold) = next_hold {
            changes.push(Mutation::UpdateHold(self.hold_queue.reserve(&hold, now)));
        }
        changes.push(Mutation::UpdateItem(returned))
            .emit(DomainEvent::updated("item_returned", CIRCULATION_GROUP, barcode,
                                       &metadata(&[("reserved_patron_id", reserved_patron_id.as_deref().unwrap_or_default())]),
                                       &item_dto)?);
        self.commit_and_publish(&changes).await?;
        info!(barcode, status = %item_dto.item_status, fine = %fine_amount,
            reserved_patron_id = reserved_patron_id.as_deref().unwrap_or_default(), "returned item");

        Ok(ReturnReport {
            fine_amount,
            item: item_dto,
            loan: closed.map(|l| LoanDto { version: l.version + 1, ..LoanDto::from(&l) }),
            patron: borrower,
            reserved_patron_id,
        })
    }

    async fn try_renew(&self, barcode: &str, patron_id: &str, snapshot: &PolicySnapshot) -> LibraryResult<LoanDto> {
        let item = self.load_item(barcode).await?;
        let loan = self.loan_repository.find_active_by_item(barcode).await?
            .filter(|l| l.patron_id == patron_id)
            .ok_or_else(|| LibraryError::not_found("active loan not found"))?;
        if let Some(max_renewals) = self.config.max_renewals {
            if loan.renewal_count >= max_renewals {
                return Err(LibraryError::precondition(
                    "renewal limit reached", Some(RENEWAL_LIMIT_REACHED.to_string())));
            }
        }
        let patron = self.load_patron(patron_id).await?;
        let policy = snapshot.resolve(patron.patron_group, item.material_type.as_str());

        let now = self.clock.now();
        let mut renewed = loan.clone();
        renewed.renew(now, policy.loan_days);
        let dto = LoanDto { version: loan.version + 1, ..LoanDto::from(&renewed) };
        let mut changes = ChangeSet::new();
        changes.push(Mutation::UpdateLoan(renewed))
            .emit(DomainEvent::updated("loan_renewed", CIRCULATION_GROUP, barcode,
                                       &metadata(&[("patron_id", patron_id)]), &dto)?);
        self.commit_and_publish(&changes).await?;
        info!(barcode, patron_id, renewal_count = dto.renewal_count,
            due_at = format_date(dto.due_at).as_str(), "renewed loan");
        Ok(dto)
    }

    async fn try_place_hold(&self, patron_id: &str, barcode: &str) -> LibraryResult<HoldDto> {
        let patron = self.load_patron(patron_id).await?;
        ensure_not_blocked(&patron)?;
        let item = self.load_item(barcode).await?;
        match item.item_status {
            ItemStatus::Available => {
                return Err(LibraryError::precondition(
                    "item is available for checkout", Some(HOLD_NOT_ALLOWED.to_string())));
            }
            ItemStatus::Lost => {
                return Err(LibraryError::precondition(
                    format!("status {}", item.item_status).as_str(), Some(HOLD_NOT_ALLOWED.to_string())));
            }
            _ => {}
        }
        if let Some(loan) = self.loan_repository.find_active_by_item(barcode).await? {
            if loan.patron_id == patron_id {
                return Err(LibraryError::precondition(
                    "item is already on loan to the patron", Some(HOLD_NOT_ALLOWED.to_string())));
            }
        }
        let patron_holds = self.hold_queue.active_for_patron(patron_id).await?;
        if patron_holds.iter().any(|h| h.item_barcode == barcode) {
            return Err(LibraryError::duplicate_key(
                format!("patron {} already holds item {}", patron_id, barcode).as_str()));
        }
        if patron_holds.len() >= self.config.max_holds {
            return Err(LibraryError::precondition(
                "hold limit reached", Some(HOLD_LIMIT_REACHED.to_string())));
        }

        let now = self.clock.now();
        let hold = self.hold_queue.enqueue(barcode, patron_id, now);
        let dto = HoldDto::from(&hold);
        // the item row carries the version check against concurrent returns
        let mut touched = item.clone();
        touched.updated_at = now;
        let mut changes = ChangeSet::new();
        changes.push(Mutation::UpdateItem(touched))
            .push(Mutation::CreateHold(hold))
            .emit(DomainEvent::added("hold_placed", HOLDS_GROUP, barcode,
                                     &metadata(&[("patron_id", patron_id)]), &dto)?);
        self.commit_and_publish(&changes).await?;
        info!(barcode, patron_id, hold_id = dto.hold_id.as_str(), "placed hold");
        Ok(dto)
    }

    async fn try_cancel_hold(&self, patron_id: &str, barcode: &str) -> LibraryResult<HoldDto> {
        let item = self.load_item(barcode).await?;
        let holds = self.hold_queue.active_for_item(barcode).await?;
        let hold = holds.iter()
            .find(|h| h.patron_id == patron_id)
            .cloned()
            .ok_or_else(|| LibraryError::not_found("active hold not found"))?;

        let now = self.clock.now();
        let mut canceled = hold.clone();
        canceled.close(HoldStatus::Canceled, now);
        let dto = HoldDto { version: hold.version + 1, ..HoldDto::from(&canceled) };
        let mut updated = item.clone();
        updated.updated_at = now;
        let mut changes = ChangeSet::new();
        if holds.len() == 1 {
            updated.item_status = transition(item.item_status, ItemEvent::ReservationReleased)?;
        } else if item.item_status == ItemStatus::Held && holds[0].hold_id == hold.hold_id {
            // the copy passes to the next in line
            changes.push(Mutation::UpdateHold(self.hold_queue.reserve(&holds[1], now)));
        }
        changes.push(Mutation::UpdateHold(canceled))
            .push(Mutation::UpdateItem(updated))
            .emit(DomainEvent::deleted("hold_canceled", HOLDS_GROUP, barcode,
                                       &metadata(&[("patron_id", patron_id)]), &dto)?);
        self.commit_and_publish(&changes).await?;
        info!(barcode, patron_id, hold_id = dto.hold_id.as_str(), remaining = holds.len() - 1, "canceled hold");
        Ok(dto)
    }

    async fn try_expire_item(&self, barcode: &str, now: NaiveDateTime) -> LibraryResult<usize> {
        let item = match self.item_repository.get(barcode).await {
            Ok(item) => Some(item),
            Err(LibraryError::NotFound { .. }) => None,
            Err(err) => { return Err(err); }
        };
        let (expired, remaining): (Vec<_>, Vec<_>) = self.hold_queue.active_for_item(barcode).await?
            .into_iter()
            .partition(|h| h.is_expired(now));
        if expired.is_empty() {
            return Ok(0);
        }

        let mut changes = ChangeSet::new();
        for hold in expired.iter() {
            let mut closed = hold.clone();
            closed.close(HoldStatus::Expired, now);
            changes.emit(DomainEvent::updated("hold_expired", HOLDS_GROUP, barcode,
                                              &metadata(&[("patron_id", hold.patron_id.as_str())]),
                                              &HoldDto::from(&closed))?);
            changes.push(Mutation::UpdateHold(closed));
        }
        match item {
            Some(item) => {
                let mut updated = item.clone();
                updated.updated_at = now;
                match remaining.first() {
                    None => {
                        updated.item_status = transition(item.item_status, ItemEvent::ReservationReleased)?;
                    }
                    Some(next) if item.item_status == ItemStatus::Held && next.expires_at.is_none() => {
                        changes.push(Mutation::UpdateHold(self.hold_queue.reserve(next, now)));
                    }
                    Some(_) => {}
                }
                changes.push(Mutation::UpdateItem(updated));
            }
            None => {
                warn!(barcode, "expiring holds of a missing item");
            }
        }
        self.commit_and_publish(&changes).await?;
        info!(barcode, expired = expired.len(), remaining = remaining.len(), "expired holds of item");
        Ok(expired.len())
    }
}

#[async_trait]
impl CirculationService for CirculationServiceImpl {
    async fn checkout(&self, patron_id: &str, barcodes: &[String]) -> LibraryResult<CheckoutReport> {
        let patron = self.load_patron(patron_id).await?;
        ensure_not_blocked(&patron)?;
        let snapshot = self.rule_service.snapshot().await?;

        let mut report = CheckoutReport {
            patron_id: patron_id.to_string(),
            processed: 0,
            loans: vec![],
            errors: vec![],
        };
        for barcode in barcodes {
            let res = self.retry.run("checkout", barcode.as_str(), || {
                self.try_checkout_item(&patron, barcode.as_str(), &snapshot)
            }).await;
            match res {
                Ok(loan) => {
                    report.processed += 1;
                    report.loans.push(LoanDto::from(&loan));
                }
                Err(err) => {
                    warn!(barcode = barcode.as_str(), patron_id, error = %err, "checkout of item failed");
                    report.errors.push(CirculationFailure::new(barcode, &err));
                }
            }
        }
        Ok(report)
    }

    async fn return_item(&self, barcode: &str) -> LibraryResult<ReturnReport> {
        let snapshot = self.rule_service.snapshot().await?;
        self.retry.run("return", barcode, || self.try_return(barcode, &snapshot)).await
    }

    async fn renew(&self, barcode: &str, patron_id: &str) -> LibraryResult<LoanDto> {
        let snapshot = self.rule_service.snapshot().await?;
        self.retry.run("renew", barcode, || self.try_renew(barcode, patron_id, &snapshot)).await
    }

    async fn place_hold(&self, patron_id: &str, barcode: &str) -> LibraryResult<HoldDto> {
        self.retry.run("place_hold", barcode, || self.try_place_hold(patron_id, barcode)).await
    }

    async fn cancel_hold(&self, patron_id: &str, barcode: &str) -> LibraryResult<HoldDto> {
        self.retry.run("cancel_hold", barcode, || self.try_cancel_hold(patron_id, barcode)).await
    }

    async fn expire_holds(&self) -> LibraryResult<ExpireHoldsReport> {
        let now = self.clock.now();
        let barcodes: BTreeSet<String> = self.hold_queue.expired(now).await?
            .into_iter()
            .map(|h| h.item_barcode)
            .collect();
        let mut report = ExpireHoldsReport::default();
        for barcode in barcodes {
            match self.retry.run("expire_holds", barcode.as_str(), || self.try_expire_item(barcode.as_str(), now)).await {
                Ok(count) => { report.expired += count; }
                Err(err) => {
                    warn!(barcode = barcode.as_str(), error = %err, "failed to expire holds of item");
                    report.errors.push(CirculationFailure::new(barcode.as_str(), &err));
                }
            }
        }
        info!(expired = report.expired, failed = report.errors.len(), "hold expiry sweep finished");
        Ok(report)
    }

    async fn expired_holds(&self) -> LibraryResult<Vec<HoldDto>> {
        let holds = self.hold_queue.expired(self.clock.now()).await?;
        Ok(holds.iter().map(HoldDto::from).collect())
    }
}
