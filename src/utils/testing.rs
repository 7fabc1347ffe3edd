use std::sync::Arc;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use crate::core::controller::AppState;
use crate::core::domain::Configuration;
use crate::core::library::{ItemStatus, PatronGroup};
use crate::core::repository::{Repository, RepositoryStore};
use crate::fines::domain::model::TransactionEntity;
use crate::holds::domain::model::HoldEntity;
use crate::items::domain::model::ItemEntity;
use crate::loans::domain::model::LoanEntity;
use crate::patrons::domain::model::PatronEntity;
use crate::rules::domain::model::CirculationRuleEntity;
use crate::utils::date::{Clock, FixedClock};
use crate::utils::memory::{MemoryDatabase, MemoryRepository};

// TestContext wires the services against one memory database and a settable clock.
pub(crate) struct TestContext {
    pub state: AppState,
    pub db: MemoryDatabase,
    pub clock: FixedClock,
}

pub(crate) fn start_of_test() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 9, 1)
        .and_then(|d| d.and_hms_opt(10, 0, 0))
        .expect("valid start date")
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_config(Configuration::new("test")).await
    }

    pub async fn with_config(config: Configuration) -> Self {
        let db = MemoryDatabase::new();
        let clock = FixedClock::at(start_of_test());
        let state = AppState::new(config, RepositoryStore::Memory(db.clone()), Arc::new(clock.clone())).await;
        Self { state, db, clock }
    }

    pub fn clock_now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub async fn add_item(&self, barcode: &str, material_type: &str) -> ItemEntity {
        self.add_item_with_status(barcode, material_type, ItemStatus::Available).await
    }

    // bypasses the item service so that any status can be seeded
    pub async fn add_item_with_status(&self, barcode: &str, material_type: &str, status: ItemStatus) -> ItemEntity {
        let item = ItemEntity::new(barcode, format!("Title {}", barcode).as_str(), material_type, status, self.clock_now());
        MemoryRepository::<ItemEntity>::new(self.db.clone()).create(&item).await.expect("should seed item");
        item
    }

    pub async fn add_patron(&self, patron_id: &str, group: PatronGroup) -> PatronEntity {
        self.add_patron_with_fines(patron_id, group, Decimal::ZERO).await
    }

    pub async fn add_patron_with_fines(&self, patron_id: &str, group: PatronGroup, fines: Decimal) -> PatronEntity {
        let mut patron = PatronEntity::new(patron_id, format!("Patron {}", patron_id).as_str(), group, self.clock_now());
        patron.fines = fines;
        MemoryRepository::<PatronEntity>::new(self.db.clone()).create(&patron).await.expect("should seed patron");
        patron
    }

    pub async fn save_patron(&self, patron: &PatronEntity) {
        MemoryRepository::<PatronEntity>::new(self.db.clone()).update(patron).await.expect("should save patron");
    }

    pub async fn add_rule(&self, group: PatronGroup, material_type: &str, loan_days: i64, fine_per_day: Decimal) {
        let rule = CirculationRuleEntity::new(group, material_type, loan_days, 5, fine_per_day);
        self.state.rules.save_rule(&rule).await.expect("should save rule");
    }

    // an active hold written without touching the item
    pub async fn add_stray_hold(&self, barcode: &str, patron_id: &str) -> HoldEntity {
        let now = self.clock_now();
        let hold = HoldEntity::new("test", barcode, patron_id, 1, now, None);
        MemoryRepository::<HoldEntity>::new(self.db.clone()).create(&hold).await.expect("should seed hold");
        hold
    }

    pub async fn item(&self, barcode: &str) -> ItemEntity {
        MemoryRepository::<ItemEntity>::new(self.db.clone()).get(barcode).await.expect("should get item")
    }

    pub async fn patron(&self, patron_id: &str) -> PatronEntity {
        MemoryRepository::<PatronEntity>::new(self.db.clone()).get(patron_id).await.expect("should get patron")
    }

    pub async fn loans(&self) -> Vec<LoanEntity> {
        let mut loans: Vec<LoanEntity> = self.db.read().await.loans.values().cloned().collect();
        loans.sort_by(|a, b| a.issued_at.cmp(&b.issued_at));
        loans
    }

    pub async fn holds(&self) -> Vec<HoldEntity> {
        let mut holds: Vec<HoldEntity> = self.db.read().await.holds.values().cloned().collect();
        holds.sort_by_key(|h| h.queue_key());
        holds
    }

    pub async fn transactions(&self) -> Vec<TransactionEntity> {
        let mut txs: Vec<TransactionEntity> = self.db.read().await.transactions.values().cloned().collect();
        txs.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        txs
    }

    pub async fn event_names(&self) -> Vec<String> {
        self.db.read().await.events.iter().map(|e| e.name.to_string()).collect()
    }
}
