pub mod ddb_unit_of_work;
pub mod memory_unit_of_work;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use rand::Rng;
use tracing::warn;
use crate::core::domain::Configuration;
use crate::core::events::DomainEvent;
use crate::core::library::LibraryResult;
use crate::core::repository::ddb_unit_of_work::DDBUnitOfWork;
use crate::core::repository::memory_unit_of_work::MemoryUnitOfWork;
use crate::fines::domain::model::TransactionEntity;
use crate::gateway::GatewayPublisherVia;
use crate::holds::domain::model::HoldEntity;
use crate::items::domain::model::ItemEntity;
use crate::loans::domain::model::LoanEntity;
use crate::patrons::domain::model::PatronEntity;
use crate::utils::ddb::build_db_client;
use crate::utils::memory::MemoryDatabase;

// Repository defines the single-row operations of a store. Creates fail with a duplicate key
// when the row exists; updates are conditioned on the version that was read and store
// version + 1.
#[async_trait]
pub trait Repository<Entity>: Sync + Send {
    // create an entity
    async fn create(&self, entity: &Entity) -> LibraryResult<usize>;

    // updates an entity
    async fn update(&self, entity: &Entity) -> LibraryResult<usize>;

    // get an entity
    async fn get(&self, id: &str) -> LibraryResult<Entity>;

    // delete an entity
    async fn delete(&self, id: &str) -> LibraryResult<usize>;
}

#[derive(Debug, Clone)]
pub(crate) enum RepositoryStore {
    DynamoDB,
    LocalDynamoDB,
    Memory(MemoryDatabase),
}

impl RepositoryStore {
    pub fn gateway_publisher(&self) -> GatewayPublisherVia {
        match self {
            RepositoryStore::DynamoDB => { GatewayPublisherVia::Sns }
            RepositoryStore::LocalDynamoDB => { GatewayPublisherVia::LocalDynamoDB }
            RepositoryStore::Memory(db) => { GatewayPublisherVia::Memory(db.clone()) }
        }
    }
}

// Mutation is one conditional write of a unit of work.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Mutation {
    UpdateItem(ItemEntity),
    UpdatePatron(PatronEntity),
    CreateLoan(LoanEntity),
    UpdateLoan(LoanEntity),
    CreateHold(HoldEntity),
    UpdateHold(HoldEntity),
    AppendTransaction(TransactionEntity),
}

impl Mutation {
    pub fn describe(&self) -> String {
        match self {
            Mutation::UpdateItem(item) => { format!("update item {}", item.barcode) }
            Mutation::UpdatePatron(patron) => { format!("update patron {}", patron.patron_id) }
            Mutation::CreateLoan(loan) => { format!("create loan {}", loan.loan_id) }
            Mutation::UpdateLoan(loan) => { format!("update loan {}", loan.loan_id) }
            Mutation::CreateHold(hold) => { format!("create hold {}", hold.hold_id) }
            Mutation::UpdateHold(hold) => { format!("update hold {}", hold.hold_id) }
            Mutation::AppendTransaction(tx) => { format!("append transaction {}", tx.transaction_id) }
        }
    }
}

// ChangeSet collects the mutations of one atomic operation together with the events that
// are published once the mutations are committed.
#[derive(Debug, Clone, Default)]
pub(crate) struct ChangeSet {
    pub mutations: Vec<Mutation>,
    pub events: Vec<DomainEvent>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mutation: Mutation) -> &mut Self {
        self.mutations.push(mutation);
        self
    }

    pub fn emit(&mut self, event: DomainEvent) -> &mut Self {
        self.events.push(event);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.mutations.len()
    }
}

// UnitOfWork applies every mutation of a change set or none of them. A stale version or an
// existing row surfaces as a concurrency conflict.
#[async_trait]
pub(crate) trait UnitOfWork: Sync + Send {
    async fn commit(&self, changes: &ChangeSet) -> LibraryResult<usize>;
}

pub(crate) async fn create_unit_of_work(store: &RepositoryStore) -> Arc<dyn UnitOfWork> {
    match store {
        RepositoryStore::DynamoDB | RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await;
            Arc::new(DDBUnitOfWork::new(client))
        }
        RepositoryStore::Memory(db) => {
            Arc::new(MemoryUnitOfWork::new(db.clone()))
        }
    }
}

// RetryPolicy re-runs a read-validate-commit attempt when it lost a race.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RetryPolicy {
    attempts: usize,
    backoff_millis: u64,
}

impl RetryPolicy {
    pub fn new(config: &Configuration) -> Self {
        Self {
            attempts: config.commit_attempts.max(1),
            backoff_millis: config.retry_backoff_millis,
        }
    }

    pub async fn run<T, F, Fut>(&self, operation: &str, key: &str, mut attempt: F) -> LibraryResult<T>
        where F: FnMut() -> Fut, Fut: Future<Output=LibraryResult<T>> {
        let mut tries = 0;
        loop {
            tries += 1;
            match attempt().await {
                Err(err) if err.is_conflict() && tries < self.attempts => {
                    warn!(operation, key, tries, error = %err, "lost a race, retrying");
                    tokio::time::sleep(self.backoff(tries)).await;
                }
                Err(err) if err.is_conflict() => {
                    warn!(operation, key, tries, error = %err, "giving up after conflicts");
                    return Err(err);
                }
                other => { return other; }
            }
        }
    }

    // exponential with full jitter on top of the base
    fn backoff(&self, tries: usize) -> Duration {
        let base = self.backoff_millis.saturating_mul(1 << tries.min(6));
        let jitter = if base > 0 { rand::thread_rng().gen_range(0..=base) } else { 0 };
        Duration::from_millis(base + jitter)
    }
}
