use async_trait::async_trait;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::{ChangeSet, Mutation, UnitOfWork};
use crate::utils::memory::{check_version, MemoryDatabase, MemoryTable, replace_versioned, Tables};

// MemoryUnitOfWork validates and applies a change set inside one write-lock critical section.
#[derive(Debug, Clone)]
pub(crate) struct MemoryUnitOfWork {
    db: MemoryDatabase,
}

impl MemoryUnitOfWork {
    pub(crate) fn new(db: MemoryDatabase) -> Self {
        Self { db }
    }
}

fn check_absent<E: MemoryTable>(tables: &Tables, entity: &E) -> LibraryResult<()> {
    if E::table(tables).contains_key(entity.id().as_str()) {
        return Err(LibraryError::conflict(
            format!("{} {} already exists", E::NAME, entity.id()).as_str(), None));
    }
    Ok(())
}

fn validate(tables: &Tables, mutation: &Mutation) -> LibraryResult<()> {
    match mutation {
        Mutation::UpdateItem(item) => check_version(tables, item),
        Mutation::UpdatePatron(patron) => check_version(tables, patron),
        Mutation::CreateLoan(loan) => check_absent(tables, loan),
        Mutation::UpdateLoan(loan) => check_version(tables, loan),
        Mutation::CreateHold(hold) => check_absent(tables, hold),
        Mutation::UpdateHold(hold) => check_version(tables, hold),
        Mutation::AppendTransaction(tx) => check_absent(tables, tx),
    }
}

fn apply(tables: &mut Tables, mutation: &Mutation) {
    match mutation {
        Mutation::UpdateItem(item) => replace_versioned(tables, item),
        Mutation::UpdatePatron(patron) => replace_versioned(tables, patron),
        Mutation::CreateLoan(loan) => { tables.loans.insert(loan.loan_id.to_string(), loan.clone()); }
        Mutation::UpdateLoan(loan) => replace_versioned(tables, loan),
        Mutation::CreateHold(hold) => { tables.holds.insert(hold.hold_id.to_string(), hold.clone()); }
        Mutation::UpdateHold(hold) => replace_versioned(tables, hold),
        Mutation::AppendTransaction(tx) => { tables.transactions.insert(tx.transaction_id.to_string(), tx.clone()); }
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn commit(&self, changes: &ChangeSet) -> LibraryResult<usize> {
        let mut tables = self.db.write().await;
        for mutation in changes.mutations.iter() {
            validate(&tables, mutation)?;
        }
        for mutation in changes.mutations.iter() {
            apply(&mut tables, mutation);
        }
        Ok(changes.len())
    }
}
