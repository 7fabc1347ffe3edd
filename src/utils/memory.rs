use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use async_trait::async_trait;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use crate::core::domain::Identifiable;
use crate::core::events::DomainEvent;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::Repository;
use crate::fines::domain::model::TransactionEntity;
use crate::holds::domain::model::HoldEntity;
use crate::items::domain::model::ItemEntity;
use crate::loans::domain::model::LoanEntity;
use crate::patrons::domain::model::PatronEntity;
use crate::rules::domain::model::CirculationRuleEntity;

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub items: HashMap<String, ItemEntity>,
    pub patrons: HashMap<String, PatronEntity>,
    pub loans: HashMap<String, LoanEntity>,
    pub holds: HashMap<String, HoldEntity>,
    pub rules: HashMap<String, CirculationRuleEntity>,
    pub transactions: HashMap<String, TransactionEntity>,
    pub events: Vec<DomainEvent>,
}

// MemoryDatabase is a process local store shared by the in-memory repositories, the unit of
// work and the event publisher. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().await
    }
}

// MemoryTable maps an entity to its table.
pub(crate) trait MemoryTable: Identifiable + Clone + Sized + 'static {
    const NAME: &'static str;
    fn table(tables: &Tables) -> &HashMap<String, Self>;
    fn table_mut(tables: &mut Tables) -> &mut HashMap<String, Self>;
    fn set_version(&mut self, version: i64);
}

// insert_new stores a row that must not exist yet
pub(crate) fn insert_new<E: MemoryTable>(tables: &mut Tables, entity: &E) -> LibraryResult<()> {
    let table = E::table_mut(tables);
    if table.contains_key(entity.id().as_str()) {
        return Err(LibraryError::duplicate_key(
            format!("{} {} already exists", E::NAME, entity.id()).as_str()));
    }
    table.insert(entity.id(), entity.clone());
    Ok(())
}

// check_version verifies that the stored row still carries the version that was read
pub(crate) fn check_version<E: MemoryTable>(tables: &Tables, entity: &E) -> LibraryResult<()> {
    match E::table(tables).get(entity.id().as_str()) {
        Some(existing) if existing.version() == entity.version() => Ok(()),
        Some(existing) => Err(LibraryError::conflict(
            format!("{} {} version {} is stale, stored {}", E::NAME, entity.id(),
                    entity.version(), existing.version()).as_str(), None)),
        None => Err(LibraryError::conflict(
            format!("{} {} does not exist", E::NAME, entity.id()).as_str(), None)),
    }
}

// replace_versioned stores the row with the next version, the caller checked the version
pub(crate) fn replace_versioned<E: MemoryTable>(tables: &mut Tables, entity: &E) {
    let mut next = entity.clone();
    next.set_version(entity.version() + 1);
    E::table_mut(tables).insert(entity.id(), next);
}

// MemoryRepository implements the single-row operations for any entity of the memory tables;
// the finders of each context are implemented next to their trait.
#[derive(Debug, Clone)]
pub(crate) struct MemoryRepository<E> {
    db: MemoryDatabase,
    _entity: PhantomData<fn() -> E>,
}

impl<E> MemoryRepository<E> {
    pub(crate) fn new(db: MemoryDatabase) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    pub(crate) fn db(&self) -> &MemoryDatabase {
        &self.db
    }
}

#[async_trait]
impl<E: MemoryTable> Repository<E> for MemoryRepository<E> {
    async fn create(&self, entity: &E) -> LibraryResult<usize> {
        let mut tables = self.db.write().await;
        insert_new(&mut tables, entity).map(|_| 1)
    }

    async fn update(&self, entity: &E) -> LibraryResult<usize> {
        let mut tables = self.db.write().await;
        check_version(&tables, entity)?;
        replace_versioned(&mut tables, entity);
        Ok(1)
    }

    async fn get(&self, id: &str) -> LibraryResult<E> {
        let tables = self.db.read().await;
        E::table(&tables).get(id).cloned().ok_or_else(||
            LibraryError::not_found(format!("{} not found for {}", E::NAME, id).as_str()))
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        let mut tables = self.db.write().await;
        Ok(E::table_mut(&mut tables).remove(id).map(|_| 1).unwrap_or(0))
    }
}

impl MemoryTable for ItemEntity {
    const NAME: &'static str = "item";
    fn table(tables: &Tables) -> &HashMap<String, Self> { &tables.items }
    fn table_mut(tables: &mut Tables) -> &mut HashMap<String, Self> { &mut tables.items }
    fn set_version(&mut self, version: i64) { self.version = version; }
}

impl MemoryTable for PatronEntity {
    const NAME: &'static str = "patron";
    fn table(tables: &Tables) -> &HashMap<String, Self> { &tables.patrons }
    fn table_mut(tables: &mut Tables) -> &mut HashMap<String, Self> { &mut tables.patrons }
    fn set_version(&mut self, version: i64) { self.version = version; }
}

impl MemoryTable for LoanEntity {
    const NAME: &'static str = "loan";
    fn table(tables: &Tables) -> &HashMap<String, Self> { &tables.loans }
    fn table_mut(tables: &mut Tables) -> &mut HashMap<String, Self> { &mut tables.loans }
    fn set_version(&mut self, version: i64) { self.version = version; }
}

impl MemoryTable for HoldEntity {
    const NAME: &'static str = "hold";
    fn table(tables: &Tables) -> &HashMap<String, Self> { &tables.holds }
    fn table_mut(tables: &mut Tables) -> &mut HashMap<String, Self> { &mut tables.holds }
    fn set_version(&mut self, version: i64) { self.version = version; }
}

impl MemoryTable for CirculationRuleEntity {
    const NAME: &'static str = "rule";
    fn table(tables: &Tables) -> &HashMap<String, Self> { &tables.rules }
    fn table_mut(tables: &mut Tables) -> &mut HashMap<String, Self> { &mut tables.rules }
    fn set_version(&mut self, version: i64) { self.version = version; }
}

impl MemoryTable for TransactionEntity {
    const NAME: &'static str = "transaction";
    fn table(tables: &Tables) -> &HashMap<String, Self> { &tables.transactions }
    fn table_mut(tables: &mut Tables) -> &mut HashMap<String, Self> { &mut tables.transactions }
    fn set_version(&mut self, version: i64) { self.version = version; }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use crate::core::library::{ItemStatus, LibraryError};
    use crate::core::repository::Repository;
    use crate::items::domain::model::ItemEntity;
    use crate::utils::memory::{MemoryDatabase, MemoryRepository};

    #[tokio::test]
    async fn test_should_create_get_update_delete() {
        let repo = MemoryRepository::<ItemEntity>::new(MemoryDatabase::new());
        let item = ItemEntity::new("B-1", "Dune", "REGULAR", ItemStatus::Available, Utc::now().naive_utc());
        assert_eq!(1, repo.create(&item).await.expect("should create item"));
        assert!(matches!(repo.create(&item).await, Err(LibraryError::DuplicateKey { .. })));

        let mut loaded = repo.get("B-1").await.expect("should get item");
        loaded.item_status = ItemStatus::Lost;
        assert_eq!(1, repo.update(&loaded).await.expect("should update item"));
        let updated = repo.get("B-1").await.expect("should get item");
        assert_eq!(1, updated.version);
        assert_eq!(ItemStatus::Lost, updated.item_status);

        // the version that was read is stale now
        assert!(repo.update(&loaded).await.expect_err("should reject stale").is_conflict());

        assert_eq!(1, repo.delete("B-1").await.expect("should delete item"));
        assert!(matches!(repo.get("B-1").await, Err(LibraryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_should_share_tables_between_clones() {
        let db = MemoryDatabase::new();
        let repo = MemoryRepository::<ItemEntity>::new(db.clone());
        let item = ItemEntity::new("B-2", "Emma", "REGULAR", ItemStatus::Available, Utc::now().naive_utc());
        repo.create(&item).await.expect("should create item");
        assert_eq!(1, db.read().await.items.len());
    }
}
