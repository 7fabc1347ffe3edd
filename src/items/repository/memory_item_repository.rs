use async_trait::async_trait;
use crate::core::library::{ItemStatus, LibraryResult};
use crate::items::domain::model::ItemEntity;
use crate::items::repository::ItemRepository;
use crate::utils::memory::MemoryRepository;

#[async_trait]
impl ItemRepository for MemoryRepository<ItemEntity> {
    async fn find_by_status(&self, status: ItemStatus) -> LibraryResult<Vec<ItemEntity>> {
        let tables = self.db().read().await;
        let mut items: Vec<ItemEntity> = tables.items.values()
            .filter(|i| i.item_status == status)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.material_type.cmp(&b.material_type).then(a.barcode.cmp(&b.barcode)));
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use crate::core::library::ItemStatus;
    use crate::core::repository::Repository;
    use crate::items::domain::model::ItemEntity;
    use crate::items::repository::ItemRepository;
    use crate::utils::memory::{MemoryDatabase, MemoryRepository};

    #[tokio::test]
    async fn test_should_find_by_status() {
        let repo = MemoryRepository::<ItemEntity>::new(MemoryDatabase::new());
        let now = Utc::now().naive_utc();
        repo.create(&ItemEntity::new("B-1", "Dune", "REGULAR", ItemStatus::Available, now)).await.expect("should create");
        repo.create(&ItemEntity::new("B-2", "Emma", "REGULAR", ItemStatus::Lost, now)).await.expect("should create");
        repo.create(&ItemEntity::new("B-3", "Ulysses", "REFERENCE", ItemStatus::Available, now)).await.expect("should create");
        let available = repo.find_by_status(ItemStatus::Available).await.expect("should find");
        assert_eq!(vec!["B-3", "B-1"], available.iter().map(|i| i.barcode.as_str()).collect::<Vec<_>>());
    }
}
