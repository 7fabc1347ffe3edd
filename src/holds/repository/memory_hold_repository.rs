use async_trait::async_trait;
use chrono::NaiveDateTime;
use crate::core::library::LibraryResult;
use crate::holds::domain::model::HoldEntity;
use crate::holds::repository::{HoldRepository, queue_order};
use crate::utils::memory::MemoryRepository;

impl MemoryRepository<HoldEntity> {
    async fn active_where<F: Fn(&HoldEntity) -> bool>(&self, pred: F) -> Vec<HoldEntity> {
        let tables = self.db().read().await;
        let mut holds: Vec<HoldEntity> = tables.holds.values()
            .filter(|h| h.is_active() && pred(h))
            .cloned()
            .collect();
        queue_order(&mut holds);
        holds
    }
}

#[async_trait]
impl HoldRepository for MemoryRepository<HoldEntity> {
    async fn find_active_by_item(&self, item_barcode: &str) -> LibraryResult<Vec<HoldEntity>> {
        Ok(self.active_where(|h| h.item_barcode == item_barcode).await)
    }

    async fn find_active_by_patron(&self, patron_id: &str) -> LibraryResult<Vec<HoldEntity>> {
        Ok(self.active_where(|h| h.patron_id == patron_id).await)
    }

    async fn find_expired(&self, now: NaiveDateTime) -> LibraryResult<Vec<HoldEntity>> {
        Ok(self.active_where(|h| h.is_expired(now)).await)
    }
}
