pub mod ddb_hold_repository;
pub mod memory_hold_repository;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;
use crate::holds::domain::model::HoldEntity;

#[async_trait]
pub(crate) trait HoldRepository: Repository<HoldEntity> {
    // active holds of the item in queue order
    async fn find_active_by_item(&self, item_barcode: &str) -> LibraryResult<Vec<HoldEntity>>;

    async fn find_active_by_patron(&self, patron_id: &str) -> LibraryResult<Vec<HoldEntity>>;

    // active holds whose expiry is before now
    async fn find_expired(&self, now: NaiveDateTime) -> LibraryResult<Vec<HoldEntity>>;
}

pub(crate) fn queue_order(holds: &mut [HoldEntity]) {
    holds.sort_by_key(|h| h.queue_key());
}
