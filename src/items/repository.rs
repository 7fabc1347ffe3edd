pub mod ddb_item_repository;
pub mod memory_item_repository;

use async_trait::async_trait;
use crate::core::library::{ItemStatus, LibraryResult};
use crate::core::repository::Repository;
use crate::items::domain::model::ItemEntity;

#[async_trait]
pub(crate) trait ItemRepository: Repository<ItemEntity> {
    async fn find_by_status(&self, status: ItemStatus) -> LibraryResult<Vec<ItemEntity>>;
}
