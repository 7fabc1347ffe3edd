pub mod model;
pub mod service;
pub mod state;

use async_trait::async_trait;
use crate::core::library::{ItemStatus, LibraryResult};
use crate::items::dto::ItemDto;

#[async_trait]
pub(crate) trait ItemService: Sync + Send {
    // registers a copy; only AVAILABLE, PROCESSING or LOST can be given at intake
    async fn add_item(&self, barcode: &str, title: &str, material_type: &str, status: ItemStatus) -> LibraryResult<ItemDto>;
    async fn find_item_by_barcode(&self, barcode: &str) -> LibraryResult<ItemDto>;
    async fn find_items_by_status(&self, status: ItemStatus) -> LibraryResult<Vec<ItemDto>>;
}
