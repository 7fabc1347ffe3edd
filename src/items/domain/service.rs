use std::sync::Arc;
use async_trait::async_trait;
use tracing::info;
use crate::core::library::{ItemStatus, LibraryError, LibraryResult};
use crate::items::domain::ItemService;
use crate::items::domain::model::ItemEntity;
use crate::items::dto::ItemDto;
use crate::items::repository::ItemRepository;
use crate::utils::date::Clock;

pub(crate) struct ItemServiceImpl {
    item_repository: Arc<dyn ItemRepository>,
    clock: Arc<dyn Clock>,
}

impl ItemServiceImpl {
    pub(crate) fn new(item_repository: Arc<dyn ItemRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            item_repository,
            clock,
        }
    }
}

#[async_trait]
impl ItemService for ItemServiceImpl {
    async fn add_item(&self, barcode: &str, title: &str, material_type: &str, status: ItemStatus) -> LibraryResult<ItemDto> {
        if barcode.trim().is_empty() || material_type.trim().is_empty() {
            return Err(LibraryError::validation("barcode and material type are required", Some("400".to_string())));
        }
        // LOANED and HELD are only reached through circulation
        if matches!(status, ItemStatus::Loaned | ItemStatus::Held) {
            return Err(LibraryError::validation(
                format!("item cannot be added as {}", status).as_str(), Some("400".to_string())));
        }
        let item = ItemEntity::new(barcode.trim(), title, material_type.trim(), status, self.clock.now());
        self.item_repository.create(&item).await?;
        info!(barcode = item.barcode.as_str(), material_type = item.material_type.as_str(), status = %status, "added item");
        Ok(ItemDto::from(&item))
    }

    async fn find_item_by_barcode(&self, barcode: &str) -> LibraryResult<ItemDto> {
        let item = self.item_repository.get(barcode).await?;
        Ok(ItemDto::from(&item))
    }

    async fn find_items_by_status(&self, status: ItemStatus) -> LibraryResult<Vec<ItemDto>> {
        let items = self.item_repository.find_by_status(status).await?;
        Ok(items.iter().map(ItemDto::from).collect())
    }
}
