use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::items::domain::ItemService;
use crate::items::dto::ItemDto;

pub(crate) struct GetItemCommand {
    item_service: Arc<dyn ItemService>,
}

impl GetItemCommand {
    pub(crate) fn new(item_service: Arc<dyn ItemService>) -> Self {
        Self {
            item_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GetItemCommandRequest {
    pub barcode: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct GetItemCommandResponse {
    pub item: ItemDto,
}

impl GetItemCommandResponse {
    pub fn new(item: ItemDto) -> Self {
        Self {
            item,
        }
    }
}

#[async_trait]
impl Command<GetItemCommandRequest, GetItemCommandResponse> for GetItemCommand {
    async fn execute(&self, req: GetItemCommandRequest) -> Result<GetItemCommandResponse, CommandError> {
        self.item_service.find_item_by_barcode(req.barcode.as_str())
            .await.map_err(CommandError::from).map(GetItemCommandResponse::new)
    }
}
