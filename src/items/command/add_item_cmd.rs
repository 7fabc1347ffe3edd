use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::core::library::ItemStatus;
use crate::items::domain::ItemService;
use crate::items::dto::ItemDto;

pub(crate) struct AddItemCommand {
    item_service: Arc<dyn ItemService>,
}

impl AddItemCommand {
    pub(crate) fn new(item_service: Arc<dyn ItemService>) -> Self {
        Self {
            item_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddItemCommandRequest {
    pub barcode: String,
    pub title: String,
    pub material_type: String,
    pub item_status: Option<ItemStatus>,
}

impl AddItemCommandRequest {
    pub fn new(barcode: &str, title: &str, material_type: &str) -> Self {
        Self {
            barcode: barcode.to_string(),
            title: title.to_string(),
            material_type: material_type.to_string(),
            item_status: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AddItemCommandResponse {
    pub item: ItemDto,
}

impl AddItemCommandResponse {
    pub fn new(item: ItemDto) -> Self {
        Self {
            item,
        }
    }
}

#[async_trait]
impl Command<AddItemCommandRequest, AddItemCommandResponse> for AddItemCommand {
    async fn execute(&self, req: AddItemCommandRequest) -> Result<AddItemCommandResponse, CommandError> {
        let status = req.item_status.unwrap_or(ItemStatus::Available);
        self.item_service.add_item(req.barcode.as_str(), req.title.as_str(), req.material_type.as_str(), status)
            .await.map_err(CommandError::from).map(AddItemCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::command::Command;
    use crate::core::library::ItemStatus;
    use crate::items::command::add_item_cmd::{AddItemCommand, AddItemCommandRequest};
    use crate::utils::testing::TestContext;

    #[tokio::test]
    async fn test_should_run_add_item() {
        let ctx = TestContext::new().await;
        let cmd = AddItemCommand::new(ctx.state.items.clone());

        let res = cmd.execute(AddItemCommandRequest::new("B-200", "Middlemarch", "REGULAR")).await.expect("should add item");
        assert_eq!(ItemStatus::Available, res.item.item_status);
    }
}
