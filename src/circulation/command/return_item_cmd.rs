use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::circulation::domain::CirculationService;
use crate::circulation::dto::ReturnReport;
use crate::core::command::{Command, CommandError};

pub(crate) struct ReturnItemCommand {
    circulation_service: Arc<dyn CirculationService>,
}

impl ReturnItemCommand {
    pub(crate) fn new(circulation_service: Arc<dyn CirculationService>) -> Self {
        Self {
            circulation_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReturnItemCommandRequest {
    pub barcode: String,
}

impl ReturnItemCommandRequest {
    pub fn new(barcode: &str) -> Self {
        Self {
            barcode: barcode.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ReturnItemCommandResponse {
    pub report: ReturnReport,
}

impl ReturnItemCommandResponse {
    pub fn new(report: ReturnReport) -> Self {
        Self {
            report,
        }
    }
}

#[async_trait]
impl Command<ReturnItemCommandRequest, ReturnItemCommandResponse> for ReturnItemCommand {
    async fn execute(&self, req: ReturnItemCommandRequest) -> Result<ReturnItemCommandResponse, CommandError> {
        self.circulation_service.return_item(req.barcode.as_str())
            .await.map_err(CommandError::from).map(ReturnItemCommandResponse::new)
    }
}
