use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::circulation::domain::CirculationService;
use crate::core::command::{Command, CommandError};
use crate::holds::dto::HoldDto;

pub(crate) struct CancelHoldCommand {
    circulation_service: Arc<dyn CirculationService>,
}

impl CancelHoldCommand {
    pub(crate) fn new(circulation_service: Arc<dyn CirculationService>) -> Self {
        Self {
            circulation_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CancelHoldCommandRequest {
    pub barcode: String,
    pub patron_id: String,
}

impl CancelHoldCommandRequest {
    pub fn new(barcode: &str, patron_id: &str) -> Self {
        Self {
            barcode: barcode.to_string(),
            patron_id: patron_id.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CancelHoldCommandResponse {
    pub hold: HoldDto,
}

impl CancelHoldCommandResponse {
    pub fn new(hold: HoldDto) -> Self {
        Self {
            hold,
        }
    }
}

#[async_trait]
impl Command<CancelHoldCommandRequest, CancelHoldCommandResponse> for CancelHoldCommand {
    async fn execute(&self, req: CancelHoldCommandRequest) -> Result<CancelHoldCommandResponse, CommandError> {
        self.circulation_service.cancel_hold(req.patron_id.as_str(), req.barcode.as_str())
            .await.map_err(CommandError::from).map(CancelHoldCommandResponse::new)
    }
}
