use std::sync::Arc;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::fines::domain::LedgerService;
use crate::fines::dto::LedgerReceiptDto;

pub(crate) struct WaiveFineCommand {
    ledger_service: Arc<dyn LedgerService>,
}

impl WaiveFineCommand {
    pub(crate) fn new(ledger_service: Arc<dyn LedgerService>) -> Self {
        Self {
            ledger_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WaiveFineCommandRequest {
    #[serde(default)]
    pub patron_id: String,
    pub amount: Decimal,
    pub actor_id: String,
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct WaiveFineCommandResponse {
    pub receipt: LedgerReceiptDto,
}

impl WaiveFineCommandResponse {
    pub fn new(receipt: LedgerReceiptDto) -> Self {
        Self {
            receipt,
        }
    }
}

#[async_trait]
impl Command<WaiveFineCommandRequest, WaiveFineCommandResponse> for WaiveFineCommand {
    async fn execute(&self, req: WaiveFineCommandRequest) -> Result<WaiveFineCommandResponse, CommandError> {
        self.ledger_service.waive_fine(req.patron_id.as_str(), req.amount, req.actor_id.as_str(), req.note.as_deref())
            .await.map_err(CommandError::from).map(WaiveFineCommandResponse::new)
    }
}
