use std::sync::Arc;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::fines::domain::LedgerService;
use crate::fines::dto::LedgerReceiptDto;

pub(crate) struct PayFineCommand {
    ledger_service: Arc<dyn LedgerService>,
}

impl PayFineCommand {
    pub(crate) fn new(ledger_service: Arc<dyn LedgerService>) -> Self {
        Self {
            ledger_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PayFineCommandRequest {
    #[serde(default)]
    pub patron_id: String,
    pub amount: Decimal,
    pub actor_id: String,
}

impl PayFineCommandRequest {
    pub fn new(patron_id: &str, amount: Decimal, actor_id: &str) -> Self {
        Self {
            patron_id: patron_id.to_string(),
            amount,
            actor_id: actor_id.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PayFineCommandResponse {
    pub receipt: LedgerReceiptDto,
}

impl PayFineCommandResponse {
    pub fn new(receipt: LedgerReceiptDto) -> Self {
        Self {
            receipt,
        }
    }
}

#[async_trait]
impl Command<PayFineCommandRequest, PayFineCommandResponse> for PayFineCommand {
    async fn execute(&self, req: PayFineCommandRequest) -> Result<PayFineCommandResponse, CommandError> {
        self.ledger_service.pay_fine(req.patron_id.as_str(), req.amount, req.actor_id.as_str())
            .await.map_err(CommandError::from).map(PayFineCommandResponse::new)
    }
}
