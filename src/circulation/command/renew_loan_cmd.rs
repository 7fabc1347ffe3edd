use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::circulation::domain::CirculationService;
use crate::core::command::{Command, CommandError};
use crate::loans::dto::LoanDto;

pub(crate) struct RenewLoanCommand {
    circulation_service: Arc<dyn CirculationService>,
}

impl RenewLoanCommand {
    pub(crate) fn new(circulation_service: Arc<dyn CirculationService>) -> Self {
        Self {
            circulation_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RenewLoanCommandRequest {
    #[serde(default)]
    pub barcode: String,
    pub patron_id: String,
}

impl RenewLoanCommandRequest {
    pub fn new(barcode: &str, patron_id: &str) -> Self {
        Self {
            barcode: barcode.to_string(),
            patron_id: patron_id.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RenewLoanCommandResponse {
    pub loan: LoanDto,
}

impl RenewLoanCommandResponse {
    pub fn new(loan: LoanDto) -> Self {
        Self {
            loan,
        }
    }
}

#[async_trait]
impl Command<RenewLoanCommandRequest, RenewLoanCommandResponse> for RenewLoanCommand {
    async fn execute(&self, req: RenewLoanCommandRequest) -> Result<RenewLoanCommandResponse, CommandError> {
        self.circulation_service.renew(req.barcode.as_str(), req.patron_id.as_str())
            .await.map_err(CommandError::from).map(RenewLoanCommandResponse::new)
    }
}
