use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::fines::domain::LedgerService;
use crate::fines::dto::LedgerSummaryDto;

pub(crate) struct GetSummaryCommand {
    ledger_service: Arc<dyn LedgerService>,
}

impl GetSummaryCommand {
    pub(crate) fn new(ledger_service: Arc<dyn LedgerService>) -> Self {
        Self {
            ledger_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GetSummaryCommandRequest {
    pub patron_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GetSummaryCommandResponse {
    pub summary: LedgerSummaryDto,
}

impl GetSummaryCommandResponse {
    pub fn new(summary: LedgerSummaryDto) -> Self {
        Self {
            summary,
        }
    }
}

#[async_trait]
impl Command<GetSummaryCommandRequest, GetSummaryCommandResponse> for GetSummaryCommand {
    async fn execute(&self, req: GetSummaryCommandRequest) -> Result<GetSummaryCommandResponse, CommandError> {
        self.ledger_service.summary(req.patron_id.as_deref())
            .await.map_err(CommandError::from).map(GetSummaryCommandResponse::new)
    }
}
