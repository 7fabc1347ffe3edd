use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::loans::domain::LoanLedger;
use crate::loans::dto::OverdueLoanDto;

pub(crate) struct GetOverdueCommand {
    loan_ledger: Arc<dyn LoanLedger>,
}

impl GetOverdueCommand {
    pub(crate) fn new(loan_ledger: Arc<dyn LoanLedger>) -> Self {
        Self {
            loan_ledger,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GetOverdueCommandRequest {}

#[derive(Debug, Serialize)]
pub(crate) struct GetOverdueCommandResponse {
    pub overdue: Vec<OverdueLoanDto>,
}

impl GetOverdueCommandResponse {
    pub fn new(overdue: Vec<OverdueLoanDto>) -> Self {
        Self {
            overdue,
        }
    }
}

#[async_trait]
impl Command<GetOverdueCommandRequest, GetOverdueCommandResponse> for GetOverdueCommand {
    async fn execute(&self, _req: GetOverdueCommandRequest) -> Result<GetOverdueCommandResponse, CommandError> {
        self.loan_ledger.overdue_loans()
            .await.map_err(CommandError::from).map(GetOverdueCommandResponse::new)
    }
}
