use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::loans::domain::LoanLedger;
use crate::loans::dto::LoanDto;

pub(crate) struct GetLoansCommand {
    loan_ledger: Arc<dyn LoanLedger>,
}

impl GetLoansCommand {
    pub(crate) fn new(loan_ledger: Arc<dyn LoanLedger>) -> Self {
        Self {
            loan_ledger,
        }
    }
}

// without a patron it lists every open loan
#[derive(Debug, Deserialize)]
pub(crate) struct GetLoansCommandRequest {
    pub patron_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GetLoansCommandResponse {
    pub loans: Vec<LoanDto>,
}

impl GetLoansCommandResponse {
    pub fn new(loans: Vec<LoanDto>) -> Self {
        Self {
            loans,
        }
    }
}

#[async_trait]
impl Command<GetLoansCommandRequest, GetLoansCommandResponse> for GetLoansCommand {
    async fn execute(&self, req: GetLoansCommandRequest) -> Result<GetLoansCommandResponse, CommandError> {
        let loans = match req.patron_id {
            Some(patron_id) => self.loan_ledger.patron_loans(patron_id.as_str()).await,
            None => self.loan_ledger.active_loans().await,
        };
        loans.map_err(CommandError::from).map(GetLoansCommandResponse::new)
    }
}
