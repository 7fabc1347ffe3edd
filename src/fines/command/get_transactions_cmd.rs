use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::fines::domain::LedgerService;
use crate::fines::dto::TransactionDto;

pub(crate) struct GetTransactionsCommand {
    ledger_service: Arc<dyn LedgerService>,
}

impl GetTransactionsCommand {
    pub(crate) fn new(ledger_service: Arc<dyn LedgerService>) -> Self {
        Self {
            ledger_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GetTransactionsCommandRequest {
    pub patron_id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct GetTransactionsCommandResponse {
    pub transactions: Vec<TransactionDto>,
}

impl GetTransactionsCommandResponse {
    pub fn new(transactions: Vec<TransactionDto>) -> Self {
        Self {
            transactions,
        }
    }
}

#[async_trait]
impl Command<GetTransactionsCommandRequest, GetTransactionsCommandResponse> for GetTransactionsCommand {
    async fn execute(&self, req: GetTransactionsCommandRequest) -> Result<GetTransactionsCommandResponse, CommandError> {
        self.ledger_service.patron_transactions(req.patron_id.as_str())
            .await.map_err(CommandError::from).map(GetTransactionsCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use rust_decimal::Decimal;
    use crate::core::command::Command;
    use crate::core::library::PatronGroup;
    use crate::fines::command::get_transactions_cmd::{GetTransactionsCommand, GetTransactionsCommandRequest};
    use crate::utils::testing::TestContext;

    #[tokio::test]
    async fn test_should_list_newest_first() {
        let ctx = TestContext::new().await;
        ctx.add_patron_with_fines("ST-001", PatronGroup::Student, Decimal::new(300, 2)).await;
        ctx.state.ledger.pay_fine("ST-001", Decimal::ONE, "LIB-1").await.expect("should pay");
        ctx.clock.advance(Duration::hours(1));
        ctx.state.ledger.waive_fine("ST-001", Decimal::ONE, "LIB-1", None).await.expect("should waive");

        let res = GetTransactionsCommand::new(ctx.state.ledger.clone())
            .execute(GetTransactionsCommandRequest { patron_id: "ST-001".to_string() }).await.expect("should list");
        assert_eq!(2, res.transactions.len());
        assert!(res.transactions[0].timestamp > res.transactions[1].timestamp);
    }
}
