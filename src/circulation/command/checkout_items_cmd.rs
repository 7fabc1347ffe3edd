use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::circulation::domain::CirculationService;
use crate::circulation::dto::CheckoutReport;
use crate::core::command::{Command, CommandError};

pub(crate) struct CheckoutItemsCommand {
    circulation_service: Arc<dyn CirculationService>,
}

impl CheckoutItemsCommand {
    pub(crate) fn new(circulation_service: Arc<dyn CirculationService>) -> Self {
        Self {
            circulation_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CheckoutItemsCommandRequest {
    pub patron_id: String,
    pub barcodes: Vec<String>,
}

impl CheckoutItemsCommandRequest {
    pub fn new(patron_id: &str, barcodes: &[&str]) -> Self {
        Self {
            patron_id: patron_id.to_string(),
            barcodes: barcodes.iter().map(|b| b.to_string()).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CheckoutItemsCommandResponse {
    pub report: CheckoutReport,
}

impl CheckoutItemsCommandResponse {
    pub fn new(report: CheckoutReport) -> Self {
        Self {
            report,
        }
    }
}

#[async_trait]
impl Command<CheckoutItemsCommandRequest, CheckoutItemsCommandResponse> for CheckoutItemsCommand {
    async fn execute(&self, req: CheckoutItemsCommandRequest) -> Result<CheckoutItemsCommandResponse, CommandError> {
        if req.barcodes.is_empty() {
            return Err(CommandError::Validation {
                message: "no barcodes to check out".to_string(),
                reason_code: None,
            });
        }
        self.circulation_service.checkout(req.patron_id.as_str(), &req.barcodes)
            .await.map_err(CommandError::from).map(CheckoutItemsCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use crate::circulation::command::checkout_items_cmd::{CheckoutItemsCommand, CheckoutItemsCommandRequest};
    use crate::core::command::{Command, CommandError};
    use crate::core::library::PatronGroup;
    use crate::utils::testing::TestContext;

    #[tokio::test]
    async fn test_should_run_checkout_items() {
        let ctx = TestContext::new().await;
        ctx.add_patron("ST-001", PatronGroup::Student).await;
        ctx.add_item("B-1", "REGULAR").await;
        let cmd = CheckoutItemsCommand::new(ctx.state.circulation.clone());

        let res = cmd.execute(CheckoutItemsCommandRequest::new("ST-001", &["B-1", "B-2"])).await.expect("should checkout");
        assert_eq!(1, res.report.processed);
        assert_eq!("B-2", res.report.errors[0].barcode);
        assert!(matches!(cmd.execute(CheckoutItemsCommandRequest::new("ST-001", &[])).await,
            Err(CommandError::Validation { .. })));
        assert!(matches!(cmd.execute(CheckoutItemsCommandRequest::new("ST-404", &["B-1"])).await,
            Err(CommandError::NotFound { .. })));
    }
}
