use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::circulation::domain::CirculationService;
use crate::core::command::{Command, CommandError};
use crate::holds::dto::HoldDto;

pub(crate) struct PlaceHoldCommand {
    circulation_service: Arc<dyn CirculationService>,
}

impl PlaceHoldCommand {
    pub(crate) fn new(circulation_service: Arc<dyn CirculationService>) -> Self {
        Self {
            circulation_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaceHoldCommandRequest {
    #[serde(default)]
    pub barcode: String,
    pub patron_id: String,
}

impl PlaceHoldCommandRequest {
    pub fn new(barcode: &str, patron_id: &str) -> Self {
        Self {
            barcode: barcode.to_string(),
            patron_id: patron_id.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PlaceHoldCommandResponse {
    pub hold: HoldDto,
}

impl PlaceHoldCommandResponse {
    pub fn new(hold: HoldDto) -> Self {
        Self {
            hold,
        }
    }
}

#[async_trait]
impl Command<PlaceHoldCommandRequest, PlaceHoldCommandResponse> for PlaceHoldCommand {
    async fn execute(&self, req: PlaceHoldCommandRequest) -> Result<PlaceHoldCommandResponse, CommandError> {
        self.circulation_service.place_hold(req.patron_id.as_str(), req.barcode.as_str())
            .await.map_err(CommandError::from).map(PlaceHoldCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use crate::circulation::command::place_hold_cmd::{PlaceHoldCommand, PlaceHoldCommandRequest};
    use crate::core::command::{Command, CommandError};
    use crate::core::library::{HoldStatus, PatronGroup};
    use crate::utils::testing::TestContext;

    #[tokio::test]
    async fn test_should_run_place_hold() {
        let ctx = TestContext::new().await;
        ctx.add_patron("ST-001", PatronGroup::Student).await;
        ctx.add_patron("ST-002", PatronGroup::Student).await;
        ctx.add_item("B-1", "REGULAR").await;
        let cmd = PlaceHoldCommand::new(ctx.state.circulation.clone());
        assert!(matches!(cmd.execute(PlaceHoldCommandRequest::new("B-1", "ST-002")).await,
            Err(CommandError::Precondition { .. })));

        ctx.state.circulation.checkout("ST-001", &["B-1".to_string()]).await.expect("should checkout");
        let res = cmd.execute(PlaceHoldCommandRequest::new("B-1", "ST-002")).await.expect("should place hold");
        assert_eq!(HoldStatus::Active, res.hold.hold_status);
        assert!(matches!(cmd.execute(PlaceHoldCommandRequest::new("B-1", "ST-002")).await,
            Err(CommandError::DuplicateKey { .. })));
    }
}
