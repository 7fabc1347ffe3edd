use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::patrons::domain::PatronService;
use crate::patrons::dto::PatronDto;

pub(crate) struct GetPatronCommand {
    patron_service: Arc<dyn PatronService>,
}

impl GetPatronCommand {
    pub(crate) fn new(patron_service: Arc<dyn PatronService>) -> Self {
        Self {
            patron_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GetPatronCommandRequest {
    pub patron_id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct GetPatronCommandResponse {
    pub patron: PatronDto,
}

impl GetPatronCommandResponse {
    pub fn new(patron: PatronDto) -> Self {
        Self {
            patron,
        }
    }
}

#[async_trait]
impl Command<GetPatronCommandRequest, GetPatronCommandResponse> for GetPatronCommand {
    async fn execute(&self, req: GetPatronCommandRequest) -> Result<GetPatronCommandResponse, CommandError> {
        self.patron_service.find_patron_by_id(req.patron_id.as_str())
            .await.map_err(CommandError::from).map(GetPatronCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::command::{Command, CommandError};
    use crate::core::library::PatronGroup;
    use crate::patrons::command::get_patron_cmd::{GetPatronCommand, GetPatronCommandRequest};
    use crate::utils::testing::TestContext;

    #[tokio::test]
    async fn test_should_run_get_patron() {
        let ctx = TestContext::new().await;
        ctx.add_patron("ST-001", PatronGroup::Student).await;
        let cmd = GetPatronCommand::new(ctx.state.patrons.clone());

        let res = cmd.execute(GetPatronCommandRequest { patron_id: "ST-001".to_string() }).await.expect("should get patron");
        assert_eq!(PatronGroup::Student, res.patron.patron_group);
        assert!(matches!(cmd.execute(GetPatronCommandRequest { patron_id: "ST-404".to_string() }).await,
            Err(CommandError::NotFound { .. })));
    }
}
