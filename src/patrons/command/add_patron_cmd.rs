use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::core::library::PatronGroup;
use crate::patrons::domain::PatronService;
use crate::patrons::dto::PatronDto;

pub(crate) struct AddPatronCommand {
    patron_service: Arc<dyn PatronService>,
}

impl AddPatronCommand {
    pub(crate) fn new(patron_service: Arc<dyn PatronService>) -> Self {
        Self {
            patron_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddPatronCommandRequest {
    pub patron_id: String,
    pub full_name: String,
    pub patron_group: PatronGroup,
}

impl AddPatronCommandRequest {
    pub fn new(patron_id: &str, full_name: &str, patron_group: PatronGroup) -> Self {
        Self {
            patron_id: patron_id.to_string(),
            full_name: full_name.to_string(),
            patron_group,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AddPatronCommandResponse {
    pub patron: PatronDto,
}

impl AddPatronCommandResponse {
    pub fn new(patron: PatronDto) -> Self {
        Self {
            patron,
        }
    }
}

#[async_trait]
impl Command<AddPatronCommandRequest, AddPatronCommandResponse> for AddPatronCommand {
    async fn execute(&self, req: AddPatronCommandRequest) -> Result<AddPatronCommandResponse, CommandError> {
        self.patron_service.add_patron(req.patron_id.as_str(), req.full_name.as_str(), req.patron_group)
            .await.map_err(CommandError::from).map(AddPatronCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::command::{Command, CommandError};
    use crate::core::library::PatronGroup;
    use crate::patrons::command::add_patron_cmd::{AddPatronCommand, AddPatronCommandRequest};
    use crate::utils::testing::TestContext;

    #[tokio::test]
    async fn test_should_run_add_patron() {
        let ctx = TestContext::new().await;
        let cmd = AddPatronCommand::new(ctx.state.patrons.clone());

        let res = cmd.execute(AddPatronCommandRequest::new("TC-001", "Jane Roe", PatronGroup::Teacher)).await.expect("should add patron");
        assert_eq!("TC-001", res.patron.patron_id);
        assert!(matches!(cmd.execute(AddPatronCommandRequest::new("TC-001", "Jane Roe", PatronGroup::Teacher)).await,
            Err(CommandError::DuplicateKey { .. })));
    }
}
