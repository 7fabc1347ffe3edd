use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::core::library::PatronGroup;
use crate::patrons::domain::PatronService;
use crate::patrons::dto::PatronDto;

pub(crate) struct UpdatePatronCommand {
    patron_service: Arc<dyn PatronService>,
}

impl UpdatePatronCommand {
    pub(crate) fn new(patron_service: Arc<dyn PatronService>) -> Self {
        Self {
            patron_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdatePatronCommandRequest {
    #[serde(default)]
    pub patron_id: String,
    pub version: i64,
    pub full_name: String,
    pub patron_group: PatronGroup,
    pub blocked: bool,
}

impl UpdatePatronCommandRequest {
    // applies the editable fields on top of the stored patron
    pub fn apply(&self, patron: PatronDto) -> PatronDto {
        PatronDto {
            version: self.version,
            full_name: self.full_name.to_string(),
            patron_group: self.patron_group,
            blocked: self.blocked,
            ..patron
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdatePatronCommandResponse {
    pub patron: PatronDto,
}

impl UpdatePatronCommandResponse {
    pub fn new(patron: PatronDto) -> Self {
        Self {
            patron,
        }
    }
}

#[async_trait]
impl Command<UpdatePatronCommandRequest, UpdatePatronCommandResponse> for UpdatePatronCommand {
    async fn execute(&self, req: UpdatePatronCommandRequest) -> Result<UpdatePatronCommandResponse, CommandError> {
        let existing = self.patron_service.find_patron_by_id(req.patron_id.as_str()).await.map_err(CommandError::from)?;
        self.patron_service.update_patron(&req.apply(existing))
            .await.map_err(CommandError::from).map(UpdatePatronCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::command::{Command, CommandError};
    use crate::core::library::PatronGroup;
    use crate::patrons::command::update_patron_cmd::{UpdatePatronCommand, UpdatePatronCommandRequest};
    use crate::utils::testing::TestContext;

    fn request(version: i64) -> UpdatePatronCommandRequest {
        UpdatePatronCommandRequest {
            patron_id: "ST-001".to_string(),
            version,
            full_name: "Blocked Student".to_string(),
            patron_group: PatronGroup::Student,
            blocked: true,
        }
    }

    #[tokio::test]
    async fn test_should_run_update_patron() {
        let ctx = TestContext::new().await;
        ctx.add_patron("ST-001", PatronGroup::Student).await;
        let cmd = UpdatePatronCommand::new(ctx.state.patrons.clone());

        let res = cmd.execute(request(0)).await.expect("should update patron");
        assert!(res.patron.blocked);
        assert_eq!("Blocked Student", res.patron.full_name);
        assert!(matches!(cmd.execute(request(0)).await, Err(CommandError::Conflict { .. })));
    }
}
