use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::rules::domain::model::CirculationRuleEntity;
use crate::rules::domain::RuleService;

pub(crate) struct GetRulesCommand {
    rule_service: Arc<dyn RuleService>,
}

impl GetRulesCommand {
    pub(crate) fn new(rule_service: Arc<dyn RuleService>) -> Self {
        Self {
            rule_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GetRulesCommandRequest {}

#[derive(Debug, Serialize)]
pub(crate) struct GetRulesCommandResponse {
    pub rules: Vec<CirculationRuleEntity>,
}

impl GetRulesCommandResponse {
    pub fn new(rules: Vec<CirculationRuleEntity>) -> Self {
        Self {
            rules,
        }
    }
}

#[async_trait]
impl Command<GetRulesCommandRequest, GetRulesCommandResponse> for GetRulesCommand {
    async fn execute(&self, _req: GetRulesCommandRequest) -> Result<GetRulesCommandResponse, CommandError> {
        self.rule_service.find_rules()
            .await.map_err(CommandError::from).map(GetRulesCommandResponse::new)
    }
}
