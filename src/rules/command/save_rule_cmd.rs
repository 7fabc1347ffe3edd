use std::sync::Arc;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::core::library::PatronGroup;
use crate::rules::domain::model::CirculationRuleEntity;
use crate::rules::domain::RuleService;

pub(crate) struct SaveRuleCommand {
    rule_service: Arc<dyn RuleService>,
}

impl SaveRuleCommand {
    pub(crate) fn new(rule_service: Arc<dyn RuleService>) -> Self {
        Self {
            rule_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SaveRuleCommandRequest {
    pub patron_group: PatronGroup,
    pub material_type: String,
    pub loan_days: i64,
    pub max_items: i64,
    pub fine_per_day: Decimal,
}

impl SaveRuleCommandRequest {
    pub fn build_rule(&self) -> CirculationRuleEntity {
        CirculationRuleEntity::new(self.patron_group, self.material_type.as_str(),
                                   self.loan_days, self.max_items, self.fine_per_day)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SaveRuleCommandResponse {
    pub rule: CirculationRuleEntity,
}

impl SaveRuleCommandResponse {
    pub fn new(rule: CirculationRuleEntity) -> Self {
        Self {
            rule,
        }
    }
}

#[async_trait]
impl Command<SaveRuleCommandRequest, SaveRuleCommandResponse> for SaveRuleCommand {
    async fn execute(&self, req: SaveRuleCommandRequest) -> Result<SaveRuleCommandResponse, CommandError> {
        self.rule_service.save_rule(&req.build_rule())
            .await.map_err(CommandError::from).map(SaveRuleCommandResponse::new)
    }
}
