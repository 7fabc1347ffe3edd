use axum::{
    extract::State,
    response::Json,
};
use serde_json::Value;
use crate::core::command::Command;
use crate::core::controller::{AppState, json_to_server_error, ServerError};
use crate::rules::command::get_rules_cmd::{GetRulesCommand, GetRulesCommandRequest, GetRulesCommandResponse};
use crate::rules::command::save_rule_cmd::{SaveRuleCommand, SaveRuleCommandRequest, SaveRuleCommandResponse};

pub(crate) async fn save_rule(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<SaveRuleCommandResponse>, ServerError> {
    let req: SaveRuleCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let res = SaveRuleCommand::new(state.rules.clone()).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn find_rules(
    State(state): State<AppState>) -> Result<Json<GetRulesCommandResponse>, ServerError> {
    let res = GetRulesCommand::new(state.rules.clone()).execute(GetRulesCommandRequest {}).await?;
    Ok(Json(res))
}
