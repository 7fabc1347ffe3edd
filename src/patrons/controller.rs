use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::Value;
use crate::core::command::Command;
use crate::core::controller::{AppState, json_to_server_error, ServerError};
use crate::patrons::command::add_patron_cmd::{AddPatronCommand, AddPatronCommandRequest, AddPatronCommandResponse};
use crate::patrons::command::get_patron_cmd::{GetPatronCommand, GetPatronCommandRequest, GetPatronCommandResponse};
use crate::patrons::command::update_patron_cmd::{UpdatePatronCommand, UpdatePatronCommandRequest, UpdatePatronCommandResponse};

pub(crate) async fn add_patron(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<AddPatronCommandResponse>, ServerError> {
    let req: AddPatronCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let res = AddPatronCommand::new(state.patrons.clone()).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn find_patron_by_id(
    State(state): State<AppState>,
    Path(patron_id): Path<String>) -> Result<Json<GetPatronCommandResponse>, ServerError> {
    let req = GetPatronCommandRequest { patron_id };
    let res = GetPatronCommand::new(state.patrons.clone()).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn update_patron(
    State(state): State<AppState>,
    Path(patron_id): Path<String>,
    json: Json<Value>) -> Result<Json<UpdatePatronCommandResponse>, ServerError> {
    let mut req: UpdatePatronCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    req.patron_id = patron_id;
    let res = UpdatePatronCommand::new(state.patrons.clone()).execute(req).await?;
    Ok(Json(res))
}
