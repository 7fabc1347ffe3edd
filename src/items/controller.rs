use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::Value;
use crate::core::command::Command;
use crate::core::controller::{AppState, json_to_server_error, ServerError};
use crate::items::command::add_item_cmd::{AddItemCommand, AddItemCommandRequest, AddItemCommandResponse};
use crate::items::command::get_item_cmd::{GetItemCommand, GetItemCommandRequest, GetItemCommandResponse};

pub(crate) async fn add_item(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<AddItemCommandResponse>, ServerError> {
    let req: AddItemCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let res = AddItemCommand::new(state.items.clone()).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn find_item_by_barcode(
    State(state): State<AppState>,
    Path(barcode): Path<String>) -> Result<Json<GetItemCommandResponse>, ServerError> {
    let req = GetItemCommandRequest { barcode };
    let res = GetItemCommand::new(state.items.clone()).execute(req).await?;
    Ok(Json(res))
}
