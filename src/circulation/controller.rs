use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::Value;
use crate::circulation::command::cancel_hold_cmd::{CancelHoldCommand, CancelHoldCommandRequest, CancelHoldCommandResponse};
use crate::circulation::command::checkout_items_cmd::{CheckoutItemsCommand, CheckoutItemsCommandRequest, CheckoutItemsCommandResponse};
use crate::circulation::command::expire_holds_cmd::{ExpireHoldsCommand, ExpireHoldsCommandRequest, ExpireHoldsCommandResponse};
use crate::circulation::command::place_hold_cmd::{PlaceHoldCommand, PlaceHoldCommandRequest, PlaceHoldCommandResponse};
use crate::circulation::command::renew_loan_cmd::{RenewLoanCommand, RenewLoanCommandRequest, RenewLoanCommandResponse};
use crate::circulation::command::return_item_cmd::{ReturnItemCommand, ReturnItemCommandRequest, ReturnItemCommandResponse};
use crate::core::command::Command;
use crate::core::controller::{AppState, json_to_server_error, ServerError};

pub(crate) async fn checkout_items(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<CheckoutItemsCommandResponse>, ServerError> {
    let req: CheckoutItemsCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let res = CheckoutItemsCommand::new(state.circulation.clone()).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn return_item(
    State(state): State<AppState>,
    Path(barcode): Path<String>) -> Result<Json<ReturnItemCommandResponse>, ServerError> {
    let req = ReturnItemCommandRequest { barcode };
    let res = ReturnItemCommand::new(state.circulation.clone()).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn renew_loan(
    State(state): State<AppState>,
    Path(barcode): Path<String>,
    json: Json<Value>) -> Result<Json<RenewLoanCommandResponse>, ServerError> {
    let mut req: RenewLoanCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    req.barcode = barcode;
    let res = RenewLoanCommand::new(state.circulation.clone()).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn place_hold(
    State(state): State<AppState>,
    Path(barcode): Path<String>,
    json: Json<Value>) -> Result<Json<PlaceHoldCommandResponse>, ServerError> {
    let mut req: PlaceHoldCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    req.barcode = barcode;
    let res = PlaceHoldCommand::new(state.circulation.clone()).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn cancel_hold(
    State(state): State<AppState>,
    Path((barcode, patron_id)): Path<(String, String)>) -> Result<Json<CancelHoldCommandResponse>, ServerError> {
    let req = CancelHoldCommandRequest { barcode, patron_id };
    let res = CancelHoldCommand::new(state.circulation.clone()).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn expire_holds(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<ExpireHoldsCommandResponse>, ServerError> {
    let req: ExpireHoldsCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let res = ExpireHoldsCommand::new(state.circulation.clone()).execute(req).await?;
    Ok(Json(res))
}
