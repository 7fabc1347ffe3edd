use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde_json::Value;
use crate::core::command::Command;
use crate::core::controller::{AppState, json_to_server_error, ServerError};
use crate::fines::command::get_summary_cmd::{GetSummaryCommand, GetSummaryCommandRequest, GetSummaryCommandResponse};
use crate::fines::command::get_transactions_cmd::{GetTransactionsCommand, GetTransactionsCommandRequest, GetTransactionsCommandResponse};
use crate::fines::command::pay_fine_cmd::{PayFineCommand, PayFineCommandRequest, PayFineCommandResponse};
use crate::fines::command::waive_fine_cmd::{WaiveFineCommand, WaiveFineCommandRequest, WaiveFineCommandResponse};

pub(crate) async fn pay_fine(
    State(state): State<AppState>,
    Path(patron_id): Path<String>,
    json: Json<Value>) -> Result<Json<PayFineCommandResponse>, ServerError> {
    let mut req: PayFineCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    req.patron_id = patron_id;
    let res = PayFineCommand::new(state.ledger.clone()).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn waive_fine(
    State(state): State<AppState>,
    Path(patron_id): Path<String>,
    json: Json<Value>) -> Result<Json<WaiveFineCommandResponse>, ServerError> {
    let mut req: WaiveFineCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    req.patron_id = patron_id;
    let res = WaiveFineCommand::new(state.ledger.clone()).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn find_patron_transactions(
    State(state): State<AppState>,
    Path(patron_id): Path<String>) -> Result<Json<GetTransactionsCommandResponse>, ServerError> {
    let req = GetTransactionsCommandRequest { patron_id };
    let res = GetTransactionsCommand::new(state.ledger.clone()).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn ledger_summary(
    State(state): State<AppState>,
    Query(req): Query<GetSummaryCommandRequest>) -> Result<Json<GetSummaryCommandResponse>, ServerError> {
    let res = GetSummaryCommand::new(state.ledger.clone()).execute(req).await?;
    Ok(Json(res))
}
