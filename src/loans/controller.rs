use axum::{
    extract::{Path, State},
    response::Json,
};
use crate::core::command::Command;
use crate::core::controller::{AppState, ServerError};
use crate::loans::command::get_loans_cmd::{GetLoansCommand, GetLoansCommandRequest, GetLoansCommandResponse};
use crate::loans::command::get_overdue_cmd::{GetOverdueCommand, GetOverdueCommandRequest, GetOverdueCommandResponse};

pub(crate) async fn find_active_loans(
    State(state): State<AppState>) -> Result<Json<GetLoansCommandResponse>, ServerError> {
    let req = GetLoansCommandRequest { patron_id: None };
    let res = GetLoansCommand::new(state.loans.clone()).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn find_patron_loans(
    State(state): State<AppState>,
    Path(patron_id): Path<String>) -> Result<Json<GetLoansCommandResponse>, ServerError> {
    let req = GetLoansCommandRequest { patron_id: Some(patron_id) };
    let res = GetLoansCommand::new(state.loans.clone()).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn find_overdue_loans(
    State(state): State<AppState>) -> Result<Json<GetOverdueCommandResponse>, ServerError> {
    let res = GetOverdueCommand::new(state.loans.clone()).execute(GetOverdueCommandRequest {}).await?;
    Ok(Json(res))
}
