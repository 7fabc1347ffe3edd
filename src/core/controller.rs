use std::sync::Arc;
use axum::http::StatusCode;
use crate::circulation::domain::CirculationService;
use crate::circulation::factory::create_circulation_service;
use crate::core::command::CommandError;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;
use crate::fines::domain::LedgerService;
use crate::fines::factory::create_ledger_service;
use crate::items::domain::ItemService;
use crate::items::factory::create_item_service;
use crate::loans::domain::LoanLedger;
use crate::loans::factory::create_loan_ledger;
use crate::patrons::domain::PatronService;
use crate::patrons::factory::create_patron_service;
use crate::rules::domain::RuleService;
use crate::rules::factory::create_rule_service;
use crate::utils::date::Clock;

// AppState is built once at startup and shared by every handler.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) config: Configuration,
    pub(crate) store: RepositoryStore,
    pub(crate) items: Arc<dyn ItemService>,
    pub(crate) patrons: Arc<dyn PatronService>,
    pub(crate) rules: Arc<dyn RuleService>,
    pub(crate) circulation: Arc<dyn CirculationService>,
    pub(crate) loans: Arc<dyn LoanLedger>,
    pub(crate) ledger: Arc<dyn LedgerService>,
}

impl AppState {
    pub async fn new(config: Configuration, store: RepositoryStore, clock: Arc<dyn Clock>) -> AppState {
        AppState {
            items: create_item_service(&store, clock.clone()).await,
            patrons: create_patron_service(&store, clock.clone()).await,
            rules: create_rule_service(&store).await,
            circulation: create_circulation_service(&config, &store, clock.clone()).await,
            loans: create_loan_ledger(&store, clock.clone()).await,
            ledger: create_ledger_service(&config, &store, clock).await,
            config,
            store,
        }
    }
}

pub(crate) type ServerError = (StatusCode, String);

pub fn json_to_server_error(err: serde_json::Error) -> ServerError {
    (StatusCode::BAD_REQUEST, format!("{}", err))
}

impl From<CommandError> for ServerError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Database { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{:?}", err))
            }
            CommandError::DuplicateKey { .. } => {
                (StatusCode::CONFLICT, format!("{:?}", err))
            }
            CommandError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, format!("{:?}", err))
            }
            CommandError::Precondition { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, format!("{:?}", err))
            }
            CommandError::Conflict { .. } => {
                (StatusCode::CONFLICT, format!("{:?}", err))
            }
            CommandError::Runtime { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{:?}", err))
            }
            CommandError::Serialization { .. } => {
                (StatusCode::BAD_REQUEST, format!("{:?}", err))
            }
            CommandError::Validation { .. } => {
                (StatusCode::BAD_REQUEST, format!("{:?}", err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use crate::core::command::CommandError;
    use crate::core::controller::ServerError;

    #[tokio::test]
    async fn test_should_map_command_errors_to_status() {
        let cases = vec![
            (CommandError::NotFound { message: "test".to_string() }, StatusCode::NOT_FOUND),
            (CommandError::Precondition { message: "test".to_string(), reason_code: None }, StatusCode::UNPROCESSABLE_ENTITY),
            (CommandError::Conflict { message: "test".to_string(), reason_code: None }, StatusCode::CONFLICT),
            (CommandError::DuplicateKey { message: "test".to_string() }, StatusCode::CONFLICT),
            (CommandError::Validation { message: "test".to_string(), reason_code: None }, StatusCode::BAD_REQUEST),
            (CommandError::Database { message: "test".to_string(), reason_code: None, retryable: false }, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            let server_err: ServerError = err.into();
            assert_eq!(status, server_err.0);
        }
    }
}
