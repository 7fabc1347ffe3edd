include!("../../lib.rs");
use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use lambda_http::{run, Error};
use crate::circulation::controller::{cancel_hold, checkout_items, expire_holds, place_hold, renew_loan, return_item};
use crate::core::controller::AppState;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;
use crate::fines::controller::{find_patron_transactions, ledger_summary, pay_fine, waive_fine};
use crate::items::controller::{add_item, find_item_by_barcode};
use crate::loans::controller::{find_active_loans, find_overdue_loans, find_patron_loans};
use crate::patrons::controller::{add_patron, find_patron_by_id, update_patron};
use crate::rules::controller::{find_rules, save_rule};
use crate::utils::date::SystemClock;
use crate::utils::ddb::setup_tracing;
use crate::utils::memory::MemoryDatabase;

// See https://docs.aws.amazon.com/lambda/latest/dg/lambda-rust.html
// https://docs.aws.amazon.com/lambda/latest/dg/rust-http-events.html

const DEV_MODE: bool = true;

#[tokio::main]
async fn main() -> Result<(), Error> {
    setup_tracing();

    let state = if DEV_MODE {
        std::env::set_var("AWS_LAMBDA_FUNCTION_NAME", "_");
        std::env::set_var("AWS_LAMBDA_FUNCTION_MEMORY_SIZE", "4096");
        std::env::set_var("AWS_LAMBDA_FUNCTION_VERSION", "1");
        std::env::set_var("AWS_LAMBDA_RUNTIME_API", "http://[::]:9000/.rt");
        // CIRCULATION_STORE=memory runs without DynamoDB Local
        let store = match std::env::var("CIRCULATION_STORE").as_deref() {
            Ok("memory") => RepositoryStore::Memory(MemoryDatabase::new()),
            _ => RepositoryStore::LocalDynamoDB,
        };
        AppState::new(Configuration::from_env("dev"), store, Arc::new(SystemClock)).await
    } else {
        AppState::new(Configuration::from_env("prod"), RepositoryStore::DynamoDB, Arc::new(SystemClock)).await
    };

    let app = Router::new()
        .route("/items", post(add_item))
        .route("/items/:barcode", get(find_item_by_barcode))
        .route("/items/:barcode/return", post(return_item))
        .route("/items/:barcode/renew", post(renew_loan))
        .route("/items/:barcode/holds", post(place_hold))
        .route("/items/:barcode/holds/:patron_id", axum::routing::delete(cancel_hold))
        .route("/holds/expire", post(expire_holds))
        .route("/checkout", post(checkout_items))
        .route("/patrons", post(add_patron))
        .route("/patrons/:id", get(find_patron_by_id).put(update_patron))
        .route("/patrons/:id/loans", get(find_patron_loans))
        .route("/patrons/:id/payments", post(pay_fine))
        .route("/patrons/:id/waivers", post(waive_fine))
        .route("/patrons/:id/transactions", get(find_patron_transactions))
        .route("/loans", get(find_active_loans))
        .route("/loans/overdue", get(find_overdue_loans))
        .route("/rules", get(find_rules).post(save_rule))
        .route("/ledger/summary", get(ledger_summary))
        .with_state(state);

    run(app).await
}
