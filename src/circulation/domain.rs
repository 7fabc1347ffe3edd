pub mod service;

use async_trait::async_trait;
use crate::circulation::dto::{CheckoutReport, ExpireHoldsReport, ReturnReport};
use crate::core::library::LibraryResult;
use crate::holds::dto::HoldDto;
use crate::loans::dto::LoanDto;

pub(crate) const PATRON_BLOCKED: &str = "PATRON_BLOCKED";
pub(crate) const HELD_FOR_ANOTHER_PATRON: &str = "HELD_FOR_ANOTHER_PATRON";
pub(crate) const RENEWAL_LIMIT_REACHED: &str = "RENEWAL_LIMIT_REACHED";
pub(crate) const HOLD_NOT_ALLOWED: &str = "HOLD_NOT_ALLOWED";
pub(crate) const HOLD_LIMIT_REACHED: &str = "HOLD_LIMIT_REACHED";

// CirculationService moves items between patrons. Each item-level change commits as one
// versioned unit of work and is retried a bounded number of times on conflict.
#[async_trait]
pub(crate) trait CirculationService: Sync + Send {
    // checks out each barcode independently; one failure never rolls back another item
    async fn checkout(&self, patron_id: &str, barcodes: &[String]) -> LibraryResult<CheckoutReport>;

    // closes the open loan if any, assesses the overdue fine and serves the hold queue
    async fn return_item(&self, barcode: &str) -> LibraryResult<ReturnReport>;

    // restarts the loan period from now; never touches item status, holds or fines
    async fn renew(&self, barcode: &str, patron_id: &str) -> LibraryResult<LoanDto>;

    async fn place_hold(&self, patron_id: &str, barcode: &str) -> LibraryResult<HoldDto>;

    async fn cancel_hold(&self, patron_id: &str, barcode: &str) -> LibraryResult<HoldDto>;

    // deactivates active holds past their expiry
    async fn expire_holds(&self) -> LibraryResult<ExpireHoldsReport>;

    // active holds past their expiry that the sweep has not handled yet
    async fn expired_holds(&self) -> LibraryResult<Vec<HoldDto>>;
}
