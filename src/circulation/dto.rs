use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::core::library::LibraryError;
use crate::items::dto::ItemDto;
use crate::loans::dto::LoanDto;
use crate::patrons::dto::PatronDto;

// CirculationFailure reports why one barcode of a batch was not processed.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct CirculationFailure {
    pub barcode: String,
    pub reason: String,
    pub message: String,
}

impl CirculationFailure {
    pub fn new(barcode: &str, err: &LibraryError) -> Self {
        Self {
            barcode: barcode.to_string(),
            reason: err.kind().to_string(),
            message: err.message().to_string(),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct CheckoutReport {
    pub patron_id: String,
    pub processed: usize,
    pub loans: Vec<LoanDto>,
    pub errors: Vec<CirculationFailure>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct ReturnReport {
    pub fine_amount: Decimal,
    pub item: ItemDto,
    pub loan: Option<LoanDto>,
    // borrower of the closed loan
    pub patron: Option<PatronDto>,
    // owner of the oldest active hold when the item went on the hold shelf
    pub reserved_patron_id: Option<String>,
}

#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub(crate) struct ExpireHoldsReport {
    pub expired: usize,
    pub errors: Vec<CirculationFailure>,
}
