use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::core::library::{LoanStatus, PatronGroup};
use crate::loans::domain::model::LoanEntity;
use crate::utils::date::{opt_serializer, serializer};

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct LoanDto {
    pub loan_id: String,
    pub version: i64,
    pub item_barcode: String,
    pub patron_id: String,
    pub loan_status: LoanStatus,
    #[serde(with = "serializer")]
    pub issued_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub due_at: NaiveDateTime,
    #[serde(with = "opt_serializer")]
    pub returned_at: Option<NaiveDateTime>,
    pub renewal_count: i64,
}

impl From<&LoanEntity> for LoanDto {
    fn from(other: &LoanEntity) -> LoanDto {
        LoanDto {
            loan_id: other.loan_id.to_string(),
            version: other.version,
            item_barcode: other.item_barcode.to_string(),
            patron_id: other.patron_id.to_string(),
            loan_status: other.loan_status,
            issued_at: other.issued_at,
            due_at: other.due_at,
            returned_at: other.returned_at,
            renewal_count: other.renewal_count,
        }
    }
}

// OverdueLoanDto is one line of the overdue report.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct OverdueLoanDto {
    pub loan_id: String,
    pub patron_id: String,
    pub patron_name: String,
    pub patron_group: Option<PatronGroup>,
    pub item_title: String,
    pub item_barcode: String,
    #[serde(with = "serializer")]
    pub due_at: NaiveDateTime,
    pub days_overdue: i64,
}
