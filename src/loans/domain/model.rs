use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::domain::Identifiable;
use crate::core::library::LoanStatus;
use crate::utils::date::{opt_serializer, serializer};

// LoanEntity abstracts the custody of one item by one patron; it stays in the ledger after
// the item is returned.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct LoanEntity {
    pub loan_id: String,
    pub version: i64,
    pub branch_id: String,
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
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl LoanEntity {
    pub fn issue(branch_id: &str, item_barcode: &str, patron_id: &str,
                 now: NaiveDateTime, loan_days: i64) -> Self {
        Self {
            loan_id: Uuid::new_v4().to_string(),
            version: 0,
            branch_id: branch_id.to_string(),
            item_barcode: item_barcode.to_string(),
            patron_id: patron_id.to_string(),
            loan_status: LoanStatus::Active,
            issued_at: now,
            due_at: now + Duration::days(loan_days),
            returned_at: None,
            renewal_count: 0,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.returned_at.is_none()
    }

    // renewal restarts the loan period from the renewal moment
    pub fn renew(&mut self, now: NaiveDateTime, loan_days: i64) {
        self.due_at = now + Duration::days(loan_days);
        self.renewal_count += 1;
        self.updated_at = now;
    }

    pub fn close(&mut self, now: NaiveDateTime) {
        self.returned_at = Some(now);
        self.loan_status = LoanStatus::Returned;
        self.updated_at = now;
    }

    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        self.due_at < now
    }

    // whole days elapsed since the due date, partial days are not counted
    pub fn days_overdue(&self, now: NaiveDateTime) -> i64 {
        if !self.is_overdue(now) {
            return 0;
        }
        (now - self.due_at).num_days()
    }
}

impl Identifiable for LoanEntity {
    fn id(&self) -> String {
        self.loan_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}
