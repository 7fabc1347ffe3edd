use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::domain::Identifiable;
use crate::core::library::{PaymentMethod, TransactionKind};
use crate::utils::date::serializer;

pub(crate) const SYSTEM_ACTOR: &str = "SYSTEM";

// TransactionEntity is an append-only ledger entry; a positive amount is a charge added to
// the patron balance and a negative amount is a credit.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct TransactionEntity {
    pub transaction_id: String,
    pub version: i64,
    pub patron_id: String,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub method: PaymentMethod,
    #[serde(with = "serializer")]
    pub timestamp: NaiveDateTime,
    pub actor_id: String,
    pub note: Option<String>,
    pub item_title: Option<String>,
}

impl TransactionEntity {
    pub fn new(patron_id: &str, amount: Decimal, kind: TransactionKind, method: PaymentMethod,
               actor_id: &str, now: NaiveDateTime) -> Self {
        Self {
            transaction_id: Uuid::new_v4().to_string(),
            version: 0,
            patron_id: patron_id.to_string(),
            amount,
            kind,
            method,
            timestamp: now,
            actor_id: actor_id.to_string(),
            note: None,
            item_title: None,
        }
    }

    pub fn with_note(mut self, note: Option<&str>) -> Self {
        self.note = note.map(str::to_string);
        self
    }

    pub fn with_item_title(mut self, title: &str) -> Self {
        self.item_title = Some(title.to_string());
        self
    }
}

impl Identifiable for TransactionEntity {
    fn id(&self) -> String {
        self.transaction_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}
