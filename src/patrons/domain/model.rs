use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::core::library::PatronGroup;
use crate::patrons::Patron;
use crate::utils::date::serializer;

// PatronEntity abstracts library member that can borrow items, identified by student/staff id.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct PatronEntity {
    pub patron_id: String,
    pub version: i64,
    pub full_name: String,
    pub patron_group: PatronGroup,
    pub blocked: bool,
    // running balance of unpaid fines
    pub fines: Decimal,
    pub total_paid: Decimal,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl PatronEntity {
    pub fn new(patron_id: &str, full_name: &str, group: PatronGroup, now: NaiveDateTime) -> Self {
        Self {
            patron_id: patron_id.to_string(),
            version: 0,
            full_name: full_name.to_string(),
            patron_group: group,
            blocked: false,
            fines: Decimal::ZERO,
            total_paid: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Identifiable for PatronEntity {
    fn id(&self) -> String {
        self.patron_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

impl Patron for PatronEntity {
    fn group(&self) -> PatronGroup {
        self.patron_group
    }

    fn is_blocked(&self) -> bool {
        self.blocked
    }

    fn balance(&self) -> Decimal {
        self.fines
    }
}
