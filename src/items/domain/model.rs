use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::core::library::ItemStatus;
use crate::utils::date::serializer;

// ItemEntity abstracts a physical circulating unit, identified by its barcode. There can be
// many items for the same title.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct ItemEntity {
    pub barcode: String,
    pub version: i64,
    pub title: String,
    pub material_type: String,
    pub item_status: ItemStatus,
    pub loan_count: i64,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl ItemEntity {
    pub fn new(barcode: &str, title: &str, material_type: &str, status: ItemStatus, now: NaiveDateTime) -> Self {
        Self {
            barcode: barcode.to_string(),
            version: 0,
            title: title.to_string(),
            material_type: material_type.to_string(),
            item_status: status,
            loan_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Identifiable for ItemEntity {
    fn id(&self) -> String {
        self.barcode.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}
