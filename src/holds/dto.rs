use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::core::library::HoldStatus;
use crate::holds::domain::model::HoldEntity;
use crate::utils::date::{opt_serializer, serializer};

// HoldDto abstracts a place in the waiting list of an item.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct HoldDto {
    pub hold_id: String,
    pub version: i64,
    pub item_barcode: String,
    pub patron_id: String,
    pub hold_status: HoldStatus,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "opt_serializer")]
    pub expires_at: Option<NaiveDateTime>,
    #[serde(with = "opt_serializer")]
    pub closed_at: Option<NaiveDateTime>,
}

impl From<&HoldEntity> for HoldDto {
    fn from(other: &HoldEntity) -> HoldDto {
        HoldDto {
            hold_id: other.hold_id.to_string(),
            version: other.version,
            item_barcode: other.item_barcode.to_string(),
            patron_id: other.patron_id.to_string(),
            hold_status: other.hold_status,
            created_at: other.created_at,
            expires_at: other.expires_at,
            closed_at: other.closed_at,
        }
    }
}
