use chrono::NaiveDateTime;
use uuid::Uuid;
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::core::library::HoldStatus;
use crate::utils::date::{opt_serializer, serializer};

// HoldEntity abstracts a patron waiting for an item; active holds of an item are served in
// (created_at, sequence) order.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct HoldEntity {
    pub hold_id: String,
    pub version: i64,
    pub branch_id: String,
    pub item_barcode: String,
    pub patron_id: String,
    pub hold_status: HoldStatus,
    pub sequence: i64,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "opt_serializer")]
    pub expires_at: Option<NaiveDateTime>,
    #[serde(with = "opt_serializer")]
    pub closed_at: Option<NaiveDateTime>,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl HoldEntity {
    pub fn new(branch_id: &str, item_barcode: &str, patron_id: &str, sequence: i64,
               now: NaiveDateTime, expires_at: Option<NaiveDateTime>) -> Self {
        Self {
            hold_id: Uuid::new_v4().to_string(),
            version: 0,
            branch_id: branch_id.to_string(),
            item_barcode: item_barcode.to_string(),
            patron_id: patron_id.to_string(),
            hold_status: HoldStatus::Active,
            sequence,
            created_at: now,
            expires_at,
            closed_at: None,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.hold_status == HoldStatus::Active
    }

    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        self.is_active() && self.expires_at.map(|at| at < now).unwrap_or(false)
    }

    pub fn close(&mut self, status: HoldStatus, now: NaiveDateTime) {
        self.hold_status = status;
        self.closed_at = Some(now);
        self.updated_at = now;
    }

    pub fn queue_key(&self) -> (NaiveDateTime, i64) {
        (self.created_at, self.sequence)
    }
}

impl Identifiable for HoldEntity {
    fn id(&self) -> String {
        self.hold_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}


#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use crate::core::library::HoldStatus;
    use crate::holds::domain::model::HoldEntity;

    #[tokio::test]
    async fn test_should_build_hold() {
        let now = Utc::now().naive_utc();
        let hold = HoldEntity::new("test", "B-1", "P-1", 1, now, Some(now + Duration::days(10)));
        assert_eq!("B-1", hold.item_barcode.as_str());
        assert_eq!("P-1", hold.patron_id.as_str());
        assert_eq!(HoldStatus::Active, hold.hold_status);
        assert!(hold.is_active());
        assert!(!hold.is_expired(now));
        assert!(hold.is_expired(now + Duration::days(11)));
    }

    #[tokio::test]
    async fn test_should_close_hold() {
        let now = Utc::now().naive_utc();
        let mut hold = HoldEntity::new("test", "B-1", "P-1", 1, now, None);
        hold.close(HoldStatus::Fulfilled, now);
        assert!(!hold.is_active());
        assert_eq!(Some(now), hold.closed_at);
        assert!(!hold.is_expired(now + Duration::days(365)));
    }
}
