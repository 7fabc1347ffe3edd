use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::NaiveDateTime;
use crate::core::library::{HoldStatus, LibraryResult};
use crate::core::repository::Repository;
use crate::holds::domain::model::HoldEntity;
use crate::holds::repository::{HoldRepository, queue_order};
use crate::utils::date::format_date;
use crate::utils::ddb::{DDBTable, HOLDS_TABLE};

#[derive(Debug)]
pub(crate) struct DDBHoldRepository {
    table: DDBTable,
}

impl DDBHoldRepository {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            table: DDBTable::new(client, HOLDS_TABLE),
        }
    }

    fn active_status() -> (&'static str, AttributeValue) {
        (":hold_status", AttributeValue::S(HoldStatus::Active.to_string()))
    }
}

#[async_trait]
impl Repository<HoldEntity> for DDBHoldRepository {
    async fn create(&self, entity: &HoldEntity) -> LibraryResult<usize> {
        self.table.put_new(entity).await
    }

    async fn update(&self, entity: &HoldEntity) -> LibraryResult<usize> {
        self.table.put_versioned(entity).await
    }

    async fn get(&self, id: &str) -> LibraryResult<HoldEntity> {
        self.table.get(id).await
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        self.table.delete(id).await
    }
}

#[async_trait]
impl HoldRepository for DDBHoldRepository {
    async fn find_active_by_item(&self, item_barcode: &str) -> LibraryResult<Vec<HoldEntity>> {
        let mut holds: Vec<HoldEntity> = self.table.query_index(
            "item_barcode = :item_barcode", Some("hold_status = :hold_status"), &[],
            &[Self::active_status(), (":item_barcode", AttributeValue::S(item_barcode.to_string()))],
            true).await?;
        // created_at orders the index, sequence breaks ties
        queue_order(&mut holds);
        Ok(holds)
    }

    async fn find_active_by_patron(&self, patron_id: &str) -> LibraryResult<Vec<HoldEntity>> {
        let mut holds: Vec<HoldEntity> = self.table.scan(
            Some("hold_status = :hold_status AND patron_id = :patron_id"), &[],
            &[Self::active_status(), (":patron_id", AttributeValue::S(patron_id.to_string()))]).await?;
        queue_order(&mut holds);
        Ok(holds)
    }

    async fn find_expired(&self, now: NaiveDateTime) -> LibraryResult<Vec<HoldEntity>> {
        let mut holds: Vec<HoldEntity> = self.table.scan(
            Some("hold_status = :hold_status AND expires_at < :now"), &[],
            &[Self::active_status(), (":now", AttributeValue::S(format_date(now)))]).await?;
        queue_order(&mut holds);
        Ok(holds)
    }
}
