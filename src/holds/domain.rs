pub mod model;

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use chrono::{Duration, NaiveDateTime};
use crate::core::domain::Configuration;
use crate::core::library::{HoldStatus, LibraryResult};
use crate::holds::domain::model::HoldEntity;
use crate::holds::repository::HoldRepository;

// HoldQueue is the per-item FIFO of patrons waiting for a copy. Builders return entities
// without persisting them.
pub(crate) struct HoldQueue {
    hold_repository: Arc<dyn HoldRepository>,
    branch_id: String,
    expiry_days: i64,
    last_sequence: AtomicI64,
}

impl HoldQueue {
    pub(crate) fn new(hold_repository: Arc<dyn HoldRepository>, config: &Configuration) -> Self {
        Self {
            hold_repository,
            branch_id: config.branch_id.to_string(),
            expiry_days: config.hold_expiry_days,
            last_sequence: AtomicI64::new(0),
        }
    }

    // strictly increasing, seeded from the clock so that restarts keep the order
    pub(crate) fn next_sequence(&self, now: NaiveDateTime) -> i64 {
        let micros = now.timestamp_micros();
        let prev = self.last_sequence
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(micros.max(last + 1)))
            .unwrap_or_else(|last| last);
        micros.max(prev + 1)
    }

    // a queued hold has no deadline until a copy is set aside for it
    pub(crate) fn enqueue(&self, item_barcode: &str, patron_id: &str, now: NaiveDateTime) -> HoldEntity {
        HoldEntity::new(self.branch_id.as_str(), item_barcode, patron_id,
                        self.next_sequence(now), now, None)
    }

    // starts the pickup window of the hold the returned copy is held for
    pub(crate) fn reserve(&self, hold: &HoldEntity, now: NaiveDateTime) -> HoldEntity {
        let mut reserved = hold.clone();
        reserved.expires_at = if self.expiry_days > 0 {
            Some(now + Duration::days(self.expiry_days))
        } else {
            None
        };
        reserved.updated_at = now;
        reserved
    }

    pub(crate) async fn peek_oldest_active(&self, item_barcode: &str) -> LibraryResult<Option<HoldEntity>> {
        let holds = self.hold_repository.find_active_by_item(item_barcode).await?;
        Ok(holds.into_iter().next())
    }

    // the fulfilled copy of the hold, to be committed with the loan it produced
    pub(crate) fn consume(&self, hold: &HoldEntity, now: NaiveDateTime) -> HoldEntity {
        let mut fulfilled = hold.clone();
        fulfilled.close(HoldStatus::Fulfilled, now);
        fulfilled
    }

    pub(crate) async fn active_for_item(&self, item_barcode: &str) -> LibraryResult<Vec<HoldEntity>> {
        self.hold_repository.find_active_by_item(item_barcode).await
    }

    pub(crate) async fn active_for_patron(&self, patron_id: &str) -> LibraryResult<Vec<HoldEntity>> {
        self.hold_repository.find_active_by_patron(patron_id).await
    }

    pub(crate) async fn expired(&self, now: NaiveDateTime) -> LibraryResult<Vec<HoldEntity>> {
        self.hold_repository.find_expired(now).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use chrono::{Duration, NaiveDate};
    use crate::core::domain::Configuration;
    use crate::core::library::HoldStatus;
    use crate::core::repository::Repository;
    use crate::holds::domain::HoldQueue;
    use crate::holds::domain::model::HoldEntity;
    use crate::utils::memory::{MemoryDatabase, MemoryRepository};

    fn build_queue() -> (HoldQueue, Arc<MemoryRepository<HoldEntity>>) {
        let repo = Arc::new(MemoryRepository::<HoldEntity>::new(MemoryDatabase::new()));
        (HoldQueue::new(repo.clone(), &Configuration::new("test")), repo)
    }

    #[tokio::test]
    async fn test_should_issue_increasing_sequences() {
        let (queue, _) = build_queue();
        let now = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap().and_hms_opt(10, 0, 0).unwrap();
        let first = queue.next_sequence(now);
        let second = queue.next_sequence(now);
        let third = queue.next_sequence(now - Duration::days(1));
        assert!(first < second);
        assert!(second < third);
    }

    #[tokio::test]
    async fn test_should_serve_oldest_hold_first() {
        let (queue, repo) = build_queue();
        let now = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap().and_hms_opt(10, 0, 0).unwrap();
        // same instant, the sequence breaks the tie
        let first = queue.enqueue("B-1", "P-1", now);
        let second = queue.enqueue("B-1", "P-2", now);
        repo.create(&second).await.expect("should create hold");
        repo.create(&first).await.expect("should create hold");
        assert_eq!(None, first.expires_at);

        let oldest = queue.peek_oldest_active("B-1").await.expect("should peek").expect("should have hold");
        assert_eq!("P-1", oldest.patron_id);
        assert_eq!(None, queue.peek_oldest_active("B-2").await.expect("should peek"));

        let fulfilled = queue.consume(&oldest, now);
        assert_eq!(HoldStatus::Fulfilled, fulfilled.hold_status);
        repo.update(&fulfilled).await.expect("should update hold");
        let next = queue.peek_oldest_active("B-1").await.expect("should peek").expect("should have hold");
        assert_eq!("P-2", next.patron_id);
        assert_eq!(1, queue.active_for_patron("P-2").await.expect("should find").len());
        assert_eq!(1, queue.active_for_item("B-1").await.expect("should find").len());
    }

    #[tokio::test]
    async fn test_should_only_expire_reserved_holds() {
        let (queue, repo) = build_queue();
        let now = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap().and_hms_opt(10, 0, 0).unwrap();
        let waiting = queue.enqueue("B-1", "P-1", now);
        repo.create(&waiting).await.expect("should create hold");
        assert!(queue.expired(now + Duration::days(30)).await.expect("should find").is_empty());

        let returned_at = now + Duration::days(20);
        let reserved = queue.reserve(&waiting, returned_at);
        assert_eq!(Some(returned_at + Duration::days(10)), reserved.expires_at);
        repo.update(&reserved).await.expect("should update hold");
        assert!(queue.expired(returned_at + Duration::days(10)).await.expect("should find").is_empty());
        assert_eq!(1, queue.expired(returned_at + Duration::days(11)).await.expect("should find").len());
    }

    #[tokio::test]
    async fn test_should_not_set_deadline_without_expiry_days() {
        let repo = Arc::new(MemoryRepository::<HoldEntity>::new(MemoryDatabase::new()));
        let mut config = Configuration::new("test");
        config.hold_expiry_days = 0;
        let queue = HoldQueue::new(repo, &config);
        let now = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap().and_hms_opt(10, 0, 0).unwrap();
        let reserved = queue.reserve(&queue.enqueue("B-1", "P-1", now), now);
        assert_eq!(None, reserved.expires_at);
    }
}
