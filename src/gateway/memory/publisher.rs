use async_trait::async_trait;
use crate::core::events::DomainEvent;
use crate::core::library::LibraryError;
use crate::gateway::events::EventPublisher;
use crate::utils::memory::MemoryDatabase;

// MemoryPublisher keeps published events in the memory tables so tests can assert on them
#[derive(Debug, Clone)]
pub(crate) struct MemoryPublisher {
    db: MemoryDatabase,
}

impl MemoryPublisher {
    pub(crate) fn new(db: MemoryDatabase) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EventPublisher for MemoryPublisher {
    async fn publish(&self, event: &DomainEvent) -> Result<(), LibraryError> {
        let mut tables = self.db.write().await;
        if tables.events.iter().any(|e| e.event_id == event.event_id) {
            return Err(LibraryError::duplicate_key(format!("event {} already published", event.event_id).as_str()));
        }
        tables.events.push(event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use crate::core::events::DomainEvent;
    use crate::gateway::events::EventPublisher;
    use crate::gateway::memory::publisher::MemoryPublisher;
    use crate::utils::memory::MemoryDatabase;

    #[tokio::test]
    async fn test_should_publish_to_memory() {
        let db = MemoryDatabase::new();
        let publisher = MemoryPublisher::new(db.clone());
        let event = DomainEvent::updated("loan_renewed", "circulation", "L-1", &HashMap::new(), &"L-1").expect("build event");
        publisher.publish(&event).await.expect("should publish");
        assert!(publisher.publish(&event).await.is_err());
        assert_eq!(1, db.read().await.events.len());
    }
}
