use async_trait::async_trait;
use tracing::{error, info};
use crate::core::events::DomainEvent;
use crate::core::library::LibraryError;

#[async_trait]
pub(crate) trait EventPublisher: Sync + Send {
    async fn publish(&self, event: &DomainEvent) -> Result<(), LibraryError>;
}

// publish_events runs after the commit; a failed publish is logged and never undoes the commit
pub(crate) async fn publish_events(publisher: &dyn EventPublisher, events: &[DomainEvent]) -> usize {
    let mut published = 0;
    for event in events {
        match publisher.publish(event).await {
            Ok(_) => {
                published += 1;
                info!(event = event.name.as_str(), key = event.key.as_str(), "published event");
            }
            Err(err) => {
                error!(event = event.name.as_str(), key = event.key.as_str(), error = %err, "failed to publish event");
            }
        }
    }
    published
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use async_trait::async_trait;
    use crate::core::events::DomainEvent;
    use crate::core::library::LibraryError;
    use crate::gateway::events::{EventPublisher, publish_events};

    struct FailingPublisher;

    #[async_trait]
    impl EventPublisher for FailingPublisher {
        async fn publish(&self, _event: &DomainEvent) -> Result<(), LibraryError> {
            Err(LibraryError::runtime("topic unavailable", None))
        }
    }

    #[tokio::test]
    async fn test_should_swallow_publish_failures() {
        let event = DomainEvent::added("item_returned", "circulation", "B-1", &HashMap::new(), &"B-1").expect("build event");
        assert_eq!(0, publish_events(&FailingPublisher, &[event]).await);
    }
}
