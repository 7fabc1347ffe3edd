use aws_sdk_sns::Client;
use async_trait::async_trait;
use aws_sdk_sns::error::SdkError;
use aws_sdk_sns::operation::publish::PublishError;
use aws_sdk_sns::types::MessageAttributeValue;
use tracing::debug;
use crate::core::events::DomainEvent;
use crate::core::library::LibraryError;
use crate::gateway::events::EventPublisher;

// SNSPublisher sends every event to one topic, the event name travels as a message attribute
// so that subscribers can filter on it.
#[derive(Debug)]
pub struct SNSPublisher {
    client: Client,
    topic_arn: String,
}

impl SNSPublisher {
    pub(crate) fn new(client: Client, topic_arn: &str) -> Self {
        Self {
            client,
            topic_arn: topic_arn.to_string(),
        }
    }
}

#[async_trait]
impl EventPublisher for SNSPublisher {
    async fn publish(&self, event: &DomainEvent) -> Result<(), LibraryError> {
        if self.topic_arn.is_empty() {
            return Err(LibraryError::runtime(format!("topic is not configured for {}", event.name).as_str(), None));
        }
        let json = serde_json::to_string(event)?;
        let name = MessageAttributeValue::builder()
            .data_type("String")
            .string_value(event.name.as_str())
            .build();
        let resp = self.client.publish()
            .topic_arn(self.topic_arn.as_str())
            .message(json)
            .message_attributes("name", name)
            .send().await?;
        debug!(event = event.name.as_str(), message_id = resp.message_id().unwrap_or_default(), "published event");
        Ok(())
    }
}

impl From<SdkError<PublishError>> for LibraryError {
    fn from(err: SdkError<PublishError>) -> Self {
        LibraryError::runtime(format!("{:?}", err).as_str(), None)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use crate::core::events::DomainEvent;
    use crate::gateway::events::EventPublisher;
    use crate::gateway::sns::publisher::SNSPublisher;
    use crate::utils::ddb::build_sns_client;

    #[tokio::test]
    async fn test_should_reject_missing_topic() {
        let data = HashMap::from([("a", 1), ("b", 2)]);
        let event = DomainEvent::added("item_returned", "circulation", "B-1", &HashMap::new(), &data).expect("build event");
        let publisher = SNSPublisher::new(build_sns_client().await, "");
        assert!(publisher.publish(&event).await.is_err());
    }
}
