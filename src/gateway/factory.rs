use std::sync::Arc;
use crate::core::repository::RepositoryStore;
use crate::gateway::ddb::publisher::DDBPublisher;
use crate::gateway::events::EventPublisher;
use crate::gateway::GatewayPublisherVia;
use crate::gateway::memory::publisher::MemoryPublisher;
use crate::gateway::sns::publisher::SNSPublisher;
use crate::utils::ddb::{build_db_client, build_sns_client, create_table, EVENTS_TABLE};

pub(crate) const TOPIC_ARN_ENV: &str = "CIRCULATION_TOPIC_ARN";

pub(crate) async fn create_publisher(via: GatewayPublisherVia) -> Arc<dyn EventPublisher> {
    match via {
        GatewayPublisherVia::Sns => {
            let client = build_sns_client().await;
            let topic_arn = std::env::var(TOPIC_ARN_ENV).unwrap_or_default();
            Arc::new(SNSPublisher::new(client, topic_arn.as_str()))
        }
        GatewayPublisherVia::LocalDynamoDB => {
            let client = build_db_client(&RepositoryStore::LocalDynamoDB).await;
            let _ = create_table(&client, &EVENTS_TABLE).await;
            Arc::new(DDBPublisher::new(client, EVENTS_TABLE.name))
        }
        GatewayPublisherVia::Memory(db) => {
            Arc::new(MemoryPublisher::new(db))
        }
    }
}
