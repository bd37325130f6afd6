use anyhow::Result;
use async_trait::async_trait;
use rdkafka::{
    config::ClientConfig,
    producer::{FutureProducer, FutureRecord},
};

use super::{Event, EventPublisher};

/// Kafka/Redpanda producer adapter. Delivery timeout is owned here; the
/// coordinator makes a single attempt and treats any failure as terminal.
pub struct RedpandaPublisher {
    producer: FutureProducer,
    topic: String,
}

impl RedpandaPublisher {
    pub fn new(brokers: &str, topic: &str) -> Result<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()?;

        Ok(Self {
            producer,
            topic: topic.to_string(),
        })
    }
}

#[async_trait]
impl EventPublisher for RedpandaPublisher {
    async fn publish(&self, event: &Event) -> Result<()> {
        let key = event.id.to_string();
        let payload = event.to_json()?;
        let record = FutureRecord::to(&self.topic).key(&key).payload(&payload);

        self.producer
            .send(
                record,
                rdkafka::util::Timeout::After(std::time::Duration::from_secs(5)),
            )
            .await
            .map_err(|(e, _)| anyhow::anyhow!("Kafka send error: {}", e))?;

        tracing::info!(
            topic = %self.topic,
            event_id = %event.id,
            event_type = event.event_type.as_str(),
            "published event"
        );
        Ok(())
    }
}
