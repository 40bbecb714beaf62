// region:    --- Imports
use crate::auction::events::BidEvent;
use async_trait::async_trait;
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::ClientConfig;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

// endregion: --- Imports

#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("Kafka 클라이언트 생성 실패: {0}")]
    Client(String),
    #[error("메시지 전송 실패: {0}")]
    Send(String),
    #[error("이벤트 직렬화 실패: {0}")]
    Serialize(#[from] serde_json::Error),
}

// region:    --- Event Publisher
/// 커밋된 입찰 이벤트 발행
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &BidEvent) -> Result<(), BrokerError>;
}

/// 브로커가 설정되지 않았을 때 사용하는 발행기
pub struct NoopPublisher;

#[async_trait]
impl EventPublisher for NoopPublisher {
    async fn publish(&self, event: &BidEvent) -> Result<(), BrokerError> {
        debug!("{:<12} --> 브로커 미설정, 이벤트 생략: {:?}", "Publisher", event);
        Ok(())
    }
}
// endregion: --- Event Publisher

// region:    --- Kafka Producer
#[derive(Clone)]
pub struct KafkaProducer {
    producer: Arc<FutureProducer>,
}

/// KafkaProducer 구현
impl KafkaProducer {
    pub fn new(brokers: &str) -> Result<Self, BrokerError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()
            .map_err(|e| BrokerError::Client(e.to_string()))?;

        Ok(KafkaProducer {
            producer: Arc::new(producer),
        })
    }

    /// 메시지 전송
    pub async fn send_message(&self, topic: &str, key: &str, value: &str) -> Result<(), BrokerError> {
        info!(
            "{:<12} --> Kafka 메시지 전송: topic={}, key={}",
            "Producer", topic, key
        );
        let record = FutureRecord::to(topic).key(key).payload(value);

        self.producer
            .send(record, Duration::from_secs(0))
            .await
            .map_err(|(e, _)| BrokerError::Send(format!("{:?}", e)))?;

        Ok(())
    }
}

/// 입찰 이벤트를 상품 id 키로 발행하는 Kafka 발행기
pub struct KafkaPublisher {
    producer: KafkaProducer,
    topic: String,
}

impl KafkaPublisher {
    pub fn new(producer: KafkaProducer, topic: impl Into<String>) -> Self {
        Self {
            producer,
            topic: topic.into(),
        }
    }
}

#[async_trait]
impl EventPublisher for KafkaPublisher {
    async fn publish(&self, event: &BidEvent) -> Result<(), BrokerError> {
        let payload = serde_json::to_string(event)?;
        self.producer
            .send_message(&self.topic, &event.item_id().to_string(), &payload)
            .await
    }
}
// endregion: --- Kafka Producer

// region:    --- Kafka Manager
pub struct KafkaManager {
    producer: KafkaProducer,
    brokers: String,
}

/// KafkaManager 구현
impl KafkaManager {
    pub fn new(brokers: &str) -> Result<Self, BrokerError> {
        Ok(KafkaManager {
            producer: KafkaProducer::new(brokers)?,
            brokers: brokers.to_string(),
        })
    }

    /// 입찰 이벤트 발행기 생성
    pub fn publisher(&self, topic: &str) -> KafkaPublisher {
        KafkaPublisher::new(self.producer.clone(), topic)
    }

    /// 토픽 생성
    pub async fn create_topic(
        &self,
        topic_name: &str,
        num_partitions: i32,
        replication_factor: i32,
    ) -> Result<(), BrokerError> {
        info!("{:<12} --> Kafka 토픽 생성 시작: {}", "Manager", topic_name);

        let admin_client: AdminClient<DefaultClientContext> = ClientConfig::new()
            .set("bootstrap.servers", &self.brokers)
            .create()
            .map_err(|e| BrokerError::Client(format!("AdminClient 생성 실패: {:?}", e)))?;

        let new_topic = NewTopic::new(
            topic_name,
            num_partitions,
            TopicReplication::Fixed(replication_factor),
        );

        match admin_client
            .create_topics(&[new_topic], &AdminOptions::new())
            .await
        {
            Ok(_) => {
                info!("{:<12} --> Kafka 토픽 생성 성공: {}", "Manager", topic_name);
                Ok(())
            }
            Err(e) => {
                error!("{:<12} --> Kafka 토픽 생성 실패: {:?}", "Manager", e);
                Err(BrokerError::Client(format!("토픽 생성 실패: {:?}", e)))
            }
        }
    }
}

// endregion: --- Kafka Manager
