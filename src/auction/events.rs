use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum BidEvent {
    // 입찰 이벤트 (커밋 이후 발행)
    BidPlaced {
        bid_id: Uuid,
        item_id: Uuid,
        bidder_id: Uuid,
        amount: Decimal,
        timestamp: DateTime<Utc>,
    },
}

impl BidEvent {
    /// 메시지 키로 사용되는 상품 id
    pub fn item_id(&self) -> Uuid {
        match self {
            BidEvent::BidPlaced { item_id, .. } => *item_id,
        }
    }
}
