use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// 입찰 모델 (저장 후 변경되지 않는다)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: Uuid,
    pub item_id: Uuid,
    pub bidder_id: Uuid,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

// 입찰 이력 항목 (입찰자 이름 포함)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct BidHistoryEntry {
    pub id: Uuid,
    pub item_id: Uuid,
    pub bidder_id: Uuid,
    pub bidder_name: Option<String>,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// 입찰 요청 (입찰자는 세션에서 가져온다)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceBidRequest {
    pub item_id: Uuid,
    pub amount: Decimal,
}

/// 입찰 성공 응답
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidReceipt {
    pub bid_id: Uuid,
    pub new_current_price: Decimal,
}
