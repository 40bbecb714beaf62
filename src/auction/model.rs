use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// NUMERIC(12,2) 컬럼에 저장할 수 있는 최대 금액 (9999999999.99)
// 999_999_999_999 = 232 * 2^32 + 3_567_587_327
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

// 경매 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Auction {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// 경매 상품 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuctionItem {
    pub id: Uuid,
    pub auction_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub starting_price: Decimal,
    /// 입찰이 없으면 비어 있다
    pub current_price: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AuctionItem {
    /// 새 입찰이 넘어야 하는 기준 가격
    pub fn reference_price(&self) -> Decimal {
        self.current_price.unwrap_or(self.starting_price)
    }
}

/// 경매 생성 요청
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuction {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// 경매 상품 생성 요청
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuctionItem {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub starting_price: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_amount_matches_column_precision() {
        assert_eq!(MAX_AMOUNT.to_string(), "9999999999.99");
        assert_eq!(MAX_AMOUNT.scale(), 2);
    }
}
