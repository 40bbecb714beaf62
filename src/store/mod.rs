//! 경매/상품/입찰/전화번호 인증 저장소 트레이트
//!
//! 입찰 수락은 `accept_bid` 하나로 처리한다. 구현체는 현재 가격의 조건부
//! 업데이트(compare-and-set)와 입찰 기록 추가를 하나의 원자적 단위로 실행해야
//! 하며, 읽은 이후 현재 가격이 바뀌었으면 `StoreError::Conflict` 를 반환한다.
// region:    --- Imports
use crate::auction::model::{Auction, AuctionItem, NewAuction, NewAuctionItem};
use crate::bidding::model::{Bid, BidHistoryEntry};
use crate::error::StoreError;
use crate::identity::model::{PhoneVerification, User};
use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

// endregion: --- Imports

// region:    --- Modules
pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgLedgerStore;
// endregion: --- Modules

// region:    --- Ledger Store Trait
/// 경매 원장 저장소
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// 시작 시간 오름차순
    async fn list_auctions(&self) -> Result<Vec<Auction>, StoreError>;

    async fn get_auction(&self, auction_id: Uuid) -> Result<Option<Auction>, StoreError>;

    async fn insert_auction(&self, auction: NewAuction) -> Result<Auction, StoreError>;

    /// 생성 시간 오름차순
    async fn list_items(&self, auction_id: Uuid) -> Result<Vec<AuctionItem>, StoreError>;

    async fn get_item(&self, item_id: Uuid) -> Result<Option<AuctionItem>, StoreError>;

    async fn insert_item(
        &self,
        auction_id: Uuid,
        item: NewAuctionItem,
    ) -> Result<AuctionItem, StoreError>;

    async fn get_highest_accepted_amount(
        &self,
        item_id: Uuid,
    ) -> Result<Option<Decimal>, StoreError>;

    /// 금액 내림차순, 같은 금액은 먼저 들어온 입찰이 앞선다
    async fn highest_bids(&self, item_id: Uuid) -> Result<Vec<BidHistoryEntry>, StoreError>;

    /// 현재 가격이 `expected_prior_price` 그대로일 때만 `amount` 로 올리고
    /// 입찰을 기록한다. 둘 중 하나만 반영되는 일은 없다.
    async fn accept_bid(
        &self,
        item_id: Uuid,
        bidder_id: Uuid,
        amount: Decimal,
        expected_prior_price: Option<Decimal>,
    ) -> Result<Bid, StoreError>;
}
// endregion: --- Ledger Store Trait

// region:    --- Identity Store Trait
/// 사용자 및 전화번호 인증 저장소
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// 인증 대기 상태로 생성하거나 덮어쓴다
    async fn upsert_phone_verification(
        &self,
        phone_number: &str,
        user_id: Option<Uuid>,
    ) -> Result<PhoneVerification, StoreError>;

    async fn mark_phone_verified(
        &self,
        phone_number: &str,
        user_id: Uuid,
    ) -> Result<PhoneVerification, StoreError>;

    async fn get_phone_verification(
        &self,
        phone_number: &str,
    ) -> Result<Option<PhoneVerification>, StoreError>;

    /// 전화번호로 사용자를 찾고 없으면 생성한다
    async fn find_or_create_user(
        &self,
        phone_number: &str,
        name: Option<String>,
    ) -> Result<User, StoreError>;
}
// endregion: --- Identity Store Trait
