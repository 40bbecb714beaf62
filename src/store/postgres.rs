//! PostgreSQL 저장소
// region:    --- Imports
use super::{IdentityStore, LedgerStore};
use crate::auction::model::{Auction, AuctionItem, NewAuction, NewAuctionItem};
use crate::bidding::model::{Bid, BidHistoryEntry};
use crate::database::DatabaseManager;
use crate::error::StoreError;
use crate::identity::model::{PhoneVerification, User};
use crate::query::queries;
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::Row;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

// endregion: --- Imports

// region:    --- Postgres Store
pub struct PgLedgerStore {
    db_manager: Arc<DatabaseManager>,
}

impl PgLedgerStore {
    pub fn new(db_manager: Arc<DatabaseManager>) -> Self {
        Self { db_manager }
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    async fn list_auctions(&self) -> Result<Vec<Auction>, StoreError> {
        Ok(sqlx::query_as::<_, Auction>(queries::LIST_AUCTIONS)
            .fetch_all(self.db_manager.pool())
            .await?)
    }

    async fn get_auction(&self, auction_id: Uuid) -> Result<Option<Auction>, StoreError> {
        Ok(sqlx::query_as::<_, Auction>(queries::GET_AUCTION)
            .bind(auction_id)
            .fetch_optional(self.db_manager.pool())
            .await?)
    }

    async fn insert_auction(&self, auction: NewAuction) -> Result<Auction, StoreError> {
        Ok(sqlx::query_as::<_, Auction>(queries::INSERT_AUCTION)
            .bind(Uuid::new_v4())
            .bind(&auction.title)
            .bind(&auction.description)
            .bind(auction.start_time)
            .bind(auction.end_time)
            .fetch_one(self.db_manager.pool())
            .await?)
    }

    async fn list_items(&self, auction_id: Uuid) -> Result<Vec<AuctionItem>, StoreError> {
        Ok(sqlx::query_as::<_, AuctionItem>(queries::LIST_ITEMS)
            .bind(auction_id)
            .fetch_all(self.db_manager.pool())
            .await?)
    }

    async fn get_item(&self, item_id: Uuid) -> Result<Option<AuctionItem>, StoreError> {
        Ok(sqlx::query_as::<_, AuctionItem>(queries::GET_ITEM)
            .bind(item_id)
            .fetch_optional(self.db_manager.pool())
            .await?)
    }

    async fn insert_item(
        &self,
        auction_id: Uuid,
        item: NewAuctionItem,
    ) -> Result<AuctionItem, StoreError> {
        Ok(sqlx::query_as::<_, AuctionItem>(queries::INSERT_ITEM)
            .bind(Uuid::new_v4())
            .bind(auction_id)
            .bind(&item.title)
            .bind(&item.description)
            .bind(&item.image_url)
            .bind(item.starting_price)
            .fetch_one(self.db_manager.pool())
            .await?)
    }

    async fn get_highest_accepted_amount(
        &self,
        item_id: Uuid,
    ) -> Result<Option<Decimal>, StoreError> {
        let row = sqlx::query(queries::GET_HIGHEST_BID)
            .bind(item_id)
            .fetch_one(self.db_manager.pool())
            .await?;
        Ok(row.try_get("highest_bid")?)
    }

    async fn highest_bids(&self, item_id: Uuid) -> Result<Vec<BidHistoryEntry>, StoreError> {
        Ok(sqlx::query_as::<_, BidHistoryEntry>(queries::GET_HIGHEST_BIDS)
            .bind(item_id)
            .fetch_all(self.db_manager.pool())
            .await?)
    }

    async fn accept_bid(
        &self,
        item_id: Uuid,
        bidder_id: Uuid,
        amount: Decimal,
        expected_prior_price: Option<Decimal>,
    ) -> Result<Bid, StoreError> {
        self.db_manager
            .transaction(|tx| {
                Box::pin(async move {
                    let now = Utc::now();

                    // 현재 가격 확인 및 업데이트 (행 잠금)
                    let updated = sqlx::query(queries::UPDATE_ITEM_CURRENT_PRICE)
                        .bind(item_id)
                        .bind(amount)
                        .bind(expected_prior_price)
                        .bind(now)
                        .fetch_optional(&mut **tx)
                        .await?;

                    if updated.is_none() {
                        warn!(
                            "{:<12} --> 현재 가격이 변경됨: item={}, 예상 가격={:?}",
                            "Store", item_id, expected_prior_price
                        );
                        return Err(StoreError::Conflict);
                    }

                    // 입찰 기록 추가
                    let bid = sqlx::query_as::<_, Bid>(queries::INSERT_BID)
                        .bind(Uuid::new_v4())
                        .bind(item_id)
                        .bind(bidder_id)
                        .bind(amount)
                        .bind(now)
                        .fetch_one(&mut **tx)
                        .await?;

                    info!(
                        "{:<12} --> 입찰 기록 완료: item={}, 금액={}",
                        "Store", item_id, amount
                    );
                    Ok(bid)
                })
            })
            .await
    }
}

#[async_trait]
impl IdentityStore for PgLedgerStore {
    async fn upsert_phone_verification(
        &self,
        phone_number: &str,
        user_id: Option<Uuid>,
    ) -> Result<PhoneVerification, StoreError> {
        Ok(
            sqlx::query_as::<_, PhoneVerification>(queries::UPSERT_PHONE_VERIFICATION)
                .bind(phone_number)
                .bind(user_id)
                .fetch_one(self.db_manager.pool())
                .await?,
        )
    }

    async fn mark_phone_verified(
        &self,
        phone_number: &str,
        user_id: Uuid,
    ) -> Result<PhoneVerification, StoreError> {
        Ok(
            sqlx::query_as::<_, PhoneVerification>(queries::MARK_PHONE_VERIFIED)
                .bind(phone_number)
                .bind(user_id)
                .fetch_one(self.db_manager.pool())
                .await?,
        )
    }

    async fn get_phone_verification(
        &self,
        phone_number: &str,
    ) -> Result<Option<PhoneVerification>, StoreError> {
        Ok(
            sqlx::query_as::<_, PhoneVerification>(queries::GET_PHONE_VERIFICATION)
                .bind(phone_number)
                .fetch_optional(self.db_manager.pool())
                .await?,
        )
    }

    async fn find_or_create_user(
        &self,
        phone_number: &str,
        name: Option<String>,
    ) -> Result<User, StoreError> {
        Ok(sqlx::query_as::<_, User>(queries::UPSERT_USER)
            .bind(Uuid::new_v4())
            .bind(phone_number)
            .bind(name)
            .fetch_one(self.db_manager.pool())
            .await?)
    }
}
// endregion: --- Postgres Store
