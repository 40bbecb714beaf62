//! 인메모리 저장소
//!
//! 데이터베이스 없이 실행할 때와 테스트에서 사용한다.
//! 상품마다 별도의 락(`ItemLedger`)을 두고, `accept_bid` 는 해당 상품의 락
//! 안에서 현재 가격 비교와 입찰 기록을 함께 처리한다. 서로 다른 상품의
//! 입찰은 서로 기다리지 않는다.
// region:    --- Imports
use super::{IdentityStore, LedgerStore};
use crate::auction::model::{Auction, AuctionItem, NewAuction, NewAuctionItem};
use crate::bidding::model::{Bid, BidHistoryEntry};
use crate::error::StoreError;
use crate::identity::model::{PhoneVerification, User};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

// endregion: --- Imports

/// 상품 하나와 그 상품의 입찰 기록 (수락 순서)
struct ItemLedger {
    item: AuctionItem,
    bids: Vec<Bid>,
}

type ItemSlot = Arc<Mutex<ItemLedger>>;

#[derive(Default)]
struct MemoryState {
    auctions: Vec<Auction>,
    // 생성 순서
    items: Vec<(Uuid, ItemSlot)>,
    users: HashMap<Uuid, User>,
    verifications: HashMap<String, PhoneVerification>,
}

// region:    --- In Memory Store
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<MemoryState>>,
    operations: Arc<AtomicUsize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 지금까지 호출된 저장소 연산 수
    pub fn operation_count(&self) -> usize {
        self.operations.load(Ordering::SeqCst)
    }

    /// 상품의 모든 입찰을 기록된 순서대로 반환
    pub async fn bids_in_acceptance_order(&self, item_id: Uuid) -> Vec<Bid> {
        match self.slot(item_id).await {
            Some(slot) => slot.lock().await.bids.clone(),
            None => Vec::new(),
        }
    }

    /// 상품 락 조회 (전체 상태 락은 바로 놓는다)
    async fn slot(&self, item_id: Uuid) -> Option<ItemSlot> {
        let state = self.state.read().await;
        state
            .items
            .iter()
            .find(|(id, _)| *id == item_id)
            .map(|(_, slot)| Arc::clone(slot))
    }

    async fn all_slots(&self) -> Vec<ItemSlot> {
        let state = self.state.read().await;
        state.items.iter().map(|(_, slot)| Arc::clone(slot)).collect()
    }

    fn touch(&self) {
        self.operations.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl LedgerStore for InMemoryStore {
    async fn list_auctions(&self) -> Result<Vec<Auction>, StoreError> {
        self.touch();
        let state = self.state.read().await;
        let mut auctions = state.auctions.clone();
        auctions.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        Ok(auctions)
    }

    async fn get_auction(&self, auction_id: Uuid) -> Result<Option<Auction>, StoreError> {
        self.touch();
        let state = self.state.read().await;
        Ok(state.auctions.iter().find(|a| a.id == auction_id).cloned())
    }

    async fn insert_auction(&self, auction: NewAuction) -> Result<Auction, StoreError> {
        self.touch();
        let now = Utc::now();
        let auction = Auction {
            id: Uuid::new_v4(),
            title: auction.title,
            description: auction.description,
            start_time: auction.start_time,
            end_time: auction.end_time,
            created_at: now,
            updated_at: now,
        };
        self.state.write().await.auctions.push(auction.clone());
        Ok(auction)
    }

    async fn list_items(&self, auction_id: Uuid) -> Result<Vec<AuctionItem>, StoreError> {
        self.touch();
        let mut items = Vec::new();
        for slot in self.all_slots().await {
            let ledger = slot.lock().await;
            if ledger.item.auction_id == auction_id {
                items.push(ledger.item.clone());
            }
        }
        Ok(items)
    }

    async fn get_item(&self, item_id: Uuid) -> Result<Option<AuctionItem>, StoreError> {
        self.touch();
        match self.slot(item_id).await {
            Some(slot) => Ok(Some(slot.lock().await.item.clone())),
            None => Ok(None),
        }
    }

    async fn insert_item(
        &self,
        auction_id: Uuid,
        item: NewAuctionItem,
    ) -> Result<AuctionItem, StoreError> {
        self.touch();
        let now = Utc::now();
        let item = AuctionItem {
            id: Uuid::new_v4(),
            auction_id,
            title: item.title,
            description: item.description,
            image_url: item.image_url,
            starting_price: item.starting_price,
            current_price: None,
            created_at: now,
            updated_at: now,
        };
        let slot = Arc::new(Mutex::new(ItemLedger {
            item: item.clone(),
            bids: Vec::new(),
        }));
        self.state.write().await.items.push((item.id, slot));
        Ok(item)
    }

    async fn get_highest_accepted_amount(
        &self,
        item_id: Uuid,
    ) -> Result<Option<Decimal>, StoreError> {
        self.touch();
        Ok(self
            .bids_in_acceptance_order(item_id)
            .await
            .iter()
            .map(|bid| bid.amount)
            .max())
    }

    async fn highest_bids(&self, item_id: Uuid) -> Result<Vec<BidHistoryEntry>, StoreError> {
        self.touch();
        let bids = self.bids_in_acceptance_order(item_id).await;
        let state = self.state.read().await;
        let mut entries: Vec<BidHistoryEntry> = bids
            .into_iter()
            .map(|bid| BidHistoryEntry {
                id: bid.id,
                item_id: bid.item_id,
                bidder_id: bid.bidder_id,
                bidder_name: state
                    .users
                    .get(&bid.bidder_id)
                    .and_then(|user| user.name.clone()),
                amount: bid.amount,
                created_at: bid.created_at,
            })
            .collect();
        entries.sort_by(|a, b| {
            b.amount
                .cmp(&a.amount)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        Ok(entries)
    }

    async fn accept_bid(
        &self,
        item_id: Uuid,
        bidder_id: Uuid,
        amount: Decimal,
        expected_prior_price: Option<Decimal>,
    ) -> Result<Bid, StoreError> {
        self.touch();
        let slot = self.slot(item_id).await.ok_or(StoreError::Conflict)?;
        // 비교부터 기록까지 상품 락을 놓지 않는다
        let mut ledger = slot.lock().await;
        let now = Utc::now();

        if ledger.item.current_price != expected_prior_price
            || amount <= ledger.item.reference_price()
        {
            return Err(StoreError::Conflict);
        }
        ledger.item.current_price = Some(amount);
        ledger.item.updated_at = now;

        let bid = Bid {
            id: Uuid::new_v4(),
            item_id,
            bidder_id,
            amount,
            created_at: now,
        };
        ledger.bids.push(bid.clone());
        Ok(bid)
    }
}

#[async_trait]
impl IdentityStore for InMemoryStore {
    async fn upsert_phone_verification(
        &self,
        phone_number: &str,
        user_id: Option<Uuid>,
    ) -> Result<PhoneVerification, StoreError> {
        self.touch();
        let record = PhoneVerification {
            phone_number: phone_number.to_string(),
            user_id,
            verified: false,
            updated_at: Utc::now(),
        };
        self.state
            .write()
            .await
            .verifications
            .insert(phone_number.to_string(), record.clone());
        Ok(record)
    }

    async fn mark_phone_verified(
        &self,
        phone_number: &str,
        user_id: Uuid,
    ) -> Result<PhoneVerification, StoreError> {
        self.touch();
        let record = PhoneVerification {
            phone_number: phone_number.to_string(),
            user_id: Some(user_id),
            verified: true,
            updated_at: Utc::now(),
        };
        self.state
            .write()
            .await
            .verifications
            .insert(phone_number.to_string(), record.clone());
        Ok(record)
    }

    async fn get_phone_verification(
        &self,
        phone_number: &str,
    ) -> Result<Option<PhoneVerification>, StoreError> {
        self.touch();
        Ok(self
            .state
            .read()
            .await
            .verifications
            .get(phone_number)
            .cloned())
    }

    async fn find_or_create_user(
        &self,
        phone_number: &str,
        name: Option<String>,
    ) -> Result<User, StoreError> {
        self.touch();
        let mut state = self.state.write().await;
        if let Some(user) = state
            .users
            .values_mut()
            .find(|user| user.phone_number == phone_number)
        {
            if name.is_some() {
                user.name = name;
            }
            return Ok(user.clone());
        }

        let user = User {
            id: Uuid::new_v4(),
            phone_number: phone_number.to_string(),
            name,
            created_at: Utc::now(),
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }
}
// endregion: --- In Memory Store

// endregion: --- Tests
