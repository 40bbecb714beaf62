// region:    --- Imports
use crate::auction::model::{Auction, AuctionItem};
use crate::bidding::model::BidHistoryEntry;
use crate::error::CatalogError;
use crate::store::LedgerStore;
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

// endregion: --- Imports

// region:    --- Query Handlers

/// 경매 목록 조회 (시작 시간 순)
pub async fn list_auctions(store: &dyn LedgerStore) -> Result<Vec<Auction>, CatalogError> {
    info!("{:<12} --> 경매 목록 조회", "Query");
    Ok(store.list_auctions().await?)
}

/// 경매 조회
pub async fn get_auction(
    store: &dyn LedgerStore,
    auction_id: Uuid,
) -> Result<Auction, CatalogError> {
    info!("{:<12} --> 경매 조회 id: {}", "Query", auction_id);
    store
        .get_auction(auction_id)
        .await?
        .ok_or(CatalogError::AuctionNotFound(auction_id))
}

/// 경매 상품 목록 조회
pub async fn list_items(
    store: &dyn LedgerStore,
    auction_id: Uuid,
) -> Result<Vec<AuctionItem>, CatalogError> {
    info!("{:<12} --> 경매 상품 목록 조회 id: {}", "Query", auction_id);
    get_auction(store, auction_id).await?;
    Ok(store.list_items(auction_id).await?)
}

/// 상품 조회
pub async fn get_item(store: &dyn LedgerStore, item_id: Uuid) -> Result<AuctionItem, CatalogError> {
    info!("{:<12} --> 상품 조회 id: {}", "Query", item_id);
    store
        .get_item(item_id)
        .await?
        .ok_or(CatalogError::ItemNotFound(item_id))
}

/// 최고 입찰가 조회
pub async fn get_highest_bid(
    store: &dyn LedgerStore,
    item_id: Uuid,
) -> Result<Option<Decimal>, CatalogError> {
    info!("{:<12} --> 최고 입찰가 조회 id: {}", "Query", item_id);
    get_item(store, item_id).await?;
    Ok(store.get_highest_accepted_amount(item_id).await?)
}

/// 입찰 이력 조회 (높은 금액 순)
pub async fn get_bid_history(
    store: &dyn LedgerStore,
    item_id: Uuid,
) -> Result<Vec<BidHistoryEntry>, CatalogError> {
    info!("{:<12} --> 입찰 이력 조회 id: {}", "Query", item_id);
    get_item(store, item_id).await?;
    Ok(store.highest_bids(item_id).await?)
}

// endregion: --- Query Handlers

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::model::{NewAuction, NewAuctionItem};
    use crate::store::InMemoryStore;
    use chrono::{Duration, Utc};

    async fn seed_auction(store: &InMemoryStore, title: &str, starts_in: i64) -> Auction {
        let start = Utc::now() + Duration::hours(starts_in);
        store
            .insert_auction(NewAuction {
                title: title.to_string(),
                description: None,
                start_time: start,
                end_time: start + Duration::hours(2),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn auctions_are_listed_by_start_time() {
        let store = InMemoryStore::new();
        seed_auction(&store, "나중", 5).await;
        seed_auction(&store, "먼저", -1).await;

        let titles: Vec<String> = list_auctions(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(titles, vec!["먼저", "나중"]);
    }

    #[tokio::test]
    async fn missing_records_map_to_not_found() {
        let store = InMemoryStore::new();
        let id = Uuid::new_v4();

        assert_eq!(
            get_auction(&store, id).await,
            Err(CatalogError::AuctionNotFound(id))
        );
        assert_eq!(
            list_items(&store, id).await,
            Err(CatalogError::AuctionNotFound(id))
        );
        assert_eq!(get_item(&store, id).await, Err(CatalogError::ItemNotFound(id)));
        assert_eq!(
            get_bid_history(&store, id).await,
            Err(CatalogError::ItemNotFound(id))
        );
    }

    #[tokio::test]
    async fn highest_bid_is_empty_without_bids() {
        let store = InMemoryStore::new();
        let auction = seed_auction(&store, "경매", -1).await;
        let item = store
            .insert_item(
                auction.id,
                NewAuctionItem {
                    title: "그림".to_string(),
                    description: None,
                    image_url: None,
                    starting_price: Decimal::from(10),
                },
            )
            .await
            .unwrap();

        assert_eq!(get_highest_bid(&store, item.id).await, Ok(None));
        assert_eq!(list_items(&store, auction.id).await.unwrap(), vec![item]);
    }
}
