/// 경매/상품 생성 커맨드 처리
// region:    --- Imports
use super::model::{Auction, AuctionItem, NewAuction, NewAuctionItem, MAX_AMOUNT};
use crate::error::CatalogError;
use crate::identity::session::SessionContext;
use crate::store::LedgerStore;
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

// endregion: --- Imports

// region:    --- Commands
/// 경매 생성
pub async fn create_auction(
    ctx: &SessionContext,
    cmd: NewAuction,
    store: &dyn LedgerStore,
) -> Result<Auction, CatalogError> {
    let organizer = ctx.current_identity().ok_or(CatalogError::Unauthenticated)?;

    if cmd.title.trim().is_empty() {
        return Err(CatalogError::Validation("경매 제목이 비어 있습니다.".to_string()));
    }
    if cmd.end_time <= cmd.start_time {
        return Err(CatalogError::Validation(
            "종료 시간은 시작 시간 이후여야 합니다.".to_string(),
        ));
    }

    let auction = store.insert_auction(cmd).await?;
    info!(
        "{:<12} --> 경매 생성: id={}, organizer={}",
        "Command", auction.id, organizer
    );
    Ok(auction)
}

/// 경매 상품 생성
pub async fn create_item(
    ctx: &SessionContext,
    auction_id: Uuid,
    cmd: NewAuctionItem,
    store: &dyn LedgerStore,
) -> Result<AuctionItem, CatalogError> {
    ctx.current_identity().ok_or(CatalogError::Unauthenticated)?;

    if cmd.title.trim().is_empty() {
        return Err(CatalogError::Validation("상품 제목이 비어 있습니다.".to_string()));
    }
    if cmd.starting_price < Decimal::ZERO
        || cmd.starting_price > MAX_AMOUNT
        || cmd.starting_price.normalize().scale() > 2
    {
        return Err(CatalogError::Validation(format!(
            "시작 가격이 올바르지 않습니다: {}",
            cmd.starting_price
        )));
    }

    store
        .get_auction(auction_id)
        .await?
        .ok_or(CatalogError::AuctionNotFound(auction_id))?;

    let item = store.insert_item(auction_id, cmd).await?;
    info!(
        "{:<12} --> 상품 생성: id={}, auction={}",
        "Command", item.id, auction_id
    );
    Ok(item)
}
// endregion: --- Commands

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use chrono::{Duration, Utc};

    fn new_auction(hours: i64) -> NewAuction {
        let start = Utc::now();
        NewAuction {
            title: "가을 바자회".to_string(),
            description: None,
            start_time: start,
            end_time: start + Duration::hours(hours),
        }
    }

    fn new_item(starting_price: &str) -> NewAuctionItem {
        NewAuctionItem {
            title: "수제 도자기".to_string(),
            description: Some("작가 기증".to_string()),
            image_url: None,
            starting_price: starting_price.parse().unwrap(),
        }
    }

    #[tokio::test]
    async fn create_requires_session() {
        let store = InMemoryStore::new();
        assert_eq!(
            create_auction(&SessionContext::anonymous(), new_auction(2), &store).await,
            Err(CatalogError::Unauthenticated)
        );
        assert_eq!(store.operation_count(), 0);
    }

    #[tokio::test]
    async fn auction_window_must_be_positive() {
        let store = InMemoryStore::new();
        let ctx = SessionContext::authenticated(Uuid::new_v4());
        assert!(matches!(
            create_auction(&ctx, new_auction(0), &store).await,
            Err(CatalogError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn item_is_created_without_current_price() {
        let store = InMemoryStore::new();
        let ctx = SessionContext::authenticated(Uuid::new_v4());
        let auction = create_auction(&ctx, new_auction(2), &store).await.unwrap();

        let item = create_item(&ctx, auction.id, new_item("25.50"), &store)
            .await
            .unwrap();
        assert_eq!(item.auction_id, auction.id);
        assert_eq!(item.current_price, None);
        assert_eq!(item.reference_price(), "25.5".parse::<Decimal>().unwrap());
    }

    #[tokio::test]
    async fn item_needs_existing_auction_and_valid_price() {
        let store = InMemoryStore::new();
        let ctx = SessionContext::authenticated(Uuid::new_v4());
        let missing = Uuid::new_v4();

        assert_eq!(
            create_item(&ctx, missing, new_item("10"), &store).await,
            Err(CatalogError::AuctionNotFound(missing))
        );
        assert!(matches!(
            create_item(&ctx, missing, new_item("-1"), &store).await,
            Err(CatalogError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn starting_price_must_fit_numeric_column() {
        let store = InMemoryStore::new();
        let ctx = SessionContext::authenticated(Uuid::new_v4());
        let auction = create_auction(&ctx, new_auction(2), &store).await.unwrap();

        let item = create_item(&ctx, auction.id, new_item("9999999999.99"), &store)
            .await
            .unwrap();
        assert_eq!(item.starting_price, MAX_AMOUNT);

        assert!(matches!(
            create_item(&ctx, auction.id, new_item("10000000000"), &store).await,
            Err(CatalogError::Validation(_))
        ));
    }
}
