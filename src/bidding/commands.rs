/// 입찰 커맨드 처리
/// 기준 가격(현재 가격, 없으면 시작 가격)보다 높은 입찰만 수락한다.
/// 현재 가격 변경과 입찰 기록은 저장소에서 원자적으로 처리되고,
/// 그 사이 다른 입찰이 가격을 바꿨으면 새 가격으로 다시 검증한다.
// region:    --- Imports
use super::model::{BidReceipt, PlaceBidRequest};
use crate::auction::events::BidEvent;
use crate::auction::model::MAX_AMOUNT;
use crate::error::{BidError, StoreError};
use crate::identity::session::SessionContext;
use crate::message_broker::EventPublisher;
use crate::store::LedgerStore;
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Commands
// 충돌 시 최대 재시도 횟수
pub const MAX_CONFLICT_RETRIES: u32 = 3;

/// 입찰
pub async fn submit_bid(
    ctx: &SessionContext,
    cmd: PlaceBidRequest,
    store: &dyn LedgerStore,
    publisher: &dyn EventPublisher,
) -> Result<BidReceipt, BidError> {
    // 저장소 조회 전에 로그인 여부 확인
    let bidder_id = ctx.current_identity().ok_or(BidError::Unauthenticated)?;
    validate_amount(cmd.amount)?;

    info!(
        "{:<12} --> 입찰 요청 처리 시작: item={}, bidder={}, 금액={}",
        "Command", cmd.item_id, bidder_id, cmd.amount
    );
    let mut retries = 0;

    loop {
        // 아이템 정보 조회
        let item = store
            .get_item(cmd.item_id)
            .await?
            .ok_or(BidError::ItemNotFound(cmd.item_id))?;
        let auction = store
            .get_auction(item.auction_id)
            .await?
            .ok_or(BidError::ItemNotFound(cmd.item_id))?;

        // 경매 시간 검증
        let now = Utc::now();
        if now < auction.start_time {
            return Err(BidError::AuctionNotStarted {
                starts_at: auction.start_time,
            });
        }
        if now > auction.end_time {
            return Err(BidError::AuctionClosed {
                ended_at: auction.end_time,
            });
        }

        let reference_price = item.reference_price();
        if cmd.amount <= reference_price {
            info!(
                "{:<12} --> 입찰 금액이 기준 가격 이하: 금액={}, 기준={}",
                "Command", cmd.amount, reference_price
            );
            return Err(BidError::BidTooLow { reference_price });
        }

        match store
            .accept_bid(item.id, bidder_id, cmd.amount, item.current_price)
            .await
        {
            Ok(bid) => {
                info!(
                    "{:<12} --> 입찰 성공: item={}, 현재 가격={}",
                    "Command", bid.item_id, bid.amount
                );

                let event = BidEvent::BidPlaced {
                    bid_id: bid.id,
                    item_id: bid.item_id,
                    bidder_id: bid.bidder_id,
                    amount: bid.amount,
                    timestamp: bid.created_at,
                };
                // 입찰은 이미 커밋되었으므로 발행 실패는 기록만 한다
                if let Err(e) = publisher.publish(&event).await {
                    warn!("{:<12} --> 입찰 이벤트 발행 실패: {}", "Command", e);
                }

                return Ok(BidReceipt {
                    bid_id: bid.id,
                    new_current_price: bid.amount,
                });
            }
            Err(StoreError::Conflict) if retries < MAX_CONFLICT_RETRIES => {
                retries += 1;
                warn!(
                    "{:<12} --> 현재 가격 변경으로 인한 충돌: 재시도 {}/{}",
                    "Command", retries, MAX_CONFLICT_RETRIES
                );
                continue;
            }
            Err(StoreError::Conflict) => {
                warn!("{:<12} --> 최대 재시도 횟수 초과", "Command");
                return Err(BidError::Unavailable(
                    "동시 입찰 재시도 횟수 초과".to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// 양수이고 소수점 둘째 자리까지, 저장 가능한 범위 안의 금액만 허용
fn validate_amount(amount: Decimal) -> Result<(), BidError> {
    if amount <= Decimal::ZERO || amount > MAX_AMOUNT || amount.normalize().scale() > 2 {
        return Err(BidError::InvalidAmount(amount));
    }
    Ok(())
}

// endregion: --- Commands

// endregion: --- Tests
