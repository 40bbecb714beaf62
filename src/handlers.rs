// region:    --- Imports
use crate::auction::commands::{create_auction, create_item};
use crate::auction::model::{NewAuction, NewAuctionItem};
use crate::bidding::commands::submit_bid;
use crate::bidding::model::PlaceBidRequest;
use crate::error::error_response;
use crate::identity::commands::{get_phone_verification, request_otp, sign_out, verify_otp};
use crate::identity::model::{OtpRequest, VerifyOtpRequest};
use crate::identity::session::SessionContext;
use crate::query;
use crate::state::AppState;
use async_trait::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, FromRequest, FromRequestParts, Path, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use std::convert::Infallible;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use uuid::Uuid;

// endregion: --- Imports

// region:    --- Router
/// 라우터 설정
pub fn routes(state: AppState) -> Router {
    // 테스트 페이지를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/auctions", get(handle_list_auctions).post(handle_create_auction))
        .route("/auctions/:id", get(handle_get_auction))
        .route(
            "/auctions/:id/items",
            get(handle_list_items).post(handle_create_item),
        )
        .route("/items/:id", get(handle_get_item))
        .route("/items/:id/bids", get(handle_get_bid_history))
        .route("/items/:id/highest-bid", get(handle_get_highest_bid))
        .route("/bids", post(handle_bid))
        .route("/auth/otp", post(handle_request_otp))
        .route("/auth/verify", post(handle_verify_otp))
        .route("/auth/phone/:phone", get(handle_get_phone_verification))
        .route("/auth/sign-out", post(handle_sign_out))
        .layer(cors)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .with_state(state)
}
// endregion: --- Router

// region:    --- Session Extractor
/// `Authorization: Bearer <token>` 헤더의 토큰
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
}

/// 세션이 없거나 만료되었으면 익명 컨텍스트
#[async_trait]
impl FromRequestParts<AppState> for SessionContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(state.sessions.context_for(bearer_token(&parts.headers)).await)
    }
}
// endregion: --- Session Extractor

// region:    --- Json Body Extractor
/// 요청 바디를 읽지 못하면 다른 에러와 같은 `{"error","message"}` 형태로 응답
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection_response(rejection)),
        }
    }
}

fn json_rejection_response(rejection: JsonRejection) -> Response {
    warn!("{:<12} --> 요청 바디 해석 실패: {}", "Handler", rejection.body_text());
    let status = match &rejection {
        JsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        _ => StatusCode::BAD_REQUEST,
    };
    error_response(status, "validation", rejection.body_text())
}
// endregion: --- Json Body Extractor

// region:    --- Command Handlers

/// 입찰 요청 처리
pub async fn handle_bid(
    State(state): State<AppState>,
    ctx: SessionContext,
    JsonBody(cmd): JsonBody<PlaceBidRequest>,
) -> impl IntoResponse {
    info!("{:<12} --> 입찰 요청: {:?}", "HandlerCmd", cmd);
    match submit_bid(&ctx, cmd, state.store.as_ref(), state.publisher.as_ref()).await {
        Ok(receipt) => (StatusCode::OK, Json(receipt)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 경매 생성
pub async fn handle_create_auction(
    State(state): State<AppState>,
    ctx: SessionContext,
    JsonBody(cmd): JsonBody<NewAuction>,
) -> impl IntoResponse {
    info!("{:<12} --> 경매 생성 요청: {}", "HandlerCmd", cmd.title);
    match create_auction(&ctx, cmd, state.store.as_ref()).await {
        Ok(auction) => (StatusCode::CREATED, Json(auction)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 경매 상품 생성
pub async fn handle_create_item(
    State(state): State<AppState>,
    ctx: SessionContext,
    Path(auction_id): Path<Uuid>,
    JsonBody(cmd): JsonBody<NewAuctionItem>,
) -> impl IntoResponse {
    info!(
        "{:<12} --> 상품 생성 요청 auction: {}",
        "HandlerCmd", auction_id
    );
    match create_item(&ctx, auction_id, cmd, state.store.as_ref()).await {
        Ok(item) => (StatusCode::CREATED, Json(item)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 인증 코드 발송
pub async fn handle_request_otp(
    State(state): State<AppState>,
    ctx: SessionContext,
    JsonBody(req): JsonBody<OtpRequest>,
) -> impl IntoResponse {
    match request_otp(
        &req.phone_number,
        &ctx,
        state.otp.as_ref(),
        state.identity_store.as_ref(),
    )
    .await
    {
        Ok(pending) => Json(serde_json::json!({
            "phone_number": pending.phone_number
        }))
        .into_response(),
        Err(e) => e.into_response(),
    }
}

/// 인증 코드 확인
pub async fn handle_verify_otp(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<VerifyOtpRequest>,
) -> impl IntoResponse {
    match verify_otp(
        &req.phone_number,
        &req.code,
        req.name,
        state.otp.as_ref(),
        state.identity_store.as_ref(),
        &state.sessions,
    )
    .await
    {
        Ok(signed_in) => Json(signed_in).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 로그아웃
pub async fn handle_sign_out(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    match sign_out(bearer_token(&headers), &state.sessions).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 경매 목록 조회
pub async fn handle_list_auctions(State(state): State<AppState>) -> impl IntoResponse {
    match query::handlers::list_auctions(state.store.as_ref()).await {
        Ok(auctions) => Json(auctions).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 경매 조회
pub async fn handle_get_auction(
    State(state): State<AppState>,
    Path(auction_id): Path<Uuid>,
) -> impl IntoResponse {
    match query::handlers::get_auction(state.store.as_ref(), auction_id).await {
        Ok(auction) => Json(auction).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 경매 상품 목록 조회
pub async fn handle_list_items(
    State(state): State<AppState>,
    Path(auction_id): Path<Uuid>,
) -> impl IntoResponse {
    match query::handlers::list_items(state.store.as_ref(), auction_id).await {
        Ok(items) => Json(items).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 상품 조회
pub async fn handle_get_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> impl IntoResponse {
    match query::handlers::get_item(state.store.as_ref(), item_id).await {
        Ok(item) => Json(item).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 최고 입찰가 조회
pub async fn handle_get_highest_bid(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> impl IntoResponse {
    match query::handlers::get_highest_bid(state.store.as_ref(), item_id).await {
        Ok(highest_bid) => Json(serde_json::json!({
            "item_id": item_id,
            "highest_bid": highest_bid
        }))
        .into_response(),
        Err(e) => e.into_response(),
    }
}

/// 입찰 이력 조회
pub async fn handle_get_bid_history(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> impl IntoResponse {
    match query::handlers::get_bid_history(state.store.as_ref(), item_id).await {
        Ok(history) => Json(history).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 전화번호 인증 상태 조회
pub async fn handle_get_phone_verification(
    State(state): State<AppState>,
    ctx: SessionContext,
    Path(phone): Path<String>,
) -> impl IntoResponse {
    match get_phone_verification(&phone, &ctx, state.identity_store.as_ref()).await {
        Ok(Some(record)) => Json(record).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "error": "phone_verification_not_found",
                "message": "인증 요청 기록이 없습니다."
            })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

// endregion: --- Query Handlers
