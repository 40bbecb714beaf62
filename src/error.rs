//! 계층별 에러 타입과 HTTP 응답 변환
// region:    --- Imports
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

// endregion: --- Imports

// region:    --- Store Error
/// 저장소 에러
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    /// 읽은 이후 다른 요청이 현재 가격을 바꿨다
    #[error("동시 변경 충돌")]
    Conflict,
    #[error("저장소를 사용할 수 없습니다: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}
// endregion: --- Store Error

// region:    --- Bid Error
/// 입찰 에러
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BidError {
    #[error("로그인이 필요합니다.")]
    Unauthenticated,
    #[error("입찰 금액이 올바르지 않습니다: {0}")]
    InvalidAmount(Decimal),
    #[error("상품을 찾을 수 없습니다: {0}")]
    ItemNotFound(Uuid),
    #[error("경매가 아직 시작되지 않았습니다. 시작 시간: {starts_at}")]
    AuctionNotStarted { starts_at: DateTime<Utc> },
    #[error("경매가 이미 종료되었습니다. 종료 시간: {ended_at}")]
    AuctionClosed { ended_at: DateTime<Utc> },
    #[error("입찰 금액은 {reference_price} 보다 높아야 합니다.")]
    BidTooLow { reference_price: Decimal },
    #[error("저장소를 사용할 수 없습니다: {0}")]
    Unavailable(String),
}

impl BidError {
    pub fn code(&self) -> &'static str {
        match self {
            BidError::Unauthenticated => "unauthenticated",
            BidError::InvalidAmount(_) => "invalid_amount",
            BidError::ItemNotFound(_) => "item_not_found",
            BidError::AuctionNotStarted { .. } => "auction_not_started",
            BidError::AuctionClosed { .. } => "auction_closed",
            BidError::BidTooLow { .. } => "bid_too_low",
            BidError::Unavailable(_) => "unavailable",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            BidError::Unauthenticated => StatusCode::UNAUTHORIZED,
            BidError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
            BidError::ItemNotFound(_) => StatusCode::NOT_FOUND,
            BidError::AuctionNotStarted { .. }
            | BidError::AuctionClosed { .. }
            | BidError::BidTooLow { .. } => StatusCode::CONFLICT,
            BidError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<StoreError> for BidError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict => BidError::Unavailable("동시 입찰 재시도 횟수 초과".to_string()),
            StoreError::Unavailable(msg) => BidError::Unavailable(msg),
        }
    }
}

impl IntoResponse for BidError {
    fn into_response(self) -> Response {
        match self {
            BidError::BidTooLow { reference_price } => (
                self.status(),
                Json(serde_json::json!({
                    "error": self.code(),
                    "reference_price": reference_price,
                })),
            )
                .into_response(),
            _ => error_response(self.status(), self.code(), self.to_string()),
        }
    }
}
// endregion: --- Bid Error

// region:    --- Catalog Error
/// 경매/상품 조회 및 생성 에러
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CatalogError {
    #[error("로그인이 필요합니다.")]
    Unauthenticated,
    #[error("경매를 찾을 수 없습니다: {0}")]
    AuctionNotFound(Uuid),
    #[error("상품을 찾을 수 없습니다: {0}")]
    ItemNotFound(Uuid),
    #[error("{0}")]
    Validation(String),
    #[error("저장소를 사용할 수 없습니다: {0}")]
    Unavailable(String),
}

impl CatalogError {
    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::Unauthenticated => "unauthenticated",
            CatalogError::AuctionNotFound(_) => "auction_not_found",
            CatalogError::ItemNotFound(_) => "item_not_found",
            CatalogError::Validation(_) => "validation",
            CatalogError::Unavailable(_) => "unavailable",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            CatalogError::Unauthenticated => StatusCode::UNAUTHORIZED,
            CatalogError::AuctionNotFound(_) | CatalogError::ItemNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
            CatalogError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<StoreError> for CatalogError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict => CatalogError::Unavailable("동시 변경 충돌".to_string()),
            StoreError::Unavailable(msg) => CatalogError::Unavailable(msg),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        error_response(self.status(), self.code(), self.to_string())
    }
}
// endregion: --- Catalog Error

// region:    --- Identity Error
/// 전화번호 인증 및 세션 에러
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IdentityError {
    #[error("로그인이 필요합니다.")]
    Unauthenticated,
    #[error("전화번호는 E.164 형식이어야 합니다 (+국가코드 및 번호): {0}")]
    InvalidPhoneNumber(String),
    #[error("인증 코드가 올바르지 않습니다: {0}")]
    InvalidOtp(String),
    #[error("인증 코드 발송 실패: {0}")]
    Provider(String),
    #[error("저장소를 사용할 수 없습니다: {0}")]
    Unavailable(String),
}

impl IdentityError {
    pub fn code(&self) -> &'static str {
        match self {
            IdentityError::Unauthenticated => "unauthenticated",
            IdentityError::InvalidPhoneNumber(_) => "invalid_phone_number",
            IdentityError::InvalidOtp(_) => "invalid_otp",
            IdentityError::Provider(_) => "otp_provider_error",
            IdentityError::Unavailable(_) => "unavailable",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            IdentityError::Unauthenticated | IdentityError::InvalidOtp(_) => {
                StatusCode::UNAUTHORIZED
            }
            IdentityError::InvalidPhoneNumber(_) => StatusCode::BAD_REQUEST,
            IdentityError::Provider(_) => StatusCode::BAD_GATEWAY,
            IdentityError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<StoreError> for IdentityError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict => IdentityError::Unavailable("동시 변경 충돌".to_string()),
            StoreError::Unavailable(msg) => IdentityError::Unavailable(msg),
        }
    }
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        error_response(self.status(), self.code(), self.to_string())
    }
}
// endregion: --- Identity Error

/// 공통 에러 응답 바디
pub(crate) fn error_response(status: StatusCode, code: &str, message: String) -> Response {
    (
        status,
        Json(serde_json::json!({
            "error": code,
            "message": message,
        })),
    )
        .into_response()
}
