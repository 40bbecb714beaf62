use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// 전화번호 인증 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PhoneVerification {
    pub phone_number: String,
    pub user_id: Option<Uuid>,
    pub verified: bool,
    pub updated_at: DateTime<Utc>,
}

// 사용자 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub phone_number: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 인증 코드 발송 요청
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpRequest {
    pub phone_number: String,
}

/// 인증 코드 확인 요청
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpRequest {
    pub phone_number: String,
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// 인증 성공 시 발급되는 세션 정보
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedIn {
    pub token: String,
    pub user_id: Uuid,
    pub phone_number: String,
}
