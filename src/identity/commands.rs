/// 전화번호 인증 커맨드 처리
/// 1. 인증 코드 발송
/// 2. 인증 코드 확인 및 세션 발급
/// 3. 로그아웃
// region:    --- Imports
use super::model::{PhoneVerification, SignedIn};
use super::otp::OtpProvider;
use super::phone::normalize_phone;
use super::session::{Session, SessionContext, SessionStore};
use crate::error::IdentityError;
use crate::store::IdentityStore;
use chrono::Utc;
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Commands
/// 1. 인증 코드 발송
pub async fn request_otp(
    raw_phone: &str,
    ctx: &SessionContext,
    otp: &dyn OtpProvider,
    store: &dyn IdentityStore,
) -> Result<PhoneVerification, IdentityError> {
    let phone_number = normalize_phone(raw_phone)?;
    info!("{:<12} --> 인증 코드 요청: {}", "Identity", phone_number);

    otp.send_otp(&phone_number).await?;

    Ok(store
        .upsert_phone_verification(&phone_number, ctx.current_identity())
        .await?)
}

/// 2. 인증 코드 확인 (처음 인증된 번호는 사용자를 생성한다)
pub async fn verify_otp(
    raw_phone: &str,
    code: &str,
    name: Option<String>,
    otp: &dyn OtpProvider,
    store: &dyn IdentityStore,
    sessions: &SessionStore,
) -> Result<SignedIn, IdentityError> {
    let phone_number = normalize_phone(raw_phone)?;

    if let Err(e) = otp.verify_otp(&phone_number, code).await {
        warn!("{:<12} --> 인증 실패: {} ({})", "Identity", phone_number, e);
        return Err(e);
    }

    let user = store.find_or_create_user(&phone_number, name).await?;
    store.mark_phone_verified(&phone_number, user.id).await?;

    let token = sessions
        .create_session(Session {
            user_id: user.id,
            phone_number: phone_number.clone(),
            created_at: Utc::now(),
        })
        .await;

    info!("{:<12} --> 인증 완료: user={}", "Identity", user.id);
    Ok(SignedIn {
        token,
        user_id: user.id,
        phone_number,
    })
}

/// 전화번호 인증 상태 조회 (본인에게 연결된 번호만 보인다)
pub async fn get_phone_verification(
    raw_phone: &str,
    ctx: &SessionContext,
    store: &dyn IdentityStore,
) -> Result<Option<PhoneVerification>, IdentityError> {
    let user_id = ctx.current_identity().ok_or(IdentityError::Unauthenticated)?;
    let phone_number = normalize_phone(raw_phone)?;
    Ok(store
        .get_phone_verification(&phone_number)
        .await?
        .filter(|record| record.user_id == Some(user_id)))
}

/// 3. 로그아웃
pub async fn sign_out(token: Option<&str>, sessions: &SessionStore) -> Result<(), IdentityError> {
    let token = token.ok_or(IdentityError::Unauthenticated)?;
    if sessions.delete_session(token).await {
        Ok(())
    } else {
        Err(IdentityError::Unauthenticated)
    }
}
// endregion: --- Commands

// endregion: --- Tests
