// region:    --- Imports
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

// endregion: --- Imports

// region:    --- Config
/// 환경 변수로부터 읽어오는 서비스 설정
#[derive(Debug, Clone)]
pub struct Config {
    /// 설정되지 않으면 인메모리 저장소를 사용한다
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub database_acquire_timeout: Duration,
    pub port: u16,
    /// 설정되지 않으면 입찰 이벤트를 발행하지 않는다
    pub kafka_brokers: Option<String>,
    pub bid_events_topic: String,
    pub session_ttl_hours: i64,
    pub twilio: Option<TwilioConfig>,
    /// Twilio 없이 실행할 때만 명시적으로 설정하는 개발용 고정 인증 코드
    pub dev_otp_code: Option<String>,
}

/// Twilio Verify 설정
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub verify_service_sid: String,
}

impl Config {
    /// 환경 변수에서 설정 로드 (.env 파일이 있으면 먼저 읽는다)
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let twilio = match (
            env::var("TWILIO_ACCOUNT_SID").ok(),
            env::var("TWILIO_AUTH_TOKEN").ok(),
            env::var("TWILIO_VERIFY_SERVICE_SID").ok(),
        ) {
            (Some(account_sid), Some(auth_token), Some(verify_service_sid)) => Some(TwilioConfig {
                account_sid,
                auth_token,
                verify_service_sid,
            }),
            _ => None,
        };

        let dev_otp_code = env::var("DEV_OTP_CODE").ok();
        check_otp_settings(twilio.as_ref(), dev_otp_code.as_deref())?;

        Ok(Self {
            database_url: env::var("DATABASE_URL").ok(),
            database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 5)?,
            database_acquire_timeout: Duration::from_secs(parse_var(
                "DATABASE_ACQUIRE_TIMEOUT_SECS",
                5,
            )?),
            port: parse_var("PORT", 3000)?,
            kafka_brokers: env::var("KAFKA_BROKERS").ok(),
            bid_events_topic: env::var("BID_EVENTS_TOPIC").unwrap_or_else(|_| "bids".to_string()),
            session_ttl_hours: parse_var("SESSION_TTL_HOURS", 24)?,
            twilio,
            dev_otp_code,
        })
    }
}

/// 인증 코드 확인 수단이 하나도 없으면 시작하지 않는다
fn check_otp_settings(twilio: Option<&TwilioConfig>, dev_otp_code: Option<&str>) -> Result<()> {
    if twilio.is_some() {
        return Ok(());
    }
    let code = dev_otp_code.filter(|code| !code.trim().is_empty()).context(
        "TWILIO_ACCOUNT_SID/TWILIO_AUTH_TOKEN/TWILIO_VERIFY_SERVICE_SID or DEV_OTP_CODE must be set",
    )?;
    if code.trim().len() < 6 {
        anyhow::bail!("DEV_OTP_CODE must be at least 6 characters");
    }
    Ok(())
}

/// 숫자형 환경 변수 파싱 (없으면 기본값)
fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("{} must be a valid number", key)),
        Err(_) => Ok(default),
    }
}
// endregion: --- Config
