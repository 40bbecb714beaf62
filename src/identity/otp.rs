//! 인증 코드(OTP) 발송/확인 프로바이더
// region:    --- Imports
use crate::config::TwilioConfig;
use crate::error::IdentityError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{error, info, warn};

// endregion: --- Imports

/// 외부 인증 프로바이더 (SMS 발송은 프로바이더가 담당)
#[async_trait]
pub trait OtpProvider: Send + Sync {
    async fn send_otp(&self, phone_number: &str) -> Result<(), IdentityError>;

    async fn verify_otp(&self, phone_number: &str, code: &str) -> Result<(), IdentityError>;
}

// region:    --- Twilio Verify
#[derive(Deserialize)]
struct VerificationCheck {
    status: String,
}

/// Twilio Verify API 프로바이더
pub struct TwilioVerifyProvider {
    client: Client,
    config: TwilioConfig,
}

impl TwilioVerifyProvider {
    pub fn new(config: TwilioConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn url(&self, resource: &str) -> String {
        format!(
            "https://verify.twilio.com/v2/Services/{}/{}",
            self.config.verify_service_sid, resource
        )
    }
}

#[async_trait]
impl OtpProvider for TwilioVerifyProvider {
    async fn send_otp(&self, phone_number: &str) -> Result<(), IdentityError> {
        info!("{:<12} --> 인증 코드 발송: {}", "Twilio", phone_number);
        let response = self
            .client
            .post(self.url("Verifications"))
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[("To", phone_number), ("Channel", "sms")])
            .send()
            .await
            .map_err(|e| IdentityError::Provider(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("{:<12} --> Twilio 에러 ({}): {}", "Twilio", status, body);
            return Err(IdentityError::Provider(format!("Twilio returned {}", status)));
        }
        Ok(())
    }

    async fn verify_otp(&self, phone_number: &str, code: &str) -> Result<(), IdentityError> {
        let response = self
            .client
            .post(self.url("VerificationCheck"))
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[("To", phone_number), ("Code", code)])
            .send()
            .await
            .map_err(|e| IdentityError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            return Err(IdentityError::InvalidOtp(format!(
                "Twilio returned {}",
                response.status()
            )));
        }

        let check: VerificationCheck = response
            .json()
            .await
            .map_err(|e| IdentityError::Provider(e.to_string()))?;
        if check.status == "approved" {
            Ok(())
        } else {
            Err(IdentityError::InvalidOtp(check.status))
        }
    }
}
// endregion: --- Twilio Verify

// region:    --- Dev Provider
/// 개발용 프로바이더: 문자를 보내지 않고 고정 코드만 허용한다
pub struct DevOtpProvider {
    code: String,
}

impl DevOtpProvider {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

#[async_trait]
impl OtpProvider for DevOtpProvider {
    async fn send_otp(&self, phone_number: &str) -> Result<(), IdentityError> {
        warn!(
            "{:<12} --> 개발용 인증 코드 사용 (문자 미발송): {}",
            "DevOtp", phone_number
        );
        Ok(())
    }

    async fn verify_otp(&self, _phone_number: &str, code: &str) -> Result<(), IdentityError> {
        if code == self.code {
            Ok(())
        } else {
            Err(IdentityError::InvalidOtp("코드 불일치".to_string()))
        }
    }
}
// endregion: --- Dev Provider
