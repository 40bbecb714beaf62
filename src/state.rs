// region:    --- Imports
use crate::identity::otp::OtpProvider;
use crate::identity::session::SessionStore;
use crate::message_broker::EventPublisher;
use crate::store::{IdentityStore, LedgerStore};
use std::sync::Arc;

// endregion: --- Imports

/// 핸들러가 공유하는 의존성
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LedgerStore>,
    pub identity_store: Arc<dyn IdentityStore>,
    pub sessions: Arc<SessionStore>,
    pub otp: Arc<dyn OtpProvider>,
    pub publisher: Arc<dyn EventPublisher>,
}

impl AppState {
    /// 원장과 사용자 정보를 같은 저장소에 두는 경우
    pub fn new<S>(
        store: Arc<S>,
        sessions: Arc<SessionStore>,
        otp: Arc<dyn OtpProvider>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self
    where
        S: LedgerStore + IdentityStore + 'static,
    {
        Self {
            store: store.clone(),
            identity_store: store,
            sessions,
            otp,
            publisher,
        }
    }
}
