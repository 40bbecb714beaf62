// region:    --- Imports
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

// endregion: --- Imports

/// 세션 토큰 (랜덤 UUID)
pub type SessionToken = String;

/// 인증 완료 후 저장되는 세션
#[derive(Clone, Debug)]
pub struct Session {
    pub user_id: Uuid,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
}

// region:    --- Session Context
/// 요청마다 명시적으로 전달되는 호출자 정보
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionContext {
    user_id: Option<Uuid>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self { user_id: None }
    }

    pub fn authenticated(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    /// 로그인한 사용자 id (없으면 None)
    pub fn current_identity(&self) -> Option<Uuid> {
        self.user_id
    }
}
// endregion: --- Session Context

// region:    --- Session Store
/// 인메모리 세션 저장소
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionToken, Session>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_hours: i64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// 세션 생성 후 토큰 반환
    pub async fn create_session(&self, session: Session) -> SessionToken {
        let token = Uuid::new_v4().to_string();
        self.sessions.write().await.insert(token.clone(), session);
        token
    }

    /// 토큰으로 세션 조회 (만료된 세션은 None)
    pub async fn get_session(&self, token: &str) -> Option<Session> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(token)?;
        if self.is_expired(session, Utc::now()) {
            return None;
        }
        Some(session.clone())
    }

    /// 토큰으로 요청 컨텍스트 생성
    pub async fn context_for(&self, token: Option<&str>) -> SessionContext {
        match token {
            Some(token) => match self.get_session(token).await {
                Some(session) => SessionContext::authenticated(session.user_id),
                None => SessionContext::anonymous(),
            },
            None => SessionContext::anonymous(),
        }
    }

    /// 세션 삭제 (로그아웃)
    pub async fn delete_session(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    /// 만료된 세션 정리, 삭제된 수 반환
    pub async fn cleanup_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        let now = Utc::now();
        sessions.retain(|_, session| !self.is_expired(session, now));
        before - sessions.len()
    }

    fn is_expired(&self, session: &Session, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(session.created_at) >= self.ttl
    }
}
// endregion: --- Session Store
