/// 만료 세션 정리 스케줄러
/// 세션은 만료 후 조회되지 않지만 메모리에 남으므로 주기적으로 제거한다.
// region:    --- Imports
use crate::identity::session::SessionStore;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};
use tracing::{debug, info};

// endregion: --- Imports

// region:    --- Session Janitor
/// 만료 세션 정리 스케줄러
pub struct SessionJanitor {
    sessions: Arc<SessionStore>,
    period: Duration,
}

/// 만료 세션 정리 스케줄러 생성
impl SessionJanitor {
    pub fn new(sessions: Arc<SessionStore>, period: Duration) -> Self {
        Self { sessions, period }
    }

    /// 만료 세션 정리 스케줄러 시작
    pub fn start(&self) -> JoinHandle<()> {
        let sessions = Arc::clone(&self.sessions);
        let mut interval = interval(self.period);
        tokio::spawn(async move {
            loop {
                interval.tick().await;
                Self::sweep(&sessions).await;
            }
        })
    }

    /// 만료 세션 정리
    async fn sweep(sessions: &SessionStore) -> usize {
        let removed = sessions.cleanup_expired().await;
        if removed > 0 {
            info!("{:<12} --> 만료 세션 {}개 정리", "Scheduler", removed);
        } else {
            debug!("{:<12} --> 정리할 만료 세션 없음", "Scheduler");
        }
        removed
    }
}
// endregion: --- Session Janitor
