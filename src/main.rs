// region:    --- Imports
use anyhow::Context;
use bid_ledger::config::Config;
use bid_ledger::database::DatabaseManager;
use bid_ledger::handlers;
use bid_ledger::identity::otp::{DevOtpProvider, OtpProvider, TwilioVerifyProvider};
use bid_ledger::identity::session::SessionStore;
use bid_ledger::message_broker::{EventPublisher, KafkaManager, NoopPublisher};
use bid_ledger::scheduler::SessionJanitor;
use bid_ledger::state::AppState;
use bid_ledger::store::{InMemoryStore, PgLedgerStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    let config = Config::from_env()?;

    // 세션 저장소 및 만료 세션 정리
    let sessions = Arc::new(SessionStore::new(config.session_ttl_hours));
    let _janitor = SessionJanitor::new(Arc::clone(&sessions), Duration::from_secs(60)).start();

    // 인증 코드 프로바이더
    let otp: Arc<dyn OtpProvider> = match &config.twilio {
        Some(twilio) => Arc::new(TwilioVerifyProvider::new(twilio.clone())),
        None => {
            let code = config
                .dev_otp_code
                .clone()
                .context("Twilio 설정이 없으면 DEV_OTP_CODE 가 필요합니다")?;
            if !cfg!(debug_assertions) {
                error!(
                    "{:<12} --> SECURITY WARNING: 릴리스 빌드에서 개발용 인증 코드(DEV_OTP_CODE) 사용 중",
                    "Main"
                );
            } else {
                warn!(
                    "{:<12} --> Twilio 설정 없음, 개발용 인증 코드 사용",
                    "Main"
                );
            }
            Arc::new(DevOtpProvider::new(code))
        }
    };

    // 입찰 이벤트 발행기
    let publisher: Arc<dyn EventPublisher> = match &config.kafka_brokers {
        Some(brokers) => {
            let kafka_manager = KafkaManager::new(brokers)?;
            if let Err(e) = kafka_manager
                .create_topic(&config.bid_events_topic, 5, 1)
                .await
            {
                warn!("{:<12} --> 토픽 생성 실패 (기존 토픽 사용): {}", "Main", e);
            }
            info!("{:<12} --> Kafka 초기화 성공", "Main");
            Arc::new(kafka_manager.publisher(&config.bid_events_topic))
        }
        None => Arc::new(NoopPublisher),
    };

    // 저장소 생성
    let state = match &config.database_url {
        Some(database_url) => {
            let db_manager = Arc::new(
                DatabaseManager::connect(database_url, &config)
                    .await
                    .context("데이터베이스 연결 실패")?,
            );
            if let Err(e) = db_manager.initialize_database().await {
                error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
                return Err(e.into());
            }
            info!("{:<12} --> 데이터베이스 초기화 성공", "Main");
            AppState::new(
                Arc::new(PgLedgerStore::new(db_manager)),
                sessions,
                otp,
                publisher,
            )
        }
        None => {
            warn!(
                "{:<12} --> DATABASE_URL 없음, 인메모리 저장소 사용",
                "Main"
            );
            AppState::new(Arc::new(InMemoryStore::new()), sessions, otp, publisher)
        }
    };

    // 리스너 생성
    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("포트 {} 바인딩 실패", config.port))?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, handlers::routes(state).into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
