//! 과거 시세 API 서버.
//!
//! Axum 기반 REST API 서버를 시작합니다.
//! 헬스 체크, 과거 일별 시세, 종목 목록, 최근 체결가 엔드포인트를 제공합니다.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{http::StatusCode, Router};
use histprice_core::{init_logging, AppConfig, LogConfig, SystemClock};
use histprice_data::{
    Database, DatabaseConfig, IexClient, IexClientConfig, InMemoryPriceStore, MarketDataManager,
    RecordStore,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use histprice_api::openapi::swagger_ui_router;
use histprice_api::routes::create_api_router;
use histprice_api::state::AppState;

/// 레코드 저장소 구성.
///
/// 데이터베이스 URL이 있으면 PostgreSQL, 없으면 인메모리 저장소를 사용합니다.
async fn create_store(config: &AppConfig) -> anyhow::Result<(Arc<dyn RecordStore>, Option<Database>)> {
    let url = config
        .database
        .url
        .clone()
        .or_else(|| std::env::var("DATABASE_URL").ok());

    match url {
        Some(url) => {
            let db_config = DatabaseConfig::from_settings(url, &config.database);
            let database = Database::connect(&db_config)
                .await
                .context("데이터베이스 연결 실패")?;
            database.migrate().await.context("마이그레이션 실패")?;
            info!("PostgreSQL 저장소 사용");
            Ok((Arc::new(database.price_store()), Some(database)))
        }
        None => {
            warn!("DATABASE_URL 미설정, 인메모리 저장소 사용 (재시작 시 데이터 유실)");
            Ok((Arc::new(InMemoryPriceStore::new()), None))
        }
    }
}

/// AppState 생성.
async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let (store, database) = create_store(config).await?;

    let client = IexClient::new(IexClientConfig::from_settings(&config.iex))?;
    let clock = SystemClock::from_timezone_name(&config.market.timezone)
        .map_err(|e| anyhow::anyhow!("시장 시간대 설정 오류: {}", e))?;
    info!(timezone = %clock.timezone(), "시장 시간대 설정");

    let manager = MarketDataManager::with_iex(store, client, Arc::new(clock));

    let mut state = AppState::new(manager);
    if let Some(database) = database {
        state = state.with_database(database);
    }
    Ok(state)
}

/// CORS 레이어 생성.
///
/// - `CORS_ORIGINS`: 쉼표로 구분된 허용 origin 목록
fn cors_layer() -> CorsLayer {
    let allow_origin = match std::env::var("CORS_ORIGINS") {
        Ok(origins) if !origins.is_empty() => {
            let origins: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();

            if origins.is_empty() {
                warn!("CORS_ORIGINS is set but contains no valid origins, allowing any");
                AllowOrigin::any()
            } else {
                info!("CORS configured with {} allowed origins", origins.len());
                AllowOrigin::list(origins)
            }
        }
        _ => {
            warn!("CORS_ORIGINS not set, allowing any origin (development mode)");
            AllowOrigin::any()
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([axum::http::Method::GET, axum::http::Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE, axum::http::header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// 전체 라우터 생성.
fn create_router(state: Arc<AppState>, request_timeout: Duration) -> Router {
    Router::new()
        .merge(create_api_router().with_state(state))
        .merge(swagger_ui_router())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(cors_layer())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    let config = AppConfig::load_default().context("설정 로드 실패")?;

    init_logging(LogConfig::from_settings(&config.logging).with_env_overrides())
        .map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {}", e))?;

    info!("Starting Historical Prices API server...");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "소켓 주소 설정이 유효하지 않습니다: {}:{}",
                config.server.host, config.server.port
            )
        })?;

    let state = Arc::new(create_app_state(&config).await?);
    info!(
        version = %state.version,
        has_db = state.has_database(),
        "Application state initialized"
    );

    let app = create_router(
        state,
        Duration::from_secs(config.server.request_timeout_secs),
    );

    info!(%addr, "API server listening");
    info!("Swagger UI available at http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");
    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 반환합니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
