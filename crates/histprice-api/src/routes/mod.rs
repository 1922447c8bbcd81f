//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/iex/symbols` - 지원 종목 목록
//! - `/iex/lastTradedPrice` - 최근 체결가
//! - `/iex/historicalPrices` - 과거 일별 시세
//! - `/iex/storedPrices` - 저장된 일별 시세

pub mod health;
pub mod iex;

pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use iex::{iex_router, HistoricalPricesQuery, LastTradedPriceQuery, SymbolQuery};

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/health", health_router())
        .nest("/iex", iex_router())
}
