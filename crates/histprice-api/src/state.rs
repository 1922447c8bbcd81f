//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 Arc로 래핑되어 여러 요청 간에 안전하게 공유됩니다.

use histprice_data::{Database, MarketDataManager};
use std::sync::Arc;

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 데이터 매니저 - 과거 시세 해석, 저장 레코드, 참조 데이터
    pub manager: Arc<MarketDataManager>,

    /// 데이터베이스 연결 (없으면 인메모리 저장소 사용)
    pub database: Option<Database>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    pub fn new(manager: MarketDataManager) -> Self {
        Self {
            manager: Arc::new(manager),
            database: None,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 데이터베이스 연결 설정.
    pub fn with_database(mut self, database: Database) -> Self {
        self.database = Some(database);
        self
    }

    /// 데이터베이스 설정 여부.
    pub fn has_database(&self) -> bool {
        self.database.is_some()
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }

    /// 레코드 저장소 연결 상태 확인.
    pub async fn is_store_healthy(&self) -> bool {
        self.manager.health_check().await.is_ok()
    }
}

/// 테스트용 상태와 고정 응답 데이터 제공자.
#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    use super::*;
    use async_trait::async_trait;
    use histprice_core::{FixedClock, LastTradedPrice, PriceRecord, RangeToken, SymbolInfo};
    use histprice_data::{
        DataError, InMemoryPriceStore, PriceProvider, ReferenceDataProvider, Result,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 고정 응답을 돌려주는 데이터 제공자.
    #[derive(Default)]
    pub struct StaticProvider {
        /// 날짜/기간 조회 응답 (요청 날짜와 일치하는 레코드만 반환)
        pub records: Vec<PriceRecord>,
        /// 종목 목록 응답
        pub symbols: Vec<SymbolInfo>,
        /// true면 모든 호출이 `FetchError`
        pub fail: bool,
        /// 호출 횟수
        pub calls: AtomicUsize,
    }

    impl StaticProvider {
        fn check(&self) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(DataError::FetchError("IEX API 오류 [test]: 503".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl PriceProvider for StaticProvider {
        async fn fetch_by_date(&self, symbol: &str, compact_date: &str) -> Result<Vec<PriceRecord>> {
            self.check()?;
            Ok(self
                .records
                .iter()
                .filter(|r| r.symbol == symbol && histprice_core::to_compact(r.date) == compact_date)
                .cloned()
                .collect())
        }

        async fn fetch_by_range(&self, symbol: &str, _range: &RangeToken) -> Result<Vec<PriceRecord>> {
            self.check()?;
            Ok(self
                .records
                .iter()
                .filter(|r| r.symbol == symbol)
                .cloned()
                .collect())
        }
    }

    #[async_trait]
    impl ReferenceDataProvider for StaticProvider {
        async fn all_symbols(&self) -> Result<Vec<SymbolInfo>> {
            self.check()?;
            Ok(self.symbols.clone())
        }

        async fn last_traded_prices(&self, symbols: &[String]) -> Result<Vec<LastTradedPrice>> {
            self.check()?;
            Ok(symbols
                .iter()
                .filter_map(|s| {
                    self.records.iter().rev().find(|r| &r.symbol == s).map(|r| LastTradedPrice {
                        symbol: s.clone(),
                        price: r.close,
                        size: 100,
                        time: 0,
                    })
                })
                .collect())
        }
    }

    /// 기준일 2022-02-07 (월요일).
    pub fn test_today() -> chrono::NaiveDate {
        chrono::NaiveDate::from_ymd_opt(2022, 2, 7).unwrap_or_default()
    }

    /// 주어진 저장소와 제공자로 테스트 상태 생성.
    pub fn create_test_state_with(
        store: Arc<InMemoryPriceStore>,
        provider: Arc<StaticProvider>,
    ) -> AppState {
        let manager = MarketDataManager::new(
            store,
            provider.clone(),
            provider,
            Arc::new(FixedClock(test_today())),
        );
        AppState::new(manager)
    }

    /// 빈 저장소와 빈 제공자로 테스트 상태 생성.
    pub fn create_test_state() -> AppState {
        create_test_state_with(
            Arc::new(InMemoryPriceStore::new()),
            Arc::new(StaticProvider::default()),
        )
    }
}
