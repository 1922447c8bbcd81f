//! 데이터 매니저 구현.
//!
//! 레코드 저장소, 과거 시세 해석기, 참조 데이터 제공자를 묶어
//! 외부 진입점(HTTP, CLI)이 사용하는 단일 창구를 제공합니다.

use histprice_core::{Clock, InputError, LastTradedPrice, PriceRecord, SymbolInfo};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::cache::historical::{validate_symbol, PriceResolver};
use crate::error::Result;
use crate::provider::{IexClient, PriceProvider, ReferenceDataProvider};
use crate::storage::RecordStore;

/// 저장소와 데이터 제공자를 조정하는 중앙 데이터 매니저.
pub struct MarketDataManager {
    store: Arc<dyn RecordStore>,
    reference: Arc<dyn ReferenceDataProvider>,
    resolver: PriceResolver,
}

impl MarketDataManager {
    /// 새 데이터 매니저를 생성합니다.
    pub fn new(
        store: Arc<dyn RecordStore>,
        prices: Arc<dyn PriceProvider>,
        reference: Arc<dyn ReferenceDataProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let resolver = PriceResolver::new(store.clone(), prices, clock);
        Self {
            store,
            reference,
            resolver,
        }
    }

    /// IEX 클라이언트 하나로 시세와 참조 데이터를 모두 제공하는 매니저.
    pub fn with_iex(store: Arc<dyn RecordStore>, client: IexClient, clock: Arc<dyn Clock>) -> Self {
        let client = Arc::new(client);
        Self::new(store, client.clone(), client, clock)
    }

    /// 내부 가격 해석기.
    pub fn resolver(&self) -> &PriceResolver {
        &self.resolver
    }

    /// 과거 일별 시세 조회 (저장소 우선).
    pub async fn historical_prices(
        &self,
        symbol: &str,
        date: Option<&str>,
        range: Option<&str>,
    ) -> Result<Vec<PriceRecord>> {
        self.resolver.resolve(symbol, date, range).await
    }

    /// 저장소에 보관된 심볼의 전체 레코드 (날짜 오름차순).
    #[instrument(skip(self))]
    pub async fn stored_prices(&self, symbol: &str) -> Result<Vec<PriceRecord>> {
        let symbol = validate_symbol(symbol)?;
        self.store.find_all_by_symbol(symbol).await
    }

    /// 데이터 제공자가 지원하는 전체 종목 목록.
    #[instrument(skip(self))]
    pub async fn all_symbols(&self) -> Result<Vec<SymbolInfo>> {
        let symbols = self.reference.all_symbols().await?;
        debug!(count = symbols.len(), "종목 목록 수신");
        Ok(symbols)
    }

    /// 종목별 최근 체결가. 유효한 심볼이 하나도 없으면 `MissingSymbol`.
    #[instrument(skip(self))]
    pub async fn last_traded_prices(&self, symbols: &[String]) -> Result<Vec<LastTradedPrice>> {
        let symbols: Vec<String> = symbols
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if symbols.is_empty() {
            return Err(InputError::MissingSymbol.into());
        }

        self.reference.last_traded_prices(&symbols).await
    }

    /// 저장소 상태 확인.
    pub async fn health_check(&self) -> Result<()> {
        self.store.health_check().await
    }
}

/// 쉼표로 구분된 심볼 목록을 분리합니다. 빈 항목은 버립니다.
pub fn split_symbols(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
