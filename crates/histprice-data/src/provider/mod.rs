//! 데이터 Provider 모듈.
//!
//! 외부 시장 데이터 소스에 대한 추상화를 정의합니다.
//!
//! - `PriceProvider`: 일별 시세 조회 (단일 날짜 또는 기간 토큰)
//! - `ReferenceDataProvider`: 종목 목록 및 최근 체결가 조회
//! - `IexClient`: IEX Cloud REST API 구현체

pub mod iex;

use async_trait::async_trait;
use histprice_core::{LastTradedPrice, PriceRecord, RangeToken, SymbolInfo};

use crate::error::Result;

pub use iex::{IexClient, IexClientConfig};

/// 일별 시세 제공자.
///
/// 빈 결과는 오류가 아닙니다. 호출 실패만 `Err`로 반환합니다.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// 단일 날짜(`YYYYMMDD`)의 시세를 조회합니다.
    async fn fetch_by_date(&self, symbol: &str, compact_date: &str) -> Result<Vec<PriceRecord>>;

    /// 기간 토큰 전체에 해당하는 시세를 한 번에 조회합니다.
    async fn fetch_by_range(&self, symbol: &str, range: &RangeToken) -> Result<Vec<PriceRecord>>;
}

/// 참조 데이터 제공자.
#[async_trait]
pub trait ReferenceDataProvider: Send + Sync {
    /// 제공자가 지원하는 전체 종목 목록.
    async fn all_symbols(&self) -> Result<Vec<SymbolInfo>>;

    /// 종목별 최근 체결가.
    async fn last_traded_prices(&self, symbols: &[String]) -> Result<Vec<LastTradedPrice>>;
}
