//! IEX Cloud REST API 클라이언트.
//!
//! # 사용 엔드포인트
//!
//! - `/stock/{symbol}/chart/date/{YYYYMMDD}?chartByDay=true` - 단일 날짜 일봉
//! - `/stock/{symbol}/chart/{range}` - 기간 일봉
//! - `/ref-data/iex/symbols` - 지원 종목 목록
//! - `/tops/last?symbols=A,B` - 최근 체결가
//!
//! 모든 요청에 `token` 쿼리 파라미터로 API 토큰을 전달합니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use histprice_data::{IexClient, IexClientConfig};
//!
//! let client = IexClient::new(IexClientConfig::from_settings(&config.iex))?;
//! let prices = client.fetch_by_date("AAPL", "20220204").await?;
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;
use histprice_core::{
    LastTradedPrice, PriceRecord, RangeToken, SymbolInfo, COMPACT_DATE_FORMAT, STORE_DATE_FORMAT,
};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::{PriceProvider, ReferenceDataProvider};
use crate::error::{DataError, Result};

/// IEX 클라이언트 설정.
#[derive(Debug, Clone)]
pub struct IexClientConfig {
    /// API 기본 URL (예: `https://cloud.iexapis.com/stable`)
    pub base_url: String,
    /// API 토큰
    pub token: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

impl IexClientConfig {
    /// 애플리케이션 설정에서 생성합니다.
    pub fn from_settings(settings: &histprice_core::IexConfig) -> Self {
        Self {
            base_url: settings.base_url.clone(),
            token: settings.token.clone(),
            timeout_secs: settings.timeout_secs,
        }
    }
}

impl Default for IexClientConfig {
    fn default() -> Self {
        Self::from_settings(&histprice_core::IexConfig::default())
    }
}

/// IEX 차트 응답 항목.
///
/// 날짜 조회 응답에는 `symbol`이 빠지는 경우가 있어 요청 심볼로 채웁니다.
#[derive(Debug, Deserialize)]
struct IexChartEntry {
    #[serde(default)]
    symbol: Option<String>,
    date: String,
    open: Decimal,
    high: Decimal,
    low: Decimal,
    close: Decimal,
    #[serde(default)]
    volume: u64,
}

impl IexChartEntry {
    fn into_record(self, requested_symbol: &str) -> Result<PriceRecord> {
        let date = NaiveDate::parse_from_str(&self.date, STORE_DATE_FORMAT)
            .or_else(|_| NaiveDate::parse_from_str(&self.date, COMPACT_DATE_FORMAT))
            .map_err(|e| DataError::ParseError(format!("IEX 날짜 형식 오류 {}: {}", self.date, e)))?;

        let symbol = match self.symbol {
            Some(s) if !s.trim().is_empty() => s,
            _ => requested_symbol.to_string(),
        };

        Ok(PriceRecord {
            symbol,
            date,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
        })
    }
}

/// IEX Cloud 클라이언트.
#[derive(Clone)]
pub struct IexClient {
    client: reqwest::Client,
    config: IexClientConfig,
}

impl IexClient {
    /// 새로운 IEX 클라이언트 생성.
    pub fn new(config: IexClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DataError::ConfigError(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        if config.token.is_empty() {
            warn!("IEX API 토큰이 비어 있습니다. iex.token 설정을 확인하세요.");
        }

        Ok(Self { client, config })
    }

    /// 설정된 기본 URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// GET 요청을 보내고 JSON 본문을 디코딩합니다.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);

        debug!(url = %url, "IEX API 요청");

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("token", self.config.token.as_str())])
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::FetchError(format!(
                "IEX API 오류 [{}]: {} - {}",
                path, status, body
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| DataError::ParseError(format!("IEX 응답 디코딩 실패 [{}]: {}", path, e)))
    }

    async fn fetch_chart(
        &self,
        symbol: &str,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<PriceRecord>> {
        let entries: Option<Vec<IexChartEntry>> = self.get_json(path, params).await?;
        let records = entries
            .unwrap_or_default()
            .into_iter()
            .map(|entry| entry.into_record(symbol))
            .collect::<Result<Vec<_>>>()?;

        debug!(symbol = symbol, count = records.len(), "IEX 차트 수신");
        Ok(records)
    }
}

#[async_trait]
impl PriceProvider for IexClient {
    #[instrument(skip(self))]
    async fn fetch_by_date(&self, symbol: &str, compact_date: &str) -> Result<Vec<PriceRecord>> {
        let path = format!("/stock/{}/chart/date/{}", symbol, compact_date);
        self.fetch_chart(symbol, &path, &[("chartByDay", "true")]).await
    }

    #[instrument(skip(self), fields(range = %range))]
    async fn fetch_by_range(&self, symbol: &str, range: &RangeToken) -> Result<Vec<PriceRecord>> {
        let path = format!("/stock/{}/chart/{}", symbol, range);
        self.fetch_chart(symbol, &path, &[]).await
    }
}

#[async_trait]
impl ReferenceDataProvider for IexClient {
    #[instrument(skip(self))]
    async fn all_symbols(&self) -> Result<Vec<SymbolInfo>> {
        let symbols: Option<Vec<SymbolInfo>> =
            self.get_json("/ref-data/iex/symbols", &[]).await?;
        Ok(symbols.unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn last_traded_prices(&self, symbols: &[String]) -> Result<Vec<LastTradedPrice>> {
        let joined = symbols.join(",");
        let prices: Option<Vec<LastTradedPrice>> = self
            .get_json("/tops/last", &[("symbols", joined.as_str())])
            .await?;
        Ok(prices.unwrap_or_default())
    }
}
