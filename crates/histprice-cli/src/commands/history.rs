//! 과거 시세 조회 명령.

use anyhow::Result;
use histprice_core::{AppConfig, PriceRecord};
use tracing::info;

use super::context::{create_manager, StoreChoice};
use super::output::{render, OutputFormat};

/// 과거 시세 조회 설정.
#[derive(Debug)]
pub struct HistoryConfig {
    /// 종목 심볼
    pub symbol: String,
    /// 조회 날짜 (YYYYMMDD)
    pub date: Option<String>,
    /// 기간 토큰 (ytd, 5d, 1m, 2y)
    pub range: Option<String>,
    /// 저장소
    pub store: StoreChoice,
    /// 출력 형식
    pub format: OutputFormat,
}

/// 과거 일별 시세 조회 (저장소 우선, 누락분은 IEX에서 수집).
pub async fn run_history(config: HistoryConfig, app: &AppConfig) -> Result<Vec<PriceRecord>> {
    let manager = create_manager(&config.store, app).await?;

    let records = manager
        .historical_prices(&config.symbol, config.date.as_deref(), config.range.as_deref())
        .await?;

    info!(symbol = %config.symbol, count = records.len(), "과거 시세 조회 완료");
    println!("{}", render(&records, config.format)?);

    Ok(records)
}

/// 저장된 시세 조회 설정.
#[derive(Debug)]
pub struct StoredConfig {
    /// 종목 심볼
    pub symbol: String,
    /// 저장소
    pub store: StoreChoice,
    /// 출력 형식
    pub format: OutputFormat,
}

/// 저장소에 보관된 심볼의 전체 시세.
pub async fn run_stored(config: StoredConfig, app: &AppConfig) -> Result<usize> {
    let manager = create_manager(&config.store, app).await?;
    let records = manager.stored_prices(&config.symbol).await?;

    println!("{}", render(&records, config.format)?);
    Ok(records.len())
}
