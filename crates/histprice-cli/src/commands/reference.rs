//! 종목 목록 및 최근 체결가 명령.

use anyhow::Result;
use histprice_core::{AppConfig, SymbolInfo};
use histprice_data::manager::split_symbols;
use tracing::info;

use super::context::{create_manager, StoreChoice};
use super::output::{render, OutputFormat};

/// 종목 목록 조회 설정.
#[derive(Debug)]
pub struct SymbolsConfig {
    /// 검색 키워드 (심볼 또는 종목명)
    pub search: Option<String>,
    /// 활성화된 종목만
    pub enabled_only: bool,
    /// 최대 결과 수 (0 = 무제한)
    pub limit: usize,
    /// 출력 형식
    pub format: OutputFormat,
}

/// 검색/활성화/개수 조건으로 종목 목록을 거릅니다.
pub fn filter_symbols(symbols: Vec<SymbolInfo>, config: &SymbolsConfig) -> Vec<SymbolInfo> {
    let search = config.search.as_ref().map(|s| s.to_lowercase());

    let filtered = symbols
        .into_iter()
        .filter(|s| !config.enabled_only || s.is_enabled)
        .filter(|s| match &search {
            Some(keyword) => {
                s.symbol.to_lowercase().contains(keyword) || s.name.to_lowercase().contains(keyword)
            }
            None => true,
        });

    if config.limit > 0 {
        filtered.take(config.limit).collect()
    } else {
        filtered.collect()
    }
}

/// IEX 지원 종목 목록.
pub async fn run_symbols(config: SymbolsConfig, app: &AppConfig) -> Result<usize> {
    let manager = create_manager(&StoreChoice::Memory, app).await?;
    let symbols = manager.all_symbols().await?;
    let total = symbols.len();

    let symbols = filter_symbols(symbols, &config);
    info!(total = total, shown = symbols.len(), "종목 목록 조회 완료");

    println!("{}", render(&symbols, config.format)?);
    Ok(symbols.len())
}

/// 최근 체결가 조회 (쉼표로 구분된 심볼).
pub async fn run_last(symbols: &str, format: OutputFormat, app: &AppConfig) -> Result<usize> {
    let manager = create_manager(&StoreChoice::Memory, app).await?;
    let prices = manager.last_traded_prices(&split_symbols(symbols)).await?;

    println!("{}", render(&prices, format)?);
    Ok(prices.len())
}
