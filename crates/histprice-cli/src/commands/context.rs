//! 명령 실행 환경 구성.

use anyhow::{Context, Result};
use histprice_core::{AppConfig, SystemClock};
use histprice_data::{
    Database, DatabaseConfig, IexClient, IexClientConfig, InMemoryPriceStore, MarketDataManager,
    RecordStore,
};
use std::sync::Arc;
use tracing::{info, warn};

/// 저장소 선택.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChoice {
    /// PostgreSQL (URL)
    Postgres(String),
    /// 인메모리 (프로세스 종료 시 유실)
    Memory,
}

impl StoreChoice {
    /// `--memory` 플래그, `--db-url`, 설정, `DATABASE_URL` 순으로 저장소를 결정합니다.
    pub fn resolve(memory: bool, db_url: Option<String>, config: &AppConfig) -> Self {
        if memory {
            return StoreChoice::Memory;
        }

        match db_url
            .or_else(|| config.database.url.clone())
            .or_else(|| std::env::var("DATABASE_URL").ok())
        {
            Some(url) => StoreChoice::Postgres(url),
            None => {
                warn!("데이터베이스 URL 미설정, 인메모리 저장소 사용");
                StoreChoice::Memory
            }
        }
    }
}

/// 데이터베이스 연결.
pub async fn connect_database(url: &str, config: &AppConfig) -> Result<Database> {
    let db_config = DatabaseConfig::from_settings(url, &config.database);
    Database::connect(&db_config)
        .await
        .context("Failed to connect to database")
}

/// 레코드 저장소 생성.
pub async fn create_store(choice: &StoreChoice, config: &AppConfig) -> Result<Arc<dyn RecordStore>> {
    match choice {
        StoreChoice::Postgres(url) => {
            let database = connect_database(url, config).await?;
            info!("PostgreSQL 저장소 사용");
            Ok(Arc::new(database.price_store()))
        }
        StoreChoice::Memory => Ok(Arc::new(InMemoryPriceStore::new())),
    }
}

/// 데이터 매니저 생성.
pub async fn create_manager(choice: &StoreChoice, config: &AppConfig) -> Result<MarketDataManager> {
    let store = create_store(choice, config).await?;
    let client = IexClient::new(IexClientConfig::from_settings(&config.iex))?;
    let clock = SystemClock::from_timezone_name(&config.market.timezone)
        .map_err(|e| anyhow::anyhow!("Invalid market timezone: {}", e))?;

    Ok(MarketDataManager::with_iex(store, client, Arc::new(clock)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_flag_wins() {
        let config = AppConfig::default();
        let choice = StoreChoice::resolve(true, Some("postgresql://localhost/db".into()), &config);
        assert_eq!(choice, StoreChoice::Memory);
    }

    #[test]
    fn test_cli_url_before_config() {
        let mut config = AppConfig::default();
        config.database.url = Some("postgresql://config/db".into());

        let choice = StoreChoice::resolve(false, Some("postgresql://cli/db".into()), &config);
        assert_eq!(choice, StoreChoice::Postgres("postgresql://cli/db".into()));

        let choice = StoreChoice::resolve(false, None, &config);
        assert_eq!(choice, StoreChoice::Postgres("postgresql://config/db".into()));
    }
}
