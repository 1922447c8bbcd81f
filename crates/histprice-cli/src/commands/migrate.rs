//! 데이터베이스 마이그레이션 명령.

use anyhow::{Context, Result};
use histprice_core::AppConfig;
use tracing::info;

use super::context::{connect_database, StoreChoice};

/// `historical_prices` 스키마 마이그레이션 실행.
pub async fn run_migrate(db_url: Option<String>, app: &AppConfig) -> Result<()> {
    let url = match StoreChoice::resolve(false, db_url, app) {
        StoreChoice::Postgres(url) => url,
        StoreChoice::Memory => {
            return Err(anyhow::anyhow!(
                "DATABASE_URL not found. Set DATABASE_URL environment variable or use --db-url flag"
            ))
        }
    };

    let database = connect_database(&url, app).await?;
    database.migrate().await.context("Migration failed")?;
    database.pool().close().await;

    info!("Migrations applied");
    println!("마이그레이션 완료");
    Ok(())
}
