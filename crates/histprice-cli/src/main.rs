//! 과거 시세 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 특정 날짜 일봉 (저장소 우선)
//! histprice history -s AAPL -d 20220204
//!
//! # 연초부터 현재까지, JSON 출력
//! histprice history -s AAPL -r ytd --format json
//!
//! # DB 없이 실행
//! histprice history -s AAPL -r 5d --memory
//!
//! # 저장된 시세, 종목 목록, 최근 체결가
//! histprice stored -s AAPL
//! histprice symbols --search apple
//! histprice last -s SNAP,FB
//!
//! # 스키마 마이그레이션
//! histprice migrate
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use histprice_core::{init_logging, AppConfig, LogConfig};
use tracing::error;

use histprice_cli::commands::context::StoreChoice;
use histprice_cli::commands::history::{run_history, run_stored, HistoryConfig, StoredConfig};
use histprice_cli::commands::migrate::run_migrate;
use histprice_cli::commands::reference::{run_last, run_symbols, SymbolsConfig};
use histprice_cli::OutputFormat;

#[derive(Parser)]
#[command(name = "histprice")]
#[command(about = "Historical prices CLI - IEX 일별 시세 저장소", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 경로
    #[arg(short, long, global = true, default_value = "config/default.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 과거 일별 시세 조회 (저장소 → IEX)
    History {
        /// 종목 심볼 (예: AAPL)
        #[arg(short, long)]
        symbol: String,

        /// 조회 날짜 (YYYYMMDD), 지정 시 range보다 우선
        #[arg(short, long)]
        date: Option<String>,

        /// 기간 토큰 (ytd, 5d, 1m, 2y)
        #[arg(short, long)]
        range: Option<String>,

        /// 인메모리 저장소 사용 (DB 미사용)
        #[arg(long, default_value = "false")]
        memory: bool,

        /// 데이터베이스 URL (기본: 설정 또는 DATABASE_URL 환경변수)
        #[arg(long)]
        db_url: Option<String>,

        /// 출력 형식 (table, csv, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// 저장소에 보관된 시세 조회
    Stored {
        /// 종목 심볼
        #[arg(short, long)]
        symbol: String,

        /// 데이터베이스 URL (기본: 설정 또는 DATABASE_URL 환경변수)
        #[arg(long)]
        db_url: Option<String>,

        /// 출력 형식 (table, csv, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// IEX 지원 종목 목록
    Symbols {
        /// 검색 키워드 (심볼 또는 종목명)
        #[arg(long)]
        search: Option<String>,

        /// 활성화된 종목만 조회
        #[arg(long, default_value = "false")]
        enabled_only: bool,

        /// 최대 결과 수 (0 = 무제한)
        #[arg(long, default_value = "0")]
        limit: usize,

        /// 출력 형식 (table, csv, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// 최근 체결가 조회
    Last {
        /// 쉼표로 구분된 종목 심볼 (예: SNAP,FB)
        #[arg(short, long)]
        symbols: String,

        /// 출력 형식 (table, csv, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// 데이터베이스 마이그레이션 실행
    Migrate {
        /// 데이터베이스 URL (기본: 설정 또는 DATABASE_URL 환경변수)
        #[arg(long)]
        db_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let app = AppConfig::load(&cli.config).context("Failed to load configuration")?;
    init_logging(LogConfig::from_settings(&app.logging).with_env_overrides())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let result = match cli.command {
        Commands::History {
            symbol,
            date,
            range,
            memory,
            db_url,
            format,
        } => {
            let config = HistoryConfig {
                symbol,
                date,
                range,
                store: StoreChoice::resolve(memory, db_url, &app),
                format: OutputFormat::parse(&format)?,
            };
            run_history(config, &app).await.map(|_| ())
        }

        Commands::Stored {
            symbol,
            db_url,
            format,
        } => {
            let config = StoredConfig {
                symbol,
                store: StoreChoice::resolve(false, db_url, &app),
                format: OutputFormat::parse(&format)?,
            };
            run_stored(config, &app).await.map(|_| ())
        }

        Commands::Symbols {
            search,
            enabled_only,
            limit,
            format,
        } => {
            let config = SymbolsConfig {
                search,
                enabled_only,
                limit,
                format: OutputFormat::parse(&format)?,
            };
            run_symbols(config, &app).await.map(|_| ())
        }

        Commands::Last { symbols, format } => {
            run_last(&symbols, OutputFormat::parse(&format)?, &app)
                .await
                .map(|_| ())
        }

        Commands::Migrate { db_url } => run_migrate(db_url, &app).await,
    };

    if let Err(e) = &result {
        error!("Command failed: {:#}", e);
    }
    result
}
