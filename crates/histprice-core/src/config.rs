//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//!
//! 로드 순서 (나중 것이 우선):
//! 1. 코드 기본값
//! 2. 설정 파일 (`config/default.toml`, 없으면 생략)
//! 3. `HISTPRICE__` 접두사 환경 변수 (예: `HISTPRICE__IEX__TOKEN`)

use serde::{Deserialize, Serialize};
use std::path::Path;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 데이터베이스 설정
    #[serde(default)]
    pub database: DatabaseConfig,
    /// IEX Cloud 설정
    #[serde(default)]
    pub iex: IexConfig,
    /// 시장 설정
    #[serde(default)]
    pub market: MarketConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_secs: 30,
        }
    }
}

/// 데이터베이스 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// 데이터베이스 URL (없으면 인메모리 저장소 사용)
    pub url: Option<String>,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 타임아웃 (초)
    pub connection_timeout_secs: u64,
    /// 유휴 타임아웃 (초)
    pub idle_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            connection_timeout_secs: 30,
            idle_timeout_secs: 300,
        }
    }
}

/// IEX Cloud 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IexConfig {
    /// REST API 기본 URL
    pub base_url: String,
    /// API 토큰
    pub token: String,
    /// HTTP 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

impl Default for IexConfig {
    fn default() -> Self {
        Self {
            base_url: "https://cloud.iexapis.com/stable".to_string(),
            token: String::new(),
            timeout_secs: 10,
        }
    }
}

/// 시장 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MarketConfig {
    /// "오늘"을 계산할 IANA 시간대
    pub timezone: String,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            timezone: "America/New_York".to_string(),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("HISTPRICE")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }
}
