//! 과거 시세 데이터 관리.
//!
//! 이 crate는 다음을 제공합니다:
//! - 시세 레코드 저장소 (PostgreSQL, 인메모리)
//! - IEX Cloud 데이터 제공자 클라이언트
//! - 저장소 우선 조회와 누락분 보충을 조정하는 가격 해석기
//! - 단순 전달 작업(종목 목록, 최근 체결가)을 포함한 데이터 매니저

pub mod cache;
pub mod error;
pub mod manager;
pub mod provider;
pub mod storage;

pub use error::{DataError, Result};
pub use manager::MarketDataManager;

// 저장소 재내보내기
pub use storage::memory::InMemoryPriceStore;
pub use storage::postgres::{Database, DatabaseConfig, PgPriceStore};
pub use storage::RecordStore;

// Provider 재내보내기
pub use provider::iex::{IexClient, IexClientConfig};
pub use provider::{PriceProvider, ReferenceDataProvider};

// 가격 해석기 재내보내기
pub use cache::historical::PriceResolver;
