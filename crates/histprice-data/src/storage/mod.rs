//! 시세 레코드 저장소.
//!
//! - PostgreSQL: 운영용 영구 저장소
//! - 인메모리: 테스트 및 DB 미설정 환경용
//!
//! 두 구현 모두 같은 `(symbol, date)`의 중복 삽입을 무시하므로
//! 동시 요청이 같은 레코드를 저장해도 조회 결과가 달라지지 않습니다.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use histprice_core::PriceRecord;

use crate::error::Result;

/// 시세 레코드 저장소 trait.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// `(symbol, 저장소 날짜)`로 레코드 하나를 조회합니다.
    ///
    /// 중복이 있으면 처음 찾은 레코드를 반환합니다.
    async fn find_one(&self, symbol: &str, store_date: &str) -> Result<Option<PriceRecord>>;

    /// 심볼의 모든 레코드를 날짜순으로 조회합니다.
    async fn find_all_by_symbol(&self, symbol: &str) -> Result<Vec<PriceRecord>>;

    /// 심볼의 레코드가 하나라도 있는지 확인합니다.
    async fn exists_for_symbol(&self, symbol: &str) -> Result<bool>;

    /// 레코드를 저장합니다. 이미 있는 `(symbol, date)`는 무시합니다.
    async fn insert(&self, record: &PriceRecord) -> Result<()>;

    /// 저장소 상태를 확인합니다.
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
