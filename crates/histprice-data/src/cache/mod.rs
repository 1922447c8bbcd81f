//! 캐싱 레이어.
//!
//! - Historical 캐시: 저장소 우선 조회 후 누락된 날짜만 데이터 제공자에서 수집

pub mod historical;

pub use historical::{DateSource, PriceResolver, Resolution};
