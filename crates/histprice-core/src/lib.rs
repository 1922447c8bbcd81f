//! # Histprice Core
//!
//! 과거 일별 시세 조회 시스템의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 일별 시세 레코드 및 참조 데이터 구조체
//! - 날짜 형식 변환 (`YYYYMMDD` ↔ `YYYY-MM-DD`)
//! - 주말 판정 및 기간 토큰 확장
//! - 현재 날짜를 제공하는 시계 추상화
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
