//! CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 과거 일별 시세 조회 (저장소 우선)
//! - 저장된 시세 조회
//! - 종목 목록 및 최근 체결가 조회
//! - 데이터베이스 마이그레이션

pub mod commands;

pub use commands::*;
