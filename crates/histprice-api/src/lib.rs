//! 과거 일별 시세 REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API (`/iex/*`)
//! - 헬스 체크 엔드포인트
//! - OpenAPI 문서 및 Swagger UI
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`error`]: 에러 응답 및 상태 코드 매핑
//! - [`openapi`]: OpenAPI 문서 및 Swagger UI

pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

pub use error::{data_error_response, ApiErrorResponse, ApiResult};
pub use routes::*;
pub use state::AppState;

#[cfg(any(test, feature = "test-utils"))]
pub use state::testing::{create_test_state, create_test_state_with, StaticProvider};
