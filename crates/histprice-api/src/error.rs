//! 통합 API 에러 응답 타입.
//!
//! 모든 API 엔드포인트에서 일관된 에러 형식을 제공합니다.

use axum::http::StatusCode;
use axum::Json;
use histprice_data::DataError;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::ToSchema;

/// 통합 API 에러 응답.
///
/// # 예시
///
/// ```json
/// {
///   "code": "INVALID_RANGE",
///   "message": "잘못된 기간 토큰: 5x",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "MISSING_SYMBOL", "PROVIDER_ERROR", "DB_ERROR")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 에러 발생 타임스탬프 (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// 에러 코드 반환.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// 에러 메시지 반환.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiErrorResponse>)>;

/// 데이터 오류의 HTTP 상태 코드와 에러 코드.
///
/// - 입력 오류 → 400
/// - 연결 풀 소진, DB 연결 실패 → 503
/// - 그 외 협력자 실패 → 500
pub fn classify(err: &DataError) -> (StatusCode, &'static str) {
    match err {
        DataError::Input(input) => (StatusCode::BAD_REQUEST, input.code()),
        DataError::PoolExhausted => (StatusCode::SERVICE_UNAVAILABLE, "POOL_EXHAUSTED"),
        DataError::ConnectionError(_) => (StatusCode::SERVICE_UNAVAILABLE, "DB_UNAVAILABLE"),
        DataError::QueryError(_) | DataError::InsertError(_) | DataError::MigrationError(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERROR")
        }
        DataError::FetchError(_) | DataError::ParseError(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "PROVIDER_ERROR")
        }
        DataError::Timeout(_) => (StatusCode::INTERNAL_SERVER_ERROR, "TIMEOUT"),
        DataError::SerializationError(_) | DataError::ConfigError(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
        }
    }
}

/// 데이터 오류를 HTTP 에러 응답으로 변환합니다.
pub fn data_error_response(err: DataError) -> (StatusCode, Json<ApiErrorResponse>) {
    let (status, code) = classify(&err);

    if status.is_server_error() {
        error!(code = code, error = %err, "요청 처리 실패");
    } else {
        warn!(code = code, error = %err, "잘못된 요청");
    }

    (status, Json(ApiErrorResponse::new(code, err.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use histprice_core::InputError;

    #[test]
    fn test_api_error_response_new() {
        let error = ApiErrorResponse::new("TEST_ERROR", "Test message");
        assert_eq!(error.code(), "TEST_ERROR");
        assert_eq!(error.message(), "Test message");
        assert!(error.timestamp.is_some());
    }

    #[test]
    fn test_input_errors_are_bad_request() {
        let cases = [
            (InputError::MissingSymbol, "MISSING_SYMBOL"),
            (InputError::MissingDateOrRange, "MISSING_DATE_OR_RANGE"),
            (InputError::InvalidRange("5x".into()), "INVALID_RANGE"),
            (InputError::InvalidDate("2022-02-04".into()), "INVALID_DATE"),
        ];

        for (input, expected) in cases {
            let (status, code) = classify(&DataError::Input(input));
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(code, expected);
        }
    }

    #[test]
    fn test_collaborator_failures() {
        assert_eq!(
            classify(&DataError::PoolExhausted).0,
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            classify(&DataError::FetchError("down".into())),
            (StatusCode::INTERNAL_SERVER_ERROR, "PROVIDER_ERROR")
        );
        assert_eq!(
            classify(&DataError::QueryError("boom".into())).1,
            "DB_ERROR"
        );
    }

    #[test]
    fn test_json_serialization() {
        let (_, Json(body)) = data_error_response(DataError::FetchError("IEX 503".into()));
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains(r#""code":"PROVIDER_ERROR""#));
        assert!(json.contains("timestamp"));
    }
}
