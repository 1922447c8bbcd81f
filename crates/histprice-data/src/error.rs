//! 데이터 모듈 오류 타입.

use histprice_core::InputError;
use thiserror::Error;

/// 데이터 관련 오류.
///
/// `Input`을 제외한 모든 변형은 협력자(저장소, 데이터 제공자) 호출 실패이며
/// 재시도 없이 그대로 전파됩니다.
#[derive(Debug, Error)]
pub enum DataError {
    /// 사용자 입력 오류 (협력자 호출 전에 감지)
    #[error(transparent)]
    Input(#[from] InputError),

    /// 데이터베이스 연결 오류
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    /// 쿼리 실행 오류
    #[error("Query error: {0}")]
    QueryError(String),

    /// 데이터 삽입 오류
    #[error("Insert error: {0}")]
    InsertError(String),

    /// 직렬화/역직렬화 오류
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// 설정 오류
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// 마이그레이션 오류
    #[error("Migration error: {0}")]
    MigrationError(String),

    /// 연결 풀 소진
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// 타임아웃 오류
    #[error("Operation timeout: {0}")]
    Timeout(String),

    /// 데이터 가져오기 오류 (외부 소스)
    #[error("Fetch error: {0}")]
    FetchError(String),

    /// 파싱 오류
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl DataError {
    /// 사용자 입력 오류인지 확인합니다 (클라이언트 오류 응답 대상).
    pub fn is_client_error(&self) -> bool {
        matches!(self, DataError::Input(_))
    }

    /// 저장소 또는 데이터 제공자 호출 실패인지 확인합니다.
    pub fn is_collaborator_unavailable(&self) -> bool {
        !self.is_client_error()
    }

    /// 입력 오류이면 해당 오류를 반환합니다.
    pub fn as_input(&self) -> Option<&InputError> {
        match self {
            DataError::Input(e) => Some(e),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for DataError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => DataError::PoolExhausted,
            sqlx::Error::Io(e) => DataError::ConnectionError(e.to_string()),
            sqlx::Error::Database(db_err) => DataError::QueryError(db_err.message().to_string()),
            _ => DataError::QueryError(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DataError::Timeout(err.to_string())
        } else if err.is_decode() {
            DataError::ParseError(err.to_string())
        } else {
            DataError::FetchError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_are_client_errors() {
        let err: DataError = InputError::MissingSymbol.into();
        assert!(err.is_client_error());
        assert!(!err.is_collaborator_unavailable());
        assert_eq!(err.as_input(), Some(&InputError::MissingSymbol));
        assert_eq!(err.to_string(), InputError::MissingSymbol.to_string());
    }

    #[test]
    fn test_collaborator_errors() {
        for err in [
            DataError::FetchError("503".into()),
            DataError::QueryError("boom".into()),
            DataError::PoolExhausted,
        ] {
            assert!(err.is_collaborator_unavailable());
            assert!(err.as_input().is_none());
        }
    }

    #[test]
    fn test_from_sqlx_pool_timeout() {
        let err: DataError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, DataError::PoolExhausted));
    }
}
