//! 입력 검증 에러 타입.
//!
//! 외부 협력자(저장소, 데이터 제공자)를 호출하기 전에 로컬에서 감지되는
//! 사용자 입력 에러를 정의합니다.

use thiserror::Error;

/// 사용자 입력 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// 심볼이 비어 있음
    #[error("심볼이 지정되지 않았습니다")]
    MissingSymbol,

    /// 날짜와 기간이 모두 비어 있음
    #[error("날짜 또는 기간 중 하나를 지정해야 합니다")]
    MissingDateOrRange,

    /// 잘못된 기간 토큰
    #[error("잘못된 기간: {0}")]
    InvalidRange(String),

    /// 잘못된 날짜 (YYYYMMDD 형식이 아님)
    #[error("잘못된 날짜: {0}")]
    InvalidDate(String),
}

/// 입력 검증 Result 타입.
pub type InputResult<T> = Result<T, InputError>;

impl InputError {
    /// 에러 코드 반환 (API 응답용).
    pub fn code(&self) -> &'static str {
        match self {
            InputError::MissingSymbol => "MISSING_SYMBOL",
            InputError::MissingDateOrRange => "MISSING_DATE_OR_RANGE",
            InputError::InvalidRange(_) => "INVALID_RANGE",
            InputError::InvalidDate(_) => "INVALID_DATE",
        }
    }
}
