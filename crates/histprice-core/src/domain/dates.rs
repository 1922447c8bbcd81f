//! 날짜 형식 변환.
//!
//! 요청과 데이터 제공자는 압축 형식(`YYYYMMDD`)을, 저장소는 구분자
//! 형식(`YYYY-MM-DD`)을 사용합니다.

use chrono::NaiveDate;

use crate::error::{InputError, InputResult};

/// 압축 날짜 형식 (`YYYYMMDD`).
pub const COMPACT_DATE_FORMAT: &str = "%Y%m%d";

/// 저장소 날짜 형식 (`YYYY-MM-DD`).
pub const STORE_DATE_FORMAT: &str = "%Y-%m-%d";

/// 압축 날짜를 저장소 날짜로 변환합니다.
///
/// 고정 위치(4, 7)에 `-`를 삽입하는 순수 문자열 변환입니다.
/// 입력은 8자리 숫자라고 가정하며 검증하지 않습니다.
pub fn to_store_format(compact: &str) -> String {
    let mut out = String::with_capacity(compact.len() + 2);
    for (i, c) in compact.chars().enumerate() {
        if i == 4 || i == 6 {
            out.push('-');
        }
        out.push(c);
    }
    out
}

/// 날짜를 압축 형식 문자열로 변환합니다.
pub fn to_compact(date: NaiveDate) -> String {
    date.format(COMPACT_DATE_FORMAT).to_string()
}

/// 압축 날짜 문자열을 파싱합니다.
///
/// 정확히 8자리 숫자이며 달력상 유효한 날짜여야 합니다.
pub fn parse_compact_date(value: &str) -> InputResult<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.len() != 8 || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(InputError::InvalidDate(value.to_string()));
    }

    NaiveDate::parse_from_str(trimmed, COMPACT_DATE_FORMAT)
        .map_err(|_| InputError::InvalidDate(value.to_string()))
}
