//! 거래일 판정.
//!
//! 토요일과 일요일만 비거래일로 취급합니다. 휴장일 달력은 모델링하지 않습니다.

use chrono::{Datelike, NaiveDate, Weekday};

/// 주말(토/일) 여부.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// 거래일(주말이 아닌 날) 여부.
pub fn is_trading_day(date: NaiveDate) -> bool {
    !is_weekend(date)
}
