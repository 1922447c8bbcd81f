//! 조회 기간 명세 및 기간 토큰 확장.
//!
//! 기간 토큰(`"5d"`, `"2m"`, `"1y"`, `"ytd"`)을 `today`로 끝나는
//! 거래일 목록으로 변환합니다.
//!
//! # 확장 규칙
//!
//! | 토큰 | 시작일 | 종료일 |
//! |------|--------|--------|
//! | `ytd` | `today`가 속한 해의 1월 1일 | `today` (미포함) |
//! | `<n>d` | `today` - n일 | `today` (미포함) |
//! | `<n>m` | `today` - n개월 (월말 보정) | `today` (미포함) |
//! | `<n>y` | `today` - n년 (월말 보정) | `today` (미포함) |
//!
//! 주말은 제외하지만 휴장일은 제외하지 않습니다.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::calendar::is_trading_day;
use crate::domain::dates::parse_compact_date;
use crate::error::{InputError, InputResult};

/// 기간 토큰.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RangeToken {
    /// 연초부터 현재까지
    YearToDate,
    /// 최근 n일
    Days(u32),
    /// 최근 n개월
    Months(u32),
    /// 최근 n년
    Years(u32),
}

impl FromStr for RangeToken {
    type Err = InputError;

    /// 대소문자를 구분하지 않고 `ytd` 또는 `<숫자><d|m|y>`를 파싱합니다.
    ///
    /// 부호, 소수점, 공백이 포함된 토큰은 거부합니다.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InputError::InvalidRange(s.to_string());

        if s.eq_ignore_ascii_case("ytd") {
            return Ok(RangeToken::YearToDate);
        }

        let unit = s.chars().last().ok_or_else(invalid)?;
        let digits = &s[..s.len() - unit.len_utf8()];
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let count: u32 = digits.parse().map_err(|_| invalid())?;

        match unit.to_ascii_lowercase() {
            'd' => Ok(RangeToken::Days(count)),
            'm' => Ok(RangeToken::Months(count)),
            'y' => Ok(RangeToken::Years(count)),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for RangeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeToken::YearToDate => write!(f, "ytd"),
            RangeToken::Days(n) => write!(f, "{}d", n),
            RangeToken::Months(n) => write!(f, "{}m", n),
            RangeToken::Years(n) => write!(f, "{}y", n),
        }
    }
}

impl TryFrom<String> for RangeToken {
    type Error = InputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RangeToken> for String {
    fn from(token: RangeToken) -> Self {
        token.to_string()
    }
}

impl RangeToken {
    /// 기간의 시작일 계산.
    ///
    /// 달력 범위를 벗어나면 `InvalidRange`를 반환합니다.
    pub fn start_date(&self, today: NaiveDate) -> InputResult<NaiveDate> {
        let start = match *self {
            RangeToken::YearToDate => NaiveDate::from_ymd_opt(today.year(), 1, 1),
            RangeToken::Days(n) => today.checked_sub_days(Days::new(u64::from(n))),
            RangeToken::Months(n) => today.checked_sub_months(Months::new(n)),
            RangeToken::Years(n) => n
                .checked_mul(12)
                .and_then(|months| today.checked_sub_months(Months::new(months))),
        };

        start.ok_or_else(|| InputError::InvalidRange(self.to_string()))
    }

    /// `[시작일, today)` 구간의 거래일 목록 (오래된 날짜부터).
    pub fn expand(&self, today: NaiveDate) -> InputResult<Vec<NaiveDate>> {
        let start = self.start_date(today)?;
        Ok(start
            .iter_days()
            .take_while(|date| *date < today)
            .filter(|date| is_trading_day(*date))
            .collect())
    }
}

/// 기간 토큰 문자열을 거래일 목록으로 확장합니다.
pub fn expand_range(token: &str, today: NaiveDate) -> InputResult<Vec<NaiveDate>> {
    token.parse::<RangeToken>()?.expand(today)
}

/// 조회 기간 명세.
///
/// 날짜 하나 또는 기간 토큰 중 정확히 하나를 나타냅니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSpec {
    /// 특정 날짜 하나
    SingleDate(NaiveDate),
    /// 기간 토큰
    Range(RangeToken),
}

impl RangeSpec {
    /// 요청 파라미터에서 명세를 생성합니다.
    ///
    /// - 공백 문자열은 지정되지 않은 것으로 취급합니다.
    /// - 둘 다 지정되면 날짜가 우선합니다.
    /// - 둘 다 없으면 `MissingDateOrRange`를 반환합니다.
    pub fn from_params(date: Option<&str>, range: Option<&str>) -> InputResult<Self> {
        let date = date.map(str::trim).filter(|d| !d.is_empty());
        let range = range.map(str::trim).filter(|r| !r.is_empty());

        match (date, range) {
            (Some(date), _) => Ok(RangeSpec::SingleDate(parse_compact_date(date)?)),
            (None, Some(range)) => Ok(RangeSpec::Range(range.parse()?)),
            (None, None) => Err(InputError::MissingDateOrRange),
        }
    }
}

impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeSpec::SingleDate(date) => write!(f, "date={}", date),
            RangeSpec::Range(token) => write!(f, "range={}", token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_tokens() {
        assert_eq!("ytd".parse::<RangeToken>().unwrap(), RangeToken::YearToDate);
        assert_eq!("YTD".parse::<RangeToken>().unwrap(), RangeToken::YearToDate);
        assert_eq!("5d".parse::<RangeToken>().unwrap(), RangeToken::Days(5));
        assert_eq!("2M".parse::<RangeToken>().unwrap(), RangeToken::Months(2));
        assert_eq!("10y".parse::<RangeToken>().unwrap(), RangeToken::Years(10));
        assert_eq!("0d".parse::<RangeToken>().unwrap(), RangeToken::Days(0));
    }

    #[test]
    fn test_parse_rejects_malformed_tokens() {
        for bad in ["5x", "abc", "-3d", "+3d", "1.5d", "d", "", " 5d", "5dd", "99999999999d", "5일"] {
            assert_eq!(
                bad.parse::<RangeToken>(),
                Err(InputError::InvalidRange(bad.to_string())),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_display_is_canonical() {
        assert_eq!("5D".parse::<RangeToken>().unwrap().to_string(), "5d");
        assert_eq!("Ytd".parse::<RangeToken>().unwrap().to_string(), "ytd");
    }

    #[test]
    fn test_expand_ytd() {
        let today = ymd(2022, 2, 4);
        let dates = RangeToken::YearToDate.expand(today).unwrap();

        // 2022-01-01은 토요일, 첫 거래일은 1월 3일
        assert_eq!(dates.first(), Some(&ymd(2022, 1, 3)));
        assert_eq!(dates.last(), Some(&ymd(2022, 2, 3)));
        assert_eq!(dates.len(), 24);
        assert!(!dates.contains(&today));
        assert!(dates.iter().all(|d| is_trading_day(*d)));
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_expand_days() {
        // 2022-02-07 월요일
        let dates = expand_range("5d", ymd(2022, 2, 7)).unwrap();
        assert_eq!(dates, vec![ymd(2022, 2, 2), ymd(2022, 2, 3), ymd(2022, 2, 4)]);
    }

    #[test]
    fn test_expand_zero_is_empty() {
        assert!(expand_range("0d", ymd(2022, 2, 7)).unwrap().is_empty());
    }

    #[test]
    fn test_expand_on_new_year_ytd_is_empty() {
        assert!(expand_range("ytd", ymd(2022, 1, 1)).unwrap().is_empty());
    }

    #[test]
    fn test_month_end_clamping() {
        // 3월 31일 - 1개월 = 2월 28일
        assert_eq!(
            RangeToken::Months(1).start_date(ymd(2022, 3, 31)).unwrap(),
            ymd(2022, 2, 28)
        );
        // 윤년 2월 29일 - 1년 = 2월 28일
        assert_eq!(
            RangeToken::Years(1).start_date(ymd(2024, 2, 29)).unwrap(),
            ymd(2023, 2, 28)
        );
    }

    #[test]
    fn test_out_of_calendar_range_is_invalid() {
        assert!(matches!(
            RangeToken::Years(u32::MAX).start_date(ymd(2022, 2, 7)),
            Err(InputError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_range_spec_from_params() {
        assert_eq!(
            RangeSpec::from_params(Some("20220204"), None).unwrap(),
            RangeSpec::SingleDate(ymd(2022, 2, 4))
        );
        assert_eq!(
            RangeSpec::from_params(None, Some("ytd")).unwrap(),
            RangeSpec::Range(RangeToken::YearToDate)
        );
        // 날짜 우선
        assert_eq!(
            RangeSpec::from_params(Some("20220204"), Some("5d")).unwrap(),
            RangeSpec::SingleDate(ymd(2022, 2, 4))
        );
        // 공백은 미지정
        assert_eq!(
            RangeSpec::from_params(Some("  "), Some("1m")).unwrap(),
            RangeSpec::Range(RangeToken::Months(1))
        );
    }

    #[test]
    fn test_range_spec_errors() {
        assert_eq!(RangeSpec::from_params(None, None), Err(InputError::MissingDateOrRange));
        assert_eq!(RangeSpec::from_params(Some(""), Some("")), Err(InputError::MissingDateOrRange));
        assert_eq!(
            RangeSpec::from_params(None, Some("5x")),
            Err(InputError::InvalidRange("5x".to_string()))
        );
        assert_eq!(
            RangeSpec::from_params(Some("2022-02-04"), None),
            Err(InputError::InvalidDate("2022-02-04".to_string()))
        );
    }

    proptest! {
        #[test]
        fn prop_expansion_is_sorted_weekday_only_and_before_today(
            days in 0u32..2000,
            offset in 0i64..20000,
        ) {
            let today = ymd(2000, 1, 1) + chrono::Duration::days(offset);
            let dates = RangeToken::Days(days).expand(today).unwrap();

            prop_assert!(dates.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(dates.iter().all(|d| is_trading_day(*d) && *d < today));
            prop_assert!(dates.len() <= days as usize);
        }
    }
}
