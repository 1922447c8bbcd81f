//! 시장 데이터 타입 및 구조체.
//!
//! 이 모듈은 시장 데이터 관련 타입을 정의합니다:
//! - `PriceRecord` - 일별 OHLCV 시세 레코드
//! - `SymbolInfo` - 데이터 제공자가 지원하는 종목 정보
//! - `LastTradedPrice` - 최근 체결가

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::dates::STORE_DATE_FORMAT;

/// 일별 OHLCV 시세 레코드.
///
/// 식별자는 `(symbol, date)` 쌍입니다. 저장소가 부여하는 대리 키는
/// 도메인 의미가 없으므로 이 구조체에 포함하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct PriceRecord {
    /// 종목 심볼 (예: "AAPL")
    pub symbol: String,
    /// 거래일 (`YYYY-MM-DD`로 직렬화)
    pub date: NaiveDate,
    /// 시가
    pub open: Decimal,
    /// 고가
    pub high: Decimal,
    /// 저가
    pub low: Decimal,
    /// 종가
    pub close: Decimal,
    /// 거래량
    pub volume: u64,
}

impl PriceRecord {
    /// 새 시세 레코드를 생성합니다.
    pub fn new(
        symbol: impl Into<String>,
        date: NaiveDate,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: u64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// 저장소 조회 키로 쓰이는 날짜 문자열 (`YYYY-MM-DD`).
    pub fn store_date(&self) -> String {
        self.date.format(STORE_DATE_FORMAT).to_string()
    }

    /// 같은 `(symbol, date)`를 가리키는지 확인합니다.
    pub fn same_key(&self, other: &PriceRecord) -> bool {
        self.symbol == other.symbol && self.date == other.date
    }
}

/// 데이터 제공자가 지원하는 종목 정보.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    /// 종목 심볼
    pub symbol: String,
    /// 종목명
    #[serde(default)]
    pub name: String,
    /// 기준일
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// 거래 가능 여부
    #[serde(default)]
    pub is_enabled: bool,
}

/// 최근 체결가.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct LastTradedPrice {
    /// 종목 심볼
    pub symbol: String,
    /// 체결가
    pub price: Decimal,
    /// 체결 수량
    #[serde(default)]
    pub size: u64,
    /// 체결 시각 (Unix epoch 밀리초)
    #[serde(default)]
    pub time: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> PriceRecord {
        PriceRecord::new(
            "DUMM",
            NaiveDate::from_ymd_opt(2020, 11, 9).unwrap(),
            dec!(90.0),
            dec!(95.50),
            dec!(87.50),
            dec!(92.75),
            123456,
        )
    }

    #[test]
    fn test_store_date() {
        assert_eq!(sample().store_date(), "2020-11-09");
    }

    #[test]
    fn test_serializes_date_in_store_format() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["date"], "2020-11-09");
        assert_eq!(json["volume"], 123456);
    }

    #[test]
    fn test_deserializes_numeric_prices() {
        let json = r#"{"symbol":"AAPL","date":"2022-02-04","open":171.68,"high":174.1,"low":170.68,"close":172.39,"volume":82465396}"#;
        let record: PriceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.close, dec!(172.39));
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2022, 2, 4).unwrap());
    }

    #[test]
    fn test_same_key_ignores_prices() {
        let a = sample();
        let mut b = sample();
        b.close = dec!(1);
        assert!(a.same_key(&b));

        b.date = NaiveDate::from_ymd_opt(2020, 11, 10).unwrap();
        assert!(!a.same_key(&b));
    }

    #[test]
    fn test_symbol_info_camel_case() {
        let json = r#"{"symbol":"A","name":"Agilent","date":"2019-07-10","isEnabled":true}"#;
        let info: SymbolInfo = serde_json::from_str(json).unwrap();
        assert!(info.is_enabled);
        assert_eq!(info.name, "Agilent");
    }
}
