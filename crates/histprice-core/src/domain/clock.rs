//! 현재 날짜 제공자.
//!
//! 기간 확장의 기준이 되는 "오늘"은 시스템 상태에서 직접 읽지 않고
//! `Clock`을 통해 주입받습니다.

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

/// 현재 날짜를 제공하는 trait.
pub trait Clock: Send + Sync {
    /// 오늘 날짜.
    fn today(&self) -> NaiveDate;
}

/// 시스템 시계 기반 구현.
///
/// 지정된 시간대의 현재 날짜를 반환합니다.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    timezone: Tz,
}

impl SystemClock {
    /// 지정된 시간대로 생성합니다.
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// UTC 기준 시계.
    pub fn utc() -> Self {
        Self::new(Tz::UTC)
    }

    /// IANA 시간대 이름으로 생성합니다 (예: "America/New_York").
    pub fn from_timezone_name(name: &str) -> Result<Self, String> {
        name.parse::<Tz>()
            .map(Self::new)
            .map_err(|e| format!("Unknown timezone {}: {}", name, e))
    }

    /// 사용 중인 시간대.
    pub fn timezone(&self) -> Tz {
        self.timezone
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::utc()
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }
}

/// 고정된 날짜를 반환하는 시계 (테스트용).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
