//! 저장소 기반 과거 시세 해석기.
//!
//! 레코드 저장소와 IEX 데이터 제공자를 결합하여 중복 외부 호출 없이
//! 일별 시세를 반환합니다.
//!
//! # 동작 흐름
//!
//! ```text
//! 요청 (symbol, date | range)
//!         │
//!         ▼
//! ┌───────────────────┐
//! │ 1. 입력 검증        │ ← 협력자 호출 전 (심볼, 날짜, 기간 시작일)
//! └─────────┬─────────┘
//!           │
//! ┌─────────▼─────────┐
//! │ 2. 주말 단일 날짜?  │ ← YES면 빈 결과, 호출 없음
//! └─────────┬─────────┘
//!           │
//! ┌─────────▼─────────┐
//! │ 3. 심볼 Lock 획득   │ ← 같은 심볼은 하나만 처리
//! └─────────┬─────────┘
//!           │
//!     ┌─────┴──────┐
//!     │ 저장된 심볼? │
//!     └─────┬──────┘
//!        NO │ YES
//!           │   │
//!           ▼   ▼
//!   ┌────────────┐  ┌──────────────────────┐
//!   │ 4. 전체 구간 │  │ 5. 날짜별 저장소 조회  │
//!   │   1회 수집   │  │    누락 시 1회 수집   │
//!   │   전부 저장  │  │    첫 레코드만 저장   │
//!   └────────────┘  └──────────────────────┘
//! ```
//!
//! 처음 보는 심볼은 저장소를 건너뛰고 요청 전체를 한 번에 가져옵니다.
//! 이미 저장된 심볼의 기간 요청만 거래일 목록으로 확장하고 날짜마다 저장소를 먼저 확인합니다.
//! 심볼 Lock은 마지막 요청이 끝나면 맵에서 제거됩니다.

use chrono::NaiveDate;
use histprice_core::{
    is_weekend, to_compact, to_store_format, Clock, InputError, PriceRecord, RangeSpec,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::provider::PriceProvider;
use crate::storage::RecordStore;

/// 심볼별 수집 상태를 추적하는 Lock 맵.
type FetchLockMap = Arc<RwLock<HashMap<String, Arc<RwLock<()>>>>>;

/// 한 날짜의 데이터 출처.
#[derive(Debug, Clone, PartialEq)]
pub enum DateSource {
    /// 저장소에서 찾은 레코드
    Store(PriceRecord),
    /// 데이터 제공자가 반환한 목록 (비어 있을 수 있음)
    Provider(Vec<PriceRecord>),
}

/// 날짜 하나에 대한 해석 결과.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// 호출자에게 돌려줄 레코드
    pub output: Vec<PriceRecord>,
    /// 저장소에 새로 기록할 레코드
    pub persist: Option<PriceRecord>,
}

impl DateSource {
    /// 저장 여부와 출력 목록을 결정합니다.
    ///
    /// | 출처 | 출력 | 저장 |
    /// |------|------|------|
    /// | 저장소 적중 | `[stored]` | 없음 |
    /// | 제공자, 비어 있지 않음 | 제공자 목록 그대로 | 첫 레코드 |
    /// | 제공자, 비어 있음 | `[]` | 없음 |
    pub fn resolve(self) -> Resolution {
        match self {
            DateSource::Store(record) => Resolution {
                output: vec![record],
                persist: None,
            },
            DateSource::Provider(records) => Resolution {
                persist: records.first().cloned(),
                output: records,
            },
        }
    }
}

/// 해석 통계 (로그 필드용).
#[derive(Debug, Default, Clone, Copy)]
struct ResolveStats {
    hits: usize,
    misses: usize,
    persisted: usize,
}

/// 저장소 우선 과거 시세 해석기.
pub struct PriceResolver {
    store: Arc<dyn RecordStore>,
    provider: Arc<dyn PriceProvider>,
    clock: Arc<dyn Clock>,
    /// 동시성 제어를 위한 Lock 맵
    fetch_locks: FetchLockMap,
}

impl PriceResolver {
    /// 새로운 해석기 생성.
    pub fn new(
        store: Arc<dyn RecordStore>,
        provider: Arc<dyn PriceProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            provider,
            clock,
            fetch_locks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// 원시 요청 파라미터로 과거 시세를 조회합니다.
    ///
    /// 빈 문자열 파라미터는 없는 것으로 취급하며 `date`가 `range`보다 우선합니다.
    pub async fn resolve(
        &self,
        symbol: &str,
        date: Option<&str>,
        range: Option<&str>,
    ) -> Result<Vec<PriceRecord>> {
        let symbol = validate_symbol(symbol)?;
        let spec = RangeSpec::from_params(date, range)?;
        self.resolve_spec(symbol, &spec).await
    }

    /// 검증된 조회 조건으로 과거 시세를 조회합니다.
    #[instrument(skip(self, spec), fields(spec = %spec))]
    pub async fn resolve_spec(&self, symbol: &str, spec: &RangeSpec) -> Result<Vec<PriceRecord>> {
        let symbol = validate_symbol(symbol)?;
        let today = self.clock.today();

        // 기간 오류는 협력자 호출 전에 드러나야 함. 확장은 저장된 심볼에서만 수행
        match spec {
            RangeSpec::SingleDate(date) if is_weekend(*date) => {
                debug!(date = %date, "주말 날짜 요청, 빈 결과 반환");
                return Ok(Vec::new());
            }
            RangeSpec::SingleDate(_) => {}
            RangeSpec::Range(token) => {
                token.start_date(today)?;
            }
        }

        let lease = self.acquire_lock(symbol).await;
        let _guard = lease.lock.write().await;

        if !self.store.exists_for_symbol(symbol).await? {
            return self.fetch_new_symbol(symbol, spec).await;
        }

        let mut stats = ResolveStats::default();
        let (dates, records) = match spec {
            RangeSpec::SingleDate(date) => {
                let output = self.resolve_date(symbol, *date, &mut stats).await?;
                (1, output)
            }
            RangeSpec::Range(token) => {
                let dates = token.expand(today)?;
                let mut output = Vec::with_capacity(dates.len());
                for date in &dates {
                    let resolved = self.resolve_date(symbol, *date, &mut stats).await?;
                    if let Some(first) = resolved.into_iter().next() {
                        output.push(first);
                    }
                }
                (dates.len(), output)
            }
        };

        info!(
            symbol = symbol,
            dates = dates,
            hits = stats.hits,
            misses = stats.misses,
            persisted = stats.persisted,
            returned = records.len(),
            "과거 시세 해석 완료"
        );

        Ok(records)
    }

    /// 현재 Lock 맵에 남아 있는 심볼 수.
    pub async fn tracked_lock_count(&self) -> usize {
        self.fetch_locks.read().await.len()
    }

    /// 처음 보는 심볼: 요청 전체를 한 번에 수집하고 모두 저장합니다.
    async fn fetch_new_symbol(&self, symbol: &str, spec: &RangeSpec) -> Result<Vec<PriceRecord>> {
        let records = match spec {
            RangeSpec::SingleDate(date) => {
                self.provider.fetch_by_date(symbol, &to_compact(*date)).await?
            }
            RangeSpec::Range(token) => self.provider.fetch_by_range(symbol, token).await?,
        };

        for record in &records {
            self.store.insert(record).await?;
        }

        info!(
            symbol = symbol,
            persisted = records.len(),
            "신규 심볼, 저장소 우회 후 전체 저장"
        );

        Ok(records)
    }

    /// 저장된 심볼의 날짜 하나를 해석합니다.
    async fn resolve_date(
        &self,
        symbol: &str,
        date: NaiveDate,
        stats: &mut ResolveStats,
    ) -> Result<Vec<PriceRecord>> {
        let compact = to_compact(date);
        let store_date = to_store_format(&compact);

        let source = match self.store.find_one(symbol, &store_date).await? {
            Some(record) => {
                stats.hits += 1;
                DateSource::Store(record)
            }
            None => {
                stats.misses += 1;
                DateSource::Provider(self.provider.fetch_by_date(symbol, &compact).await?)
            }
        };

        let resolution = source.resolve();
        if let Some(record) = &resolution.persist {
            self.store.insert(record).await?;
            stats.persisted += 1;
            debug!(symbol = symbol, date = %store_date, "수집 레코드 저장");
        }

        Ok(resolution.output)
    }

    /// 동시성 제어를 위한 Lock 획득 또는 생성.
    async fn acquire_lock(&self, key: &str) -> FetchLockLease {
        let lock = {
            let locks = self.fetch_locks.read().await;
            locks.get(key).cloned()
        };

        let lock = match lock {
            Some(lock) => lock,
            None => {
                let mut locks = self.fetch_locks.write().await;
                locks
                    .entry(key.to_string())
                    .or_insert_with(|| Arc::new(RwLock::new(())))
                    .clone()
            }
        };

        FetchLockLease {
            locks: self.fetch_locks.clone(),
            key: key.to_string(),
            lock,
        }
    }
}

/// 심볼 Lock 대여. 마지막 사용자가 반납하면 맵에서 항목을 제거합니다.
struct FetchLockLease {
    locks: FetchLockMap,
    key: String,
    lock: Arc<RwLock<()>>,
}

impl Drop for FetchLockLease {
    fn drop(&mut self) {
        // 맵 쓰기 Lock을 잡은 동안에는 새 복제본이 생기지 않음.
        // 맵이 사용 중이면 항목을 남겨 두고 다음 반납 때 정리
        if let Ok(mut locks) = self.locks.try_write() {
            let is_current = locks
                .get(&self.key)
                .is_some_and(|lock| Arc::ptr_eq(lock, &self.lock));
            if is_current && Arc::strong_count(&self.lock) == 2 {
                locks.remove(&self.key);
            }
        }
    }
}

/// 앞뒤 공백을 제거한 심볼. 비어 있으면 `MissingSymbol`.
pub fn validate_symbol(symbol: &str) -> std::result::Result<&str, InputError> {
    let trimmed = symbol.trim();
    if trimmed.is_empty() {
        Err(InputError::MissingSymbol)
    } else {
        Ok(trimmed)
    }
}
