//! 인메모리 시세 저장소.

use async_trait::async_trait;
use histprice_core::PriceRecord;
use tokio::sync::RwLock;
use tracing::debug;

use super::RecordStore;
use crate::error::Result;

/// 인메모리 시세 저장소.
///
/// 삽입 순서를 유지하며, 이미 있는 `(symbol, date)`의 삽입은 무시합니다.
#[derive(Debug, Default)]
pub struct InMemoryPriceStore {
    records: RwLock<Vec<PriceRecord>>,
}

impl InMemoryPriceStore {
    /// 빈 저장소를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 초기 레코드로 저장소를 생성합니다.
    pub fn with_records(records: Vec<PriceRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// 저장된 레코드 수.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// 저장소가 비어 있는지 확인합니다.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for InMemoryPriceStore {
    async fn find_one(&self, symbol: &str, store_date: &str) -> Result<Option<PriceRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .find(|r| r.symbol == symbol && r.store_date() == store_date)
            .cloned())
    }

    async fn find_all_by_symbol(&self, symbol: &str) -> Result<Vec<PriceRecord>> {
        let records = self.records.read().await;
        let mut found: Vec<PriceRecord> = records
            .iter()
            .filter(|r| r.symbol == symbol)
            .cloned()
            .collect();
        found.sort_by_key(|r| r.date);
        Ok(found)
    }

    async fn exists_for_symbol(&self, symbol: &str) -> Result<bool> {
        let records = self.records.read().await;
        Ok(records.iter().any(|r| r.symbol == symbol))
    }

    async fn insert(&self, record: &PriceRecord) -> Result<()> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.same_key(record)) {
            debug!(symbol = %record.symbol, date = %record.date, "이미 저장된 레코드, 삽입 생략");
            return Ok(());
        }
        records.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn record(symbol: &str, y: i32, m: u32, d: u32, close: rust_decimal::Decimal) -> PriceRecord {
        PriceRecord::new(
            symbol,
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            dec!(90.0),
            dec!(95.5),
            dec!(87.5),
            close,
            1000,
        )
    }

    #[tokio::test]
    async fn test_find_one_by_store_date() {
        let store = InMemoryPriceStore::with_records(vec![
            record("DUMM", 2020, 11, 9, dec!(92.75)),
            record("DUMB", 2020, 11, 9, dec!(80.75)),
            record("DUMM", 2020, 11, 10, dec!(90.0)),
        ]);

        let found = store.find_one("DUMM", "2020-11-09").await.unwrap().unwrap();
        assert_eq!(found.close, dec!(92.75));
        assert!(store.find_one("DUMM", "2020-11-11").await.unwrap().is_none());
        assert!(store.find_one("NONE", "2020-11-09").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_all_sorted_by_date() {
        let store = InMemoryPriceStore::with_records(vec![
            record("DUMM", 2020, 11, 10, dec!(90.0)),
            record("DUMM", 2020, 11, 9, dec!(92.75)),
        ]);

        let all = store.find_all_by_symbol("DUMM").await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].date < all[1].date);
    }

    #[tokio::test]
    async fn test_duplicate_insert_keeps_first() {
        let store = InMemoryPriceStore::new();
        assert!(!store.exists_for_symbol("DUMM").await.unwrap());

        store.insert(&record("DUMM", 2020, 11, 9, dec!(92.75))).await.unwrap();
        store.insert(&record("DUMM", 2020, 11, 9, dec!(1.0))).await.unwrap();

        assert_eq!(store.len().await, 1);
        assert!(store.exists_for_symbol("DUMM").await.unwrap());
        let found = store.find_one("DUMM", "2020-11-09").await.unwrap().unwrap();
        assert_eq!(found.close, dec!(92.75));
    }
}
