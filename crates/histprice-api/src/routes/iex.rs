//! IEX 시세 endpoint.
//!
//! - `GET /iex/symbols` - 지원 종목 목록
//! - `GET /iex/lastTradedPrice?symbols=A,B` - 최근 체결가
//! - `GET /iex/historicalPrices?symbol=S&date=YYYYMMDD|range=TOKEN` - 과거 일별 시세
//! - `GET /iex/storedPrices?symbol=S` - 저장소에 보관된 시세

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use histprice_core::{LastTradedPrice, PriceRecord, SymbolInfo};
use histprice_data::manager::split_symbols;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;
use utoipa::IntoParams;

use crate::error::{data_error_response, ApiErrorResponse, ApiResult};
use crate::state::AppState;

/// 과거 시세 조회 파라미터.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct HistoricalPricesQuery {
    /// 종목 심볼
    pub symbol: Option<String>,
    /// 조회 날짜 (`YYYYMMDD`), 지정 시 `range`보다 우선
    pub date: Option<String>,
    /// 기간 토큰 (`ytd`, `5d`, `1m`, `2y` 등)
    pub range: Option<String>,
}

/// 종목 하나를 지정하는 파라미터.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SymbolQuery {
    /// 종목 심볼
    pub symbol: Option<String>,
}

/// 최근 체결가 조회 파라미터.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct LastTradedPriceQuery {
    /// 쉼표로 구분된 종목 심볼 목록
    pub symbols: Option<String>,
}

/// 지원 종목 목록.
#[utoipa::path(
    get,
    path = "/iex/symbols",
    responses(
        (status = 200, description = "종목 목록", body = [SymbolInfo]),
        (status = 500, description = "데이터 제공자 오류", body = ApiErrorResponse)
    ),
    tag = "iex"
)]
pub async fn list_symbols(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<SymbolInfo>>> {
    let symbols = state
        .manager
        .all_symbols()
        .await
        .map_err(data_error_response)?;
    Ok(Json(symbols))
}

/// 최근 체결가.
#[utoipa::path(
    get,
    path = "/iex/lastTradedPrice",
    params(LastTradedPriceQuery),
    responses(
        (status = 200, description = "최근 체결가 목록", body = [LastTradedPrice]),
        (status = 400, description = "심볼 누락", body = ApiErrorResponse),
        (status = 500, description = "데이터 제공자 오류", body = ApiErrorResponse)
    ),
    tag = "iex"
)]
pub async fn last_traded_price(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LastTradedPriceQuery>,
) -> ApiResult<Json<Vec<LastTradedPrice>>> {
    let symbols = split_symbols(query.symbols.as_deref().unwrap_or_default());
    let prices = state
        .manager
        .last_traded_prices(&symbols)
        .await
        .map_err(data_error_response)?;
    Ok(Json(prices))
}

/// 과거 일별 시세 (저장소 우선, 누락분은 IEX에서 수집).
#[utoipa::path(
    get,
    path = "/iex/historicalPrices",
    params(HistoricalPricesQuery),
    responses(
        (status = 200, description = "일별 시세 목록 (오래된 날짜부터)", body = [PriceRecord]),
        (status = 400, description = "심볼/날짜/기간 입력 오류", body = ApiErrorResponse),
        (status = 500, description = "데이터 제공자 또는 저장소 오류", body = ApiErrorResponse),
        (status = 503, description = "저장소 연결 풀 소진", body = ApiErrorResponse)
    ),
    tag = "iex"
)]
pub async fn historical_prices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoricalPricesQuery>,
) -> ApiResult<Json<Vec<PriceRecord>>> {
    debug!(?query, "과거 시세 요청");

    let records = state
        .manager
        .historical_prices(
            query.symbol.as_deref().unwrap_or_default(),
            query.date.as_deref(),
            query.range.as_deref(),
        )
        .await
        .map_err(data_error_response)?;
    Ok(Json(records))
}

/// 저장소에 보관된 심볼의 전체 시세.
#[utoipa::path(
    get,
    path = "/iex/storedPrices",
    params(SymbolQuery),
    responses(
        (status = 200, description = "저장된 시세 목록", body = [PriceRecord]),
        (status = 400, description = "심볼 누락", body = ApiErrorResponse),
        (status = 503, description = "저장소 연결 실패", body = ApiErrorResponse)
    ),
    tag = "iex"
)]
pub async fn stored_prices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SymbolQuery>,
) -> ApiResult<Json<Vec<PriceRecord>>> {
    let records = state
        .manager
        .stored_prices(query.symbol.as_deref().unwrap_or_default())
        .await
        .map_err(data_error_response)?;
    Ok(Json(records))
}

/// IEX 라우터 생성.
pub fn iex_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/symbols", get(list_symbols))
        .route("/lastTradedPrice", get(last_traded_price))
        .route("/historicalPrices", get(historical_prices))
        .route("/storedPrices", get(stored_prices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::{create_test_state_with, StaticProvider};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::NaiveDate;
    use histprice_data::{InMemoryPriceStore, RecordStore};
    use rust_decimal_macros::dec;
    use serde_json::Value;
    use std::sync::atomic::Ordering;
    use tower::ServiceExt;

    fn record(symbol: &str, y: i32, m: u32, d: u32) -> PriceRecord {
        PriceRecord::new(
            symbol,
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            dec!(90.0),
            dec!(95.5),
            dec!(87.5),
            dec!(92.75),
            123456,
        )
    }

    fn app(store: Arc<InMemoryPriceStore>, provider: Arc<StaticProvider>) -> Router {
        Router::new()
            .nest("/iex", iex_router())
            .with_state(Arc::new(create_test_state_with(store, provider)))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_historical_prices_unknown_symbol_persists() {
        let store = Arc::new(InMemoryPriceStore::new());
        let provider = Arc::new(StaticProvider {
            records: vec![record("DUMM", 2020, 11, 10)],
            ..Default::default()
        });

        let (status, body) = get_json(
            app(store.clone(), provider.clone()),
            "/iex/historicalPrices?symbol=DUMM&date=20201110",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["symbol"], "DUMM");
        assert_eq!(body[0]["date"], "2020-11-10");
        assert_eq!(body[0]["close"], "92.75");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert!(store.exists_for_symbol("DUMM").await.unwrap());
    }

    #[tokio::test]
    async fn test_historical_prices_weekend_is_empty() {
        let provider = Arc::new(StaticProvider::default());
        let (status, body) = get_json(
            app(Arc::new(InMemoryPriceStore::new()), provider.clone()),
            "/iex/historicalPrices?symbol=DUMM&date=20201107",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_historical_prices_input_errors_are_bad_request() {
        let cases = [
            ("/iex/historicalPrices?date=20201110", "MISSING_SYMBOL"),
            ("/iex/historicalPrices?symbol=%20&range=5d", "MISSING_SYMBOL"),
            ("/iex/historicalPrices?symbol=DUMM", "MISSING_DATE_OR_RANGE"),
            ("/iex/historicalPrices?symbol=DUMM&range=5x", "INVALID_RANGE"),
            ("/iex/historicalPrices?symbol=DUMM&date=2020-11-10", "INVALID_DATE"),
        ];

        for (uri, code) in cases {
            let provider = Arc::new(StaticProvider::default());
            let (status, body) =
                get_json(app(Arc::new(InMemoryPriceStore::new()), provider.clone()), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["code"], code, "{uri}");
            assert!(body["message"].is_string());
            assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn test_historical_prices_provider_failure_is_server_error() {
        let store = Arc::new(InMemoryPriceStore::with_records(vec![record("DUMM", 2020, 11, 9)]));
        let provider = Arc::new(StaticProvider {
            fail: true,
            ..Default::default()
        });

        let (status, body) = get_json(
            app(store, provider),
            "/iex/historicalPrices?symbol=DUMM&range=5d",
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "PROVIDER_ERROR");
    }

    #[tokio::test]
    async fn test_stored_prices() {
        let store = Arc::new(InMemoryPriceStore::with_records(vec![
            record("DUMM", 2020, 11, 10),
            record("DUMM", 2020, 11, 9),
            record("OTHER", 2020, 11, 9),
        ]));

        let (status, body) = get_json(
            app(store.clone(), Arc::new(StaticProvider::default())),
            "/iex/storedPrices?symbol=DUMM",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert_eq!(body[0]["date"], "2020-11-09");

        let (status, _) = get_json(
            app(store, Arc::new(StaticProvider::default())),
            "/iex/storedPrices",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_last_traded_price() {
        let provider = Arc::new(StaticProvider {
            records: vec![record("SNAP", 2022, 2, 4), record("FB", 2022, 2, 4)],
            ..Default::default()
        });

        let (status, body) = get_json(
            app(Arc::new(InMemoryPriceStore::new()), provider.clone()),
            "/iex/lastTradedPrice?symbols=SNAP,FB",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);

        let (status, body) = get_json(
            app(Arc::new(InMemoryPriceStore::new()), provider),
            "/iex/lastTradedPrice?symbols=",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "MISSING_SYMBOL");
    }

    #[tokio::test]
    async fn test_list_symbols() {
        let provider = Arc::new(StaticProvider {
            symbols: vec![SymbolInfo {
                symbol: "A".to_string(),
                name: "Agilent Technologies Inc.".to_string(),
                date: None,
                is_enabled: true,
            }],
            ..Default::default()
        });

        let (status, body) =
            get_json(app(Arc::new(InMemoryPriceStore::new()), provider), "/iex/symbols").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["symbol"], "A");
        assert_eq!(body[0]["isEnabled"], true);
    }
}
