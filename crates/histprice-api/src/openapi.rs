//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use histprice_core::{LastTradedPrice, PriceRecord, SymbolInfo};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ApiErrorResponse;
use crate::routes::{ComponentHealth, ComponentStatus, HealthResponse};

/// Historical Prices API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Historical Prices API",
        description = r#"
# 과거 일별 시세 REST API

IEX Cloud 일별 시세를 저장소에 보관하며 제공합니다.

- 이미 저장된 날짜는 저장소에서 응답합니다.
- 누락된 날짜만 IEX에서 수집하여 저장합니다.
- 주말 날짜는 조회하지 않습니다.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "로컬 개발 서버"),
    ),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "iex", description = "IEX - 과거 시세, 종목 목록, 최근 체결가")
    ),
    components(
        schemas(
            // ===== Health =====
            HealthResponse,
            ComponentHealth,
            ComponentStatus,

            // ===== Common =====
            ApiErrorResponse,

            // ===== IEX =====
            PriceRecord,
            SymbolInfo,
            LastTradedPrice,
        )
    ),
    paths(
        // ===== Health =====
        crate::routes::health::health_check,
        crate::routes::health::health_ready,

        // ===== IEX =====
        crate::routes::iex::list_symbols,
        crate::routes::iex::last_traded_price,
        crate::routes::iex::historical_prices,
        crate::routes::iex::stored_prices,
    )
)]
pub struct ApiDoc;

/// Swagger UI 라우터 생성.
///
/// - `/swagger-ui` - Swagger UI 대화형 문서
/// - `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_valid() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&spec).unwrap();

        assert!(json.contains("Historical Prices API"));
        assert!(json.contains("/health/ready"));
        assert!(json.contains("/iex/historicalPrices"));
        assert!(json.contains("/iex/lastTradedPrice"));
        assert!(json.contains("/iex/storedPrices"));
        assert!(json.contains("/iex/symbols"));
    }

    #[test]
    fn test_openapi_contains_schemas() {
        let json = serde_json::to_string(&ApiDoc::openapi()).unwrap();

        assert!(json.contains("PriceRecord"));
        assert!(json.contains("ApiErrorResponse"));
        assert!(json.contains("HealthResponse"));
    }

    #[test]
    fn test_swagger_ui_router_creates() {
        let _router: Router<()> = swagger_ui_router();
    }
}
