//! Read-only JSON API consumed by the dashboard frontend.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use state::{AppState, Settings};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/usuarios", get(routes::users))
        .route("/api/topzonas", get(routes::top_zones))
        .route("/api/consumo-promedio", get(routes::average_consumption))
        .route("/api/consumo-mensual", get(routes::monthly_consumption))
        .route("/api/estadisticas", get(routes::city_stats))
        .route("/api/clientes", get(routes::customers))
        .route("/api/medidores-posicion", get(routes::meter_positions))
        .route("/api/recibos-aviso", get(routes::receipt_notices))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{MeterMapConfig, TariffConfig},
        store::memory::{meter, reading, receipt, site, user, zone, MemoryStore},
    };
    use axum::{
        body::{self, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::time::Duration;
    use time::{macros::datetime, UtcOffset};
    use tower::ServiceExt;

    fn settings() -> Settings {
        Settings {
            request_timeout: Duration::from_secs(5),
            reporting_offset: UtcOffset::UTC,
            meter_map: MeterMapConfig {
                user_ids: vec!["u-1".to_string()],
                readings_per_meter: 1,
                lookup_concurrency: 4,
            },
            tariff: TariffConfig::default(),
        }
    }

    fn scenario_store() -> MemoryStore {
        let at = datetime!(2024-03-10 12:00:00 UTC);
        MemoryStore {
            users: vec![user("u-1", "Ana Rojas")],
            receipts: vec![receipt("A", 10.0, at), receipt("A", 5.0, at), receipt("B", 20.0, at)],
            meters: vec![meter("A", Some("u-1"), Some("X")), meter("B", None, Some("Y"))],
            infrastructures: vec![
                site("X", Some((-17.39, -66.15)), Some("Z1"), None),
                site("Y", None, None, None),
            ],
            zones: vec![zone("Z1", "Norte")],
            readings: vec![reading("A", datetime!(2024-03-10 14:00:00 UTC), 1.0)],
            ..Default::default()
        }
    }

    async fn get_json(store: MemoryStore, uri: &str) -> (StatusCode, Value) {
        let app = router(AppState::new(Arc::new(store), settings()));
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn topzonas_drops_meters_without_zone() {
        let (status, body) = get_json(scenario_store(), "/api/topzonas").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{ "nombre": "Norte", "valor": 15.0 }]));
    }

    #[tokio::test]
    async fn clientes_keeps_meters_without_zone_as_null() {
        let (status, body) = get_json(scenario_store(), "/api/clientes").await;

        assert_eq!(status, StatusCode::OK);
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["zona"], "Norte");
        assert_eq!(rows[2]["medidor_id"], "B");
        assert_eq!(rows[2]["zona"], Value::Null);
        assert_eq!(rows[2]["fecha"], "2024-03-10");
    }

    #[tokio::test]
    async fn summary_endpoints_use_dashboard_field_names() {
        let (_, avg) = get_json(scenario_store(), "/api/consumo-promedio").await;
        assert_eq!(avg, json!({ "valor": 0.0 }));

        let (_, stats) = get_json(scenario_store(), "/api/estadisticas").await;
        assert_eq!(stats, json!({ "consumo": 35, "reportando": 2, "errores": 0 }));

        let (_, months) = get_json(scenario_store(), "/api/consumo-mensual").await;
        assert_eq!(months, json!([{ "mes": 3, "total": 35.0 }]));

        let (_, users) = get_json(scenario_store(), "/api/usuarios").await;
        assert_eq!(users, json!([{ "usuario_id": "u-1", "nombre": "Ana Rojas" }]));
    }

    #[tokio::test]
    async fn medidores_posicion_and_notices_follow_the_allow_list() {
        let (status, markers) = get_json(scenario_store(), "/api/medidores-posicion").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(markers.as_array().unwrap().len(), 1);
        assert_eq!(markers[0]["posicion"], json!([-17.39, -66.15]));
        assert_eq!(markers[0]["datos"]["consumo"][2], 1.0);

        let (_, notices) = get_json(scenario_store(), "/api/recibos-aviso").await;
        assert_eq!(notices[0]["nombre"], "Ana Rojas");
        assert_eq!(notices[0]["saldo"], 2.5);
    }

    #[tokio::test]
    async fn store_failures_become_500_with_error_envelope() {
        let mut store = scenario_store();
        store.failure = Some("questdb unavailable".to_string());

        for uri in ["/api/topzonas", "/api/clientes", "/api/estadisticas", "/api/medidores-posicion"] {
            let (status, body) = get_json(store.clone(), uri).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
            assert_eq!(body, json!({ "error": "questdb unavailable" }), "{uri}");
        }
    }

    #[tokio::test]
    async fn cors_is_open() {
        let app = router(AppState::new(Arc::new(scenario_store()), settings()));
        let req = Request::builder()
            .uri("/api/estadisticas")
            .header("origin", "http://localhost:3000")
            .body(Body::empty())
            .unwrap();

        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    }
}
