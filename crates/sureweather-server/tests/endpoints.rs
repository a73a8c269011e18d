#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::net::SocketAddr;

use serde_json::Value;
use sureweather_server::{build_router, AppState};
use sureweather_services::{EventScorer, HistoryClient, SqliteHistoryStore};
use sureweather_weather::{FallbackGenerator, WeatherService};

async fn spawn_app() -> SocketAddr {
    let state = AppState::new(
        WeatherService::offline(FallbackGenerator::seeded(7), 5),
        EventScorer::default(),
        HistoryClient::sqlite(SqliteHistoryStore::in_memory().expect("history store")),
        vec!["http://localhost:3000".to_string()],
    );
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    addr
}

async fn get(addr: SocketAddr, path: &str) -> (u16, Value) {
    let resp = reqwest::get(format!("http://{addr}{path}"))
        .await
        .expect("request");
    let status = resp.status().as_u16();
    let body = resp.json::<Value>().await.expect("json body");
    (status, body)
}

#[tokio::test]
async fn test_health_reports_service_and_backend() {
    let addr = spawn_app().await;

    for path in ["/health", "/api/v1/health"] {
        let (status, body) = get(addr, path).await;
        assert_eq!(status, 200);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "sureweather-api");
        assert_eq!(body["history_backend"], "sqlite");
    }

    let (status, body) = get(addr, "/").await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "SureWeather API is running!");
}

#[tokio::test]
async fn test_short_term_forecast_without_provider_uses_fallback() {
    let addr = spawn_app().await;

    let (status, body) = get(
        addr,
        "/api/v1/forecast/short-term?lat=51.5&lon=-0.12&city_name=London",
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["location"], "London");
    assert_eq!(body["source"], "fallback");
    assert_eq!(body["daily_forecasts"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_long_term_forecast_has_six_months() {
    let addr = spawn_app().await;

    let (status, body) = get(addr, "/api/v1/forecast/long-term?lat=-33.9&lon=151.2").await;
    assert_eq!(status, 200);
    let outlooks = body["monthly_outlooks"].as_array().unwrap();
    assert_eq!(outlooks.len(), 6);
    for outlook in outlooks {
        let p = outlook["probabilities"].as_object().unwrap();
        assert!(p.values().all(|v| (0.0..=1.0).contains(&v.as_f64().unwrap())));
    }
}

#[tokio::test]
async fn test_bad_coordinates_are_rejected() {
    let addr = spawn_app().await;

    let (status, body) = get(addr, "/api/v1/forecast/short-term?lat=123&lon=0").await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "invalid_query");

    let (status, body) = get(addr, "/api/v1/forecast/short-term?lat=north&lon=0").await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "invalid_query");

    let (status, _) = get(addr, "/api/v1/clothing/recommendations?lon=0").await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_event_scores_stay_in_range() {
    let addr = spawn_app().await;

    for forecast_type in ["short_term", "long_term"] {
        for event in ["concert", "museum", "kite_festival", "skiing", "hiking"] {
            let (status, body) = get(
                addr,
                &format!(
                    "/api/v1/score/event?event_id={event}&lat=40.7&lon=-74.0&forecast_type={forecast_type}"
                ),
            )
            .await;
            assert_eq!(status, 200);
            let score = body["score"].as_f64().unwrap();
            assert!((0.0..=100.0).contains(&score), "{event}: {score}");
        }
    }
}

#[tokio::test]
async fn test_unknown_event_is_not_found() {
    let addr = spawn_app().await;

    let (status, body) = get(addr, "/api/v1/score/event?event_id=regatta&lat=0&lon=0").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], "event_not_found");
}

#[tokio::test]
async fn test_recommendations_respect_categories() {
    let addr = spawn_app().await;

    let (status, body) = get(
        addr,
        "/api/v1/events/recommendations?lat=10&lon=10&event_categories=rain_compatible",
    )
    .await;
    assert_eq!(status, 200);
    for item in body.as_array().unwrap() {
        assert_eq!(item["event_id"], "museum");
    }

    let (status, _) = get(
        addr,
        "/api/v1/events/recommendations?lat=10&lon=10&event_categories=tropical",
    )
    .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_catalog_and_classifier() {
    let addr = spawn_app().await;

    let (_, events) = get(addr, "/api/v1/events").await;
    assert_eq!(events.as_array().unwrap().len(), 5);

    let (_, categories) = get(addr, "/api/v1/events/categories").await;
    assert_eq!(categories.as_array().unwrap().len(), 5);

    let (status, body) = get(addr, "/api/v1/events/classify?name=Kite%20day").await;
    assert_eq!(status, 200);
    assert_eq!(body["category"], "wind_based");
}

#[tokio::test]
async fn test_clothing_is_sorted_by_priority() {
    let addr = spawn_app().await;

    let (status, body) = get(
        addr,
        "/api/v1/clothing/recommendations?lat=64.1&lon=-21.9&forecast_type=long_term",
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["forecast_type"], "long_term");
    let priorities: Vec<u64> = body["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["priority"].as_u64().unwrap())
        .collect();
    assert!(priorities.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn test_history_lists_newest_first_with_limit() {
    let addr = spawn_app().await;

    for city in ["Oslo", "Lima", "Perth"] {
        let (status, _) = get(
            addr,
            &format!("/api/v1/forecast/long-term?lat=10&lon=10&city_name={city}"),
        )
        .await;
        assert_eq!(status, 200);
    }

    let (status, body) = get(addr, "/api/v1/history?limit=2").await;
    assert_eq!(status, 200);
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["location"], "Perth");
    assert_eq!(records[1]["location"], "Lima");
    assert_eq!(records[0]["query_type"], "long_term_forecast");
    assert_eq!(records[0]["response_data"]["location"], "Perth");
}

#[tokio::test]
async fn test_cors_preflight_and_request_id() {
    let addr = spawn_app().await;
    let client = reqwest::Client::new();

    let resp = client
        .request(
            reqwest::Method::OPTIONS,
            format!("http://{addr}/api/v1/health"),
        )
        .header("origin", "http://localhost:3000")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 204);
    assert_eq!(
        resp.headers()["access-control-allow-origin"],
        "http://localhost:3000"
    );

    let resp = client
        .get(format!("http://{addr}/api/v1/health"))
        .header("origin", "http://evil.example")
        .header("x-request-id", "trace-42")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    assert!(resp.headers().get("access-control-allow-origin").is_none());
    assert_eq!(resp.headers()["x-request-id"], "trace-42");

    let resp = client
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap();
    assert!(resp.headers().contains_key("x-request-id"));
}
