//! HTTP API integration tests
//!
//! Drives the axum router with `oneshot` requests, checking status codes,
//! response shapes and the error mapping of each endpoint.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};
use tower::util::ServiceExt;

use tour_analytics::analytics::{AnalyticsConfig, FixedClock, StatsCache, StatsService};
use tour_analytics::api::{create_router, AppState};
use tour_analytics::catalog::TourCatalog;
use tour_analytics::error::AnalyticsResult;
use tour_analytics::event_store::{EventLogStats, EventStore, MemoryEventStore};
use tour_analytics::types::{InteractionEvent, NewTour, RecordedEvent, TimeRange, TourStats};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 10, 15, 0, 0).unwrap()
}

fn test_app() -> (Router, Arc<TourCatalog>) {
    let catalog = Arc::new(TourCatalog::in_memory());
    let store = Arc::new(MemoryEventStore::new(catalog.clone()));
    let stats = StatsService::new(catalog.clone(), store, AnalyticsConfig::default())
        .with_clock(Arc::new(FixedClock(now())));
    (create_router(Arc::new(AppState::new(Arc::new(stats)))), catalog)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, None).await
}

fn tour_body(name: &str, steps: u32) -> Value {
    let steps: Vec<Value> = (1..=steps)
        .map(|order| {
            json!({
                "order": order,
                "title": format!("Step {}", order),
                "description": format!("Explains part {}", order),
            })
        })
        .collect();
    json!({ "name": name, "description": "Welcome flow", "steps": steps })
}

async fn create_tour(app: &Router) -> String {
    let (status, body) = post(app, "/api/tours", tour_body("Onboarding", 5)).await;
    assert_eq!(status, StatusCode::CREATED);
    body["tour"]["id"].as_str().unwrap().to_string()
}

async fn post_event(
    app: &Router,
    tour_id: &str,
    session: &str,
    step: u32,
    kind: &str,
    minutes_ago: i64,
) -> StatusCode {
    let timestamp = now() - chrono::Duration::minutes(minutes_ago);
    let body = json!({
        "tourId": tour_id,
        "stepOrder": step,
        "userSessionId": session,
        "kind": kind,
        "timestamp": timestamp.to_rfc3339(),
    });
    post(app, "/api/events", body).await.0
}

#[tokio::test]
async fn test_health() {
    let (app, _) = test_app();
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".to_string()));
}

#[tokio::test]
async fn test_create_and_list_tours() {
    let (app, _) = test_app();
    let (status, body) = post(&app, "/api/tours", tour_body("Onboarding", 6)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["tour"]["name"], "Onboarding");
    assert_eq!(body["tour"]["steps"].as_array().unwrap().len(), 6);
    assert!(body["tour"]["createdAt"].is_string());

    let (status, body) = get(&app, "/api/tours").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tours"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_tour_ignores_client_id() {
    let (app, _) = test_app();
    let mut body = tour_body("Onboarding", 5);
    body["id"] = json!("chosen-by-client");

    let (status, body) = post(&app, "/api/tours", body).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["tour"]["id"].as_str().unwrap();
    assert_ne!(id, "chosen-by-client");
    assert!(uuid::Uuid::parse_str(id).is_ok());
}

#[tokio::test]
async fn test_create_tour_rejects_short_tours() {
    let (app, catalog) = test_app();
    let (status, body) = post(&app, "/api/tours", tour_body("Tiny", 3)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("5 steps"));
    assert_eq!(catalog.count(), 0);
}

#[tokio::test]
async fn test_create_tour_rejects_malformed_json() {
    let (app, _) = test_app();
    let (status, body) = post(&app, "/api/tours", json!({ "steps": "many" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_delete_tour() {
    let (app, _) = test_app();
    let id = create_tour(&app).await;

    let (status, body) = delete(&app, &format!("/api/tours/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (status, body) = delete(&app, &format!("/api/tours/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_record_event() {
    let (app, _) = test_app();
    let id = create_tour(&app).await;

    let body = json!({
        "tourId": id,
        "stepOrder": 1,
        "userSessionId": "session-1",
        "kind": "started",
        "timestamp": now().to_rfc3339(),
    });
    let (status, body) = post(&app, "/api/events", body).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["event"]["sequence"], 1);
    assert_eq!(body["event"]["kind"], "started");

    let status = post_event(&app, &id, "session-1", 9, "stepCompleted", 0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let status = post_event(&app, "missing", "session-1", 1, "started", 0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, stats) = get(&app, "/api/events/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalEvents"], 1);
    assert_eq!(stats["eventsByKind"]["started"], 1);
}

#[tokio::test]
async fn test_tour_stats_endpoint() {
    let (app, _) = test_app();
    let id = create_tour(&app).await;

    post_event(&app, &id, "a", 1, "started", 30).await;
    post_event(&app, &id, "a", 5, "tourCompleted", 20).await;
    post_event(&app, &id, "b", 1, "started", 15).await;
    post_event(&app, &id, "b", 2, "tourAbandoned", 10).await;
    post_event(&app, &id, "c", 1, "started", 5).await;

    let uri = format!("/api/analytics/tour-stats?tourId={}", id);
    let (status, body) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalToursCreated"], 1);
    assert_eq!(body["totalToursCompleted"], 1);
    assert_eq!(body["totalSessionsStarted"], 3);
    assert_eq!(body["averageDurationInMinutes"], 10.0);
    assert_eq!(body["activeToursToday"], 3);
    assert!((body["completionRate"].as_f64().unwrap() - 1.0 / 3.0).abs() < 1e-9);

    // Window that only covers session c
    let from = (now() - chrono::Duration::minutes(6)).to_rfc3339();
    let uri = format!("/api/analytics/tour-stats?tourId={}&from={}", id, urlencode(&from));
    let (status, body) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalSessionsStarted"], 1);
    assert_eq!(body["totalToursCompleted"], 0);
}

#[tokio::test]
async fn test_step_analytics_endpoint() {
    let (app, _) = test_app();
    let id = create_tour(&app).await;

    for session in ["a", "b", "c", "d"] {
        post_event(&app, &id, session, 2, "stepCompleted", 3).await;
    }
    post_event(&app, &id, "e", 2, "stepSkipped", 2).await;

    let uri = format!("/api/analytics/step-analytics?tourId={}", id);
    let (status, body) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);

    let analytics = body["analytics"].as_array().unwrap();
    assert_eq!(analytics.len(), 5);
    assert_eq!(analytics[1], json!({ "step": "Step 2", "completed": 4, "skipped": 1 }));
    assert_eq!(analytics[0], json!({ "step": "Step 1", "completed": 0, "skipped": 0 }));
}

#[tokio::test]
async fn test_completion_trend_endpoint() {
    let (app, _) = test_app();
    let id = create_tour(&app).await;
    post_event(&app, &id, "a", 5, "tourCompleted", 3 * 24 * 60).await;

    let uri = format!("/api/analytics/completion-trend?tourId={}", id);
    let (status, body) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);

    let trend = body["trend"].as_array().unwrap();
    assert_eq!(trend.len(), 7);
    assert_eq!(trend[3], json!({ "day": "2024-06-07", "completed": 1 }));
    assert_eq!(trend[6]["day"], "2024-06-10");

    let uri = format!("/api/analytics/completion-trend?tourId={}&days=30", id);
    let (status, body) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["trend"].as_array().unwrap().len(), 30);
}

#[tokio::test]
async fn test_analytics_rejects_bad_parameters() {
    let (app, _) = test_app();
    let id = create_tour(&app).await;

    let cases = [
        "/api/analytics/tour-stats".to_string(),
        format!("/api/analytics/tour-stats?tourId={}&from=yesterday", id),
        format!(
            "/api/analytics/step-analytics?tourId={}&from={}&to={}",
            id, "2024-06-10T00:00:00Z", "2024-06-01T00:00:00Z"
        ),
        format!("/api/analytics/completion-trend?tourId={}&days=0", id),
        format!("/api/analytics/completion-trend?tourId={}&days=week", id),
        format!("/api/analytics/completion-trend?tourId={}&days=367", id),
        format!("/api/analytics/completion-trend?tourId={}&days=10000000", id),
    ];

    for uri in &cases {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(body["error"].is_string(), "{}", uri);
    }
}

#[tokio::test]
async fn test_analytics_unknown_tour_is_404() {
    let (app, _) = test_app();

    for uri in [
        "/api/analytics/tour-stats?tourId=missing",
        "/api/analytics/step-analytics?tourId=missing",
        "/api/analytics/completion-trend?tourId=missing&days=7",
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert!(body["error"].as_str().unwrap().contains("missing"));
    }
}

#[tokio::test]
async fn test_all_time_tour_stats_served_from_cache() {
    let catalog = Arc::new(TourCatalog::in_memory());
    let tour = catalog.create(NewTour::with_steps("Cached", 5)).unwrap();
    let store = Arc::new(MemoryEventStore::new(catalog.clone()));
    let stats = StatsService::new(catalog, store, AnalyticsConfig::default())
        .with_clock(Arc::new(FixedClock(now())));

    let cache = Arc::new(StatsCache::new());
    let cached = TourStats {
        total_tours_completed: 42,
        ..TourStats::default()
    };
    cache.insert(tour.id.clone(), cached);
    let state = AppState::new(Arc::new(stats)).with_cache(cache.clone());
    let app = create_router(Arc::new(state));

    let uri = format!("/api/analytics/tour-stats?tourId={}", tour.id);
    let (status, body) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalToursCompleted"], 42);

    // A bounded window is always computed
    let uri = format!(
        "/api/analytics/tour-stats?tourId={}&from=2024-06-01T00%3A00%3A00Z",
        tour.id
    );
    let (status, body) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalToursCompleted"], 0);

    // Deleting the tour evicts its entry
    let uri = format!("/api/tours/{}", tour.id);
    let (status, _) = delete(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert!(cache.get(&tour.id).is_none());

    let uri = format!("/api/analytics/tour-stats?tourId={}", tour.id);
    let (status, _) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Store whose reads outlast any reasonable deadline
struct StalledStore;

#[async_trait]
impl EventStore for StalledStore {
    async fn append_event(&self, event: InteractionEvent) -> AnalyticsResult<RecordedEvent> {
        Ok(RecordedEvent { sequence: 1, event })
    }

    async fn query_events(
        &self,
        _tour_id: &str,
        _range: TimeRange,
    ) -> AnalyticsResult<Vec<InteractionEvent>> {
        tokio::time::sleep(StdDuration::from_secs(5)).await;
        Ok(Vec::new())
    }

    async fn stats(&self) -> AnalyticsResult<EventLogStats> {
        Ok(EventLogStats::default())
    }
}

#[tokio::test]
async fn test_read_timeout_is_504() {
    let catalog = Arc::new(TourCatalog::in_memory());
    let tour = catalog.create(NewTour::with_steps("Stalled", 5)).unwrap();
    let config = AnalyticsConfig::default().with_read_timeout(StdDuration::from_millis(20));
    let stats = StatsService::new(catalog, Arc::new(StalledStore), config);
    let app = create_router(Arc::new(AppState::new(Arc::new(stats))));

    let uri = format!("/api/analytics/tour-stats?tourId={}", tour.id);
    let (status, body) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert!(body["error"].is_string());
}

/// Percent-encode the characters of an RFC 3339 timestamp that are unsafe in a query
fn urlencode(value: &str) -> String {
    value.replace('+', "%2B").replace(':', "%3A")
}
