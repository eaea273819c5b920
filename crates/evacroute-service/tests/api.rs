use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use evacroute_lib::Building;
use evacroute_service::{app, AppState, REQUEST_ID_HEADER};

fn sample_app() -> (Router, AppState) {
    let state = AppState::new(Building::sample());
    (app(state.clone()), state)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn route_on_clear_floor() {
    let (app, _) = sample_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/route",
        Some(json!({"floor": "ground", "start": "entrance"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "route");
    assert_eq!(body["exit"]["id"], "A");
    assert_eq!(body["distance"], 1);
    let request_id = body["request_id"].as_str().expect("request id");
    assert!(uuid::Uuid::parse_str(request_id).is_ok());
}

#[tokio::test]
async fn hazard_updates_change_the_next_route() {
    let (app, state) = sample_app();
    let request = json!({"start": "main_hall"});

    let (_, before) = send(&app, Method::POST, "/api/v1/route", Some(request.clone())).await;
    assert_eq!(before["exit"]["id"], "A");

    let (status, change) = send(
        &app,
        Method::PUT,
        "/api/v1/floors/ground/hazards/washroom",
        Some(json!({"kind": "blocked"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(change["hazard"], "blocked");
    assert_eq!(change["previous"], "clear");
    assert_eq!(
        state.hazards().get_hazard("ground", "washroom"),
        evacroute_lib::HazardKind::Blocked
    );

    let (_, after) = send(&app, Method::POST, "/api/v1/route", Some(request.clone())).await;
    assert_eq!(after["exit"]["id"], "B");
    assert_eq!(after["hazards"][0]["id"], "washroom");

    let (status, cleared) = send(
        &app,
        Method::DELETE,
        "/api/v1/floors/ground/hazards/washroom",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["previous"], "blocked");

    let (_, restored) = send(&app, Method::POST, "/api/v1/route", Some(request)).await;
    assert_eq!(restored["exit"]["id"], "A");
}

#[tokio::test]
async fn no_route_is_a_successful_response() {
    let (app, state) = sample_app();
    state
        .hazards()
        .set_hazard("ground", "A", evacroute_lib::HazardKind::ExitBlocked);
    state
        .hazards()
        .set_hazard("ground", "B", evacroute_lib::HazardKind::ExitBlocked);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/route",
        Some(json!({"start": "kitchen"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "no_route");
    assert_eq!(body["reason"], "all_exits_blocked");
    assert!(body["guidance"].as_str().is_some());
}

#[tokio::test]
async fn missing_start_awaits_input() {
    let (app, _) = sample_app();
    let (status, body) = send(&app, Method::POST, "/api/v1/route", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reason"], "awaiting_input");
}

#[tokio::test]
async fn unknown_node_is_a_problem_with_suggestion() {
    let (app, _) = sample_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/route",
        Some(json!({"start": "kitchn"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["type"], "/problems/unknown-node");
    assert!(body["detail"]
        .as_str()
        .is_some_and(|detail| detail.contains("Did you mean 'kitchen'?")));
}

#[tokio::test]
async fn exit_is_rejected_as_start_position() {
    let (app, _) = sample_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/route",
        Some(json!({"floor": "ground", "start": "A"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "/problems/invalid-request");

    let (status, _) = send(&app, Method::GET, "/api/v1/floors/ground?position=B", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_floor_and_bad_hazard_kind_are_rejected() {
    let (app, state) = sample_app();
    let (status, body) = send(&app, Method::GET, "/api/v1/floors/roof/hazards", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["type"], "/problems/unknown-floor");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/v1/floors/ground/hazards/kitchen",
        Some(json!({"kind": "lava"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "/problems/invalid-request");
    assert!(state.hazards().active_hazards("ground").is_empty());
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let (app, _) = sample_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/route")
        .header(header::CONTENT_TYPE, "application/json")
        .header(REQUEST_ID_HEADER, "drill-7")
        .body(Body::from("{not json"))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).expect("type"),
        "application/problem+json"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body: Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(body["instance"], "drill-7");
}

#[tokio::test]
async fn floor_listing_and_view() {
    let (app, state) = sample_app();
    state
        .hazards()
        .set_hazard("first", "lab", evacroute_lib::HazardKind::Smoke);

    let (status, body) = send(&app, Method::GET, "/api/v1/floors", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["building"], "Sample Office Building");
    assert_eq!(body["floors"][0]["stairs"][0], "stair_g");
    assert_eq!(body["floors"][1]["active_hazards"], 1);

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/floors/first?position=meeting_room",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["route"]["exit"]["id"], "C");
    let nodes = body["nodes"].as_array().expect("nodes");
    let lab = nodes
        .iter()
        .find(|node| node["id"] == "lab")
        .expect("lab listed");
    assert_eq!(lab["impassable"], true);
    assert_eq!(lab["on_route"], false);
    let selected: Vec<&Value> = nodes
        .iter()
        .filter(|node| node["selected"] == true)
        .collect();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0]["id"], "meeting_room");

    let (_, hazards) = send(&app, Method::GET, "/api/v1/floors/first/hazards", None).await;
    assert_eq!(hazards["hazards"][0]["name"], "Lab");
    assert_eq!(hazards["hazards"][0]["hazard"], "smoke");
}

#[tokio::test]
async fn health_probes_report_ok() {
    let (app, _) = sample_app();
    let (status, body) = send(&app, Method::GET, "/health/live", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, Method::GET, "/health/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["floors_loaded"], 2);
    assert_eq!(body["floors_with_hazards"], 0);
}
