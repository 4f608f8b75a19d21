use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::app;
use serde_json::{json, Value};
use tower::{Service, ServiceExt};

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn bare_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

async fn call(app: &mut Router, request: Request<String>) -> axum::response::Response {
    ServiceExt::<Request<String>>::ready(app)
        .await
        .unwrap()
        .call(request)
        .await
        .unwrap()
}

const TWO_STATIONS: &str = r#"[
    {"station_name":"Riverside","ph":7.1,"turbidity":3.5,"dissolved_oxygen":8.2,"temperature":14.0,"conductivity":250.0},
    {"station_name":"Lakeview","ph":6.8,"turbidity":1.2,"dissolved_oxygen":9.0,"temperature":12.5,"conductivity":180.0}
]"#;

async fn seeded() -> Router {
    let mut app = app();
    let resp = call(&mut app, json_request("POST", "/measurements", TWO_STATIONS)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    app
}

// --- list ---

#[tokio::test]
async fn list_measurements_empty() {
    let resp = app().oneshot(bare_request("GET", "/measurements")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(body_json(resp).await, json!({}));
}

#[tokio::test]
async fn list_measurements_keyed_by_id() {
    let mut app = seeded().await;
    let resp = call(&mut app, bare_request("GET", "/measurements")).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    assert_eq!(body["1"]["station_name"], "Riverside");
    assert_eq!(body["2"]["station_name"], "Lakeview");
}

// --- create ---

#[tokio::test]
async fn create_reports_new_ids() {
    let resp = app()
        .oneshot(json_request("POST", "/measurements", TWO_STATIONS))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await,
        json!({ "message": "Measurement(s) added with id(s): 1, 2" })
    );
}

#[tokio::test]
async fn create_malformed_json_returns_400() {
    let resp = app()
        .oneshot(json_request("POST", "/measurements", "[{not json"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_missing_fields_stores_nothing() {
    let mut app = app();
    let body = r#"[
        {"station_name":"Riverside","ph":7.1,"turbidity":3.5,"dissolved_oxygen":8.2,"temperature":14.0,"conductivity":250.0},
        {"station_name":"Lakeview"}
    ]"#;
    let resp = call(&mut app, json_request("POST", "/measurements", body)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(resp).await["error"],
        "Missing required field: ph, turbidity, dissolved_oxygen, temperature, conductivity"
    );

    let resp = call(&mut app, bare_request("GET", "/measurements")).await;
    assert_eq!(body_json(resp).await, json!({}));
}

// --- get ---

#[tokio::test]
async fn get_measurement_by_id() {
    let mut app = seeded().await;
    let resp = call(&mut app, bare_request("GET", "/measurements/2")).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    assert_eq!(body["station_name"], "Lakeview");
    assert!(body.get("id").is_none());
}

#[tokio::test]
async fn get_measurement_keeps_field_order() {
    let mut app = seeded().await;
    let resp = call(&mut app, bare_request("GET", "/measurements/1")).await;
    let text = body_text(resp).await;
    assert!(text.starts_with(r#"{"station_name":"Riverside","date":""#), "{text}");

    let resp = call(&mut app, bare_request("GET", "/measurements/Riverside")).await;
    let text = body_text(resp).await;
    assert!(text.starts_with(r#"[{"id":1,"station_name":"Riverside","date":""#), "{text}");
}

#[tokio::test]
async fn get_measurement_not_found() {
    let resp = app().oneshot(bare_request("GET", "/measurements/7")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await, json!({ "error": "Measurement not found" }));
}

#[tokio::test]
async fn get_measurements_by_station() {
    let mut app = seeded().await;
    let resp = call(&mut app, bare_request("GET", "/measurements/Riverside")).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], 1);
}

#[tokio::test]
async fn get_unknown_station_returns_404() {
    let resp = app()
        .oneshot(bare_request("GET", "/measurements/Nowhere"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(resp).await,
        json!({ "error": "No measurements found in Nowhere" })
    );
}

// --- delete ---

#[tokio::test]
async fn delete_single_then_again() {
    let mut app = seeded().await;
    let resp = call(&mut app, bare_request("DELETE", "/measurements/1")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({ "message": "Measurement deleted" }));

    let resp = call(&mut app, bare_request("DELETE", "/measurements/1")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_id_list_reports_missing() {
    let mut app = seeded().await;
    let resp = call(&mut app, bare_request("DELETE", "/measurements/1,2,9,x")).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(
        body_json(resp).await,
        json!({ "deleted": [1, 2], "not_found": [9] })
    );
}

// --- update ---

#[tokio::test]
async fn update_changes_only_given_fields() {
    let mut app = seeded().await;
    let resp = call(&mut app, json_request("PUT", "/measurements/1", r#"{"ph":6.5}"#)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({ "message": "Measurement updated" }));

    let resp = call(&mut app, bare_request("GET", "/measurements/1")).await;
    let body = body_json(resp).await;
    assert_eq!(body["ph"], 6.5);
    assert_eq!(body["station_name"], "Riverside");
}

#[tokio::test]
async fn update_requires_json_content_type() {
    let request = Request::builder()
        .method("PUT")
        .uri("/measurements/1")
        .header(http::header::CONTENT_TYPE, "text/plain")
        .body(r#"{"ph":6.5}"#.to_string())
        .unwrap();
    let resp = app().oneshot(request).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(resp).await,
        json!({ "error": "Content-Type must be application/json" })
    );
}

#[tokio::test]
async fn update_malformed_json_returns_400() {
    let resp = app()
        .oneshot(json_request("PUT", "/measurements/1", "{ph:"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_unknown_id_returns_404() {
    let resp = app()
        .oneshot(json_request("PUT", "/measurements/5", r#"{"ph":6.5}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn put_without_id_is_not_allowed() {
    for uri in ["/measurements", "/measurements/Riverside"] {
        let resp = app().oneshot(json_request("PUT", uri, "{}")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED, "{uri}");
    }
}

// --- batch update ---

#[tokio::test]
async fn batch_update_reports_missing_ids() {
    let mut app = seeded().await;
    let body = r#"[{"id":1,"temperature":15.0},{"id":8,"ph":7.0}]"#;
    let resp = call(&mut app, json_request("PUT", "/measurements/batch", body)).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(
        body_json(resp).await,
        json!({ "updated": [1], "not_found": [8] })
    );

    let resp = call(&mut app, bare_request("GET", "/measurements/1")).await;
    assert_eq!(body_json(resp).await["temperature"], 15.0);
}

#[tokio::test]
async fn batch_update_rejects_duplicates_without_applying() {
    let mut app = seeded().await;
    let body = r#"[{"id":1,"ph":1.0},{"id":1,"ph":2.0}]"#;
    let resp = call(&mut app, json_request("PUT", "/measurements/batch", body)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await, json!({ "error": "Duplicate ID found" }));

    let resp = call(&mut app, bare_request("GET", "/measurements/1")).await;
    assert_eq!(body_json(resp).await["ph"], 7.1);
}

#[tokio::test]
async fn batch_update_requires_ids() {
    let resp = app()
        .oneshot(json_request("PUT", "/measurements/batch", r#"[{"ph":1.0}]"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(resp).await,
        json!({ "error": "Missing required field: id" })
    );
}
