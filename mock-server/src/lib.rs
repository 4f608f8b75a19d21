use std::{collections::BTreeMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

/// Fields every created measurement must carry.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "station_name",
    "ph",
    "turbidity",
    "dissolved_oxygen",
    "temperature",
    "conductivity",
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub station_name: String,
    pub date: String,
    pub ph: f64,
    pub turbidity: f64,
    pub dissolved_oxygen: f64,
    pub temperature: f64,
    pub conductivity: f64,
}

/// A measurement listed together with its id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StationMeasurement {
    pub id: u64,
    #[serde(flatten)]
    pub measurement: Measurement,
}

#[derive(Default)]
pub struct Store {
    next_id: u64,
    rows: BTreeMap<u64, Measurement>,
}

impl Store {
    fn insert(&mut self, measurement: Measurement) -> u64 {
        self.next_id += 1;
        self.rows.insert(self.next_id, measurement);
        self.next_id
    }
}

pub type Db = Arc<RwLock<Store>>;

type Reply = (StatusCode, Json<Value>);

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/measurements", get(list_measurements).post(create_measurements))
        .route("/measurements/batch", put(update_batch))
        .route(
            "/measurements/{key}",
            get(get_measurement).put(update_measurement).delete(delete_measurements),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn now() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn error(status: StatusCode, message: impl Into<String>) -> Reply {
    (status, Json(json!({ "error": message.into() })))
}

fn parse_json(body: &Bytes) -> Result<Value, Reply> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "rejecting malformed JSON body");
        error(StatusCode::BAD_REQUEST, "Invalid JSON format")
    })
}

fn parse_id(key: &str) -> Option<u64> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

fn number_field(item: &Map<String, Value>, field: &str, current: f64) -> f64 {
    item.get(field).and_then(Value::as_f64).unwrap_or(current)
}

/// Overwrite the fields present in `item` and refresh the timestamp.
fn apply_update(measurement: &mut Measurement, item: &Map<String, Value>) {
    if let Some(name) = item.get("station_name").and_then(Value::as_str) {
        measurement.station_name = name.to_string();
    }
    measurement.ph = number_field(item, "ph", measurement.ph);
    measurement.turbidity = number_field(item, "turbidity", measurement.turbidity);
    measurement.dissolved_oxygen =
        number_field(item, "dissolved_oxygen", measurement.dissolved_oxygen);
    measurement.temperature = number_field(item, "temperature", measurement.temperature);
    measurement.conductivity = number_field(item, "conductivity", measurement.conductivity);
    measurement.date = now();
}

async fn list_measurements(
    State(db): State<Db>,
) -> (StatusCode, Json<BTreeMap<u64, Measurement>>) {
    let store = db.read().await;
    (StatusCode::CREATED, Json(store.rows.clone()))
}

async fn get_measurement(State(db): State<Db>, Path(key): Path<String>) -> Reply {
    let store = db.read().await;
    if let Some(id) = parse_id(&key) {
        return match store.rows.get(&id) {
            Some(m) => (StatusCode::CREATED, Json(json!(m))),
            None => error(StatusCode::NOT_FOUND, "Measurement not found"),
        };
    }

    let found: Vec<StationMeasurement> = store
        .rows
        .iter()
        .filter(|(_, m)| m.station_name == key)
        .map(|(id, m)| StationMeasurement {
            id: *id,
            measurement: m.clone(),
        })
        .collect();
    if found.is_empty() {
        return error(StatusCode::NOT_FOUND, format!("No measurements found in {key}"));
    }
    (StatusCode::CREATED, Json(json!(found)))
}

fn new_measurement(item: &Value, date: &str) -> Result<Measurement, Reply> {
    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| item.get(field).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(error(
            StatusCode::NOT_FOUND,
            format!("Missing required field: {}", missing.join(", ")),
        ));
    }

    let mut record: Map<String, Value> = item.as_object().cloned().unwrap_or_default();
    record.insert("date".to_string(), Value::String(date.to_string()));
    serde_json::from_value(Value::Object(record))
        .map_err(|e| error(StatusCode::BAD_REQUEST, format!("Invalid measurement: {e}")))
}

async fn create_measurements(State(db): State<Db>, body: Bytes) -> Reply {
    let data = match parse_json(&body) {
        Ok(data) => data,
        Err(reply) => return reply,
    };
    let Some(items) = data.as_array() else {
        return error(StatusCode::BAD_REQUEST, "Request body must be a list of measurements");
    };

    let date = now();
    let mut rows = Vec::with_capacity(items.len());
    for item in items {
        match new_measurement(item, &date) {
            Ok(m) => rows.push(m),
            Err(reply) => return reply,
        }
    }

    let mut store = db.write().await;
    let added: Vec<String> = rows.into_iter().map(|m| store.insert(m).to_string()).collect();
    tracing::info!(count = added.len(), "measurements added");
    let message = format!("Measurement(s) added with id(s): {}", added.join(", "));
    (StatusCode::OK, Json(json!({ "message": message })))
}

async fn delete_measurements(State(db): State<Db>, Path(key): Path<String>) -> Reply {
    let mut store = db.write().await;
    if let Some(id) = parse_id(&key) {
        return match store.rows.remove(&id) {
            Some(_) => (StatusCode::OK, Json(json!({ "message": "Measurement deleted" }))),
            None => error(StatusCode::NOT_FOUND, "Measurement not found"),
        };
    }

    let mut deleted = Vec::new();
    let mut not_found = Vec::new();
    for id in key.split(',').filter_map(|part| parse_id(part.trim())) {
        match store.rows.remove(&id) {
            Some(_) => deleted.push(id),
            None => not_found.push(id),
        }
    }
    let mut response = json!({ "deleted": deleted });
    if !not_found.is_empty() {
        response["not_found"] = json!(not_found);
    }
    (StatusCode::CREATED, Json(response))
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

async fn update_measurement(
    State(db): State<Db>,
    Path(key): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Reply, StatusCode> {
    let id = parse_id(&key).ok_or(StatusCode::METHOD_NOT_ALLOWED)?;
    if !is_json(&headers) {
        return Ok(error(StatusCode::BAD_REQUEST, "Content-Type must be application/json"));
    }
    let data = match parse_json(&body) {
        Ok(data) => data,
        Err(reply) => return Ok(reply),
    };
    let fields = data.as_object().cloned().unwrap_or_default();

    let mut store = db.write().await;
    let Some(measurement) = store.rows.get_mut(&id) else {
        return Ok(error(StatusCode::NOT_FOUND, "Measurement not found"));
    };
    apply_update(measurement, &fields);
    Ok((StatusCode::OK, Json(json!({ "message": "Measurement updated" }))))
}

async fn update_batch(State(db): State<Db>, body: Bytes) -> Reply {
    let data = match parse_json(&body) {
        Ok(data) => data,
        Err(reply) => return reply,
    };
    let Some(items) = data.as_array() else {
        return error(
            StatusCode::NOT_FOUND,
            "Request body must be a list of measurement updates",
        );
    };

    // Reject the whole batch before touching the store.
    let mut seen: Vec<Option<&Value>> = Vec::new();
    for item in items {
        let id = item.get("id");
        if seen.contains(&id) {
            return error(StatusCode::NOT_FOUND, "Duplicate ID found");
        }
        seen.push(id);
        if id.is_none() {
            return error(StatusCode::NOT_FOUND, "Missing required field: id");
        }
    }

    let mut store = db.write().await;
    let mut updated = Vec::new();
    let mut not_found = Vec::new();
    for item in items {
        let id = &item["id"];
        let row = match id.as_u64() {
            Some(id) => store.rows.get_mut(&id),
            None => None,
        };
        match row {
            Some(measurement) => {
                let fields = item.as_object().cloned().unwrap_or_default();
                apply_update(measurement, &fields);
                updated.push(id.clone());
            }
            None => not_found.push(id.clone()),
        }
    }
    let mut response = json!({ "updated": updated });
    if !not_found.is_empty() {
        response["not_found"] = json!(not_found);
    }
    (StatusCode::CREATED, Json(response))
}
