use crate::AppState;
use axum::extract::{DefaultBodyLimit, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use mirador_api::{v1_envelope, ApiError, ApiErrorCode, API_VERSION, CONTRACT_VERSION};
use mirador_query::{
    events_by_province_and_canton, homicides_by_weapon_and_sex, QueryError, QueryErrorCode,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub fn build_router(state: Arc<AppState>) -> Router {
    let max_body_bytes = state.config.max_body_bytes;
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/openapi.json", get(openapi))
        .route("/v1/version", get(version))
        .route("/v1/filters", get(filters))
        .route("/v1/charts/homicides", get(homicides_chart))
        .route("/v1/charts/events", get(events_chart))
        .route("/v1/maps/tourism", get(tourism_map))
        .route("/v1/maps/hazards", get(hazards_map))
        .route("/v1/chat", post(chat))
        .route("/v1/chat/history", get(chat_history))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

fn api_error_response(status: StatusCode, err: ApiError) -> Response {
    (status, Json(json!({"error": err}))).into_response()
}

fn if_none_match(headers: &HeaderMap) -> Option<String> {
    headers
        .get("if-none-match")
        .and_then(|v| v.to_str().ok())
        .map(std::string::ToString::to_string)
}

fn put_cache_headers(headers: &mut HeaderMap, ttl: Duration, etag: &str) {
    if let Ok(value) = HeaderValue::from_str(&format!("public, max-age={}", ttl.as_secs())) {
        headers.insert("cache-control", value);
    }
    if let Ok(value) = HeaderValue::from_str(etag) {
        headers.insert("etag", value);
    }
}

fn query_error_response(err: QueryError, details: Value) -> Response {
    let (status, code) = match err.code {
        QueryErrorCode::InvalidFilter => {
            (StatusCode::UNPROCESSABLE_ENTITY, ApiErrorCode::InvalidFilter)
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, ApiErrorCode::Internal),
    };
    api_error_response(status, ApiError::new(code, &err.message).with_details(details))
}

fn reject_unknown_params(
    params: &HashMap<String, String>,
    allowed: &[&str],
) -> Result<(), Response> {
    for key in params.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(api_error_response(
                StatusCode::BAD_REQUEST,
                ApiError::new(ApiErrorCode::InvalidParameter, "unknown query parameter")
                    .with_details(json!({"parameter": key})),
            ));
        }
    }
    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn readyz() -> Response {
    // Tables are loaded before the router exists; a running server is ready.
    Json(json!({"ready": true})).into_response()
}

async fn openapi() -> Response {
    Json(mirador_api::openapi_v1_spec()).into_response()
}

async fn version() -> Response {
    Json(v1_envelope(json!({
        "api_version": API_VERSION,
        "contract_version": CONTRACT_VERSION,
    })))
    .into_response()
}

async fn filters(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let session = state.session.lock().await;
    let envelope = v1_envelope(json!({
        "provinces": state.domains.provinces,
        "death_types": state.domains.death_types,
        "event_types": state.domains.event_types,
        "defaults": {
            "province": mirador_model::DEFAULT_PROVINCE,
            "death_type": mirador_model::DEFAULT_DEATH_TYPE,
            "event_type": mirador_model::DEFAULT_EVENT_TYPE,
        },
        "selected": {
            "province": session.homicide.province().as_str(),
            "death_type": session.homicide.death_type().as_str(),
            "event_type": session.event_type.as_str(),
        },
    }));
    drop(session);

    let etag = match mirador_core::canonical::stable_json_hash_hex(&envelope) {
        Ok(etag) => etag,
        Err(e) => {
            return api_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new(ApiErrorCode::Internal, &format!("etag failed: {e}")),
            )
        }
    };
    let mut response_headers = HeaderMap::new();
    put_cache_headers(&mut response_headers, state.config.filters_ttl, &etag);
    if if_none_match(&headers).as_deref() == Some(etag.as_str()) {
        return (StatusCode::NOT_MODIFIED, response_headers).into_response();
    }
    (StatusCode::OK, response_headers, Json(envelope)).into_response()
}

async fn homicides_chart(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Err(response) = reject_unknown_params(&params, &["province", "death_type"]) {
        return response;
    }

    let mut session = state.session.lock().await;
    // Both set operations must pass before the session state moves; a
    // rejected value leaves the prior selection in place.
    let mut next = session.homicide.clone();
    if let Some(value) = params.get("province") {
        next = match next.set_province(value, &state.domains) {
            Ok(next) => next,
            Err(e) => {
                return query_error_response(QueryError::from(e), json!({"province": value}))
            }
        };
    }
    if let Some(value) = params.get("death_type") {
        next = match next.set_death_type(value, &state.domains) {
            Ok(next) => next,
            Err(e) => {
                return query_error_response(QueryError::from(e), json!({"death_type": value}))
            }
        };
    }
    session.homicide = next.clone();
    drop(session);

    let chart = homicides_by_weapon_and_sex(&state.tables, &next);
    let total = chart.total();
    let mut data = match serde_json::to_value(&chart) {
        Ok(value) => value,
        Err(e) => {
            return api_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new(ApiErrorCode::Internal, &format!("encode failed: {e}")),
            )
        }
    };
    data["total"] = json!(total);
    data["state"] = json!({
        "province": next.province().as_str(),
        "death_type": next.death_type().as_str(),
    });
    Json(v1_envelope(data)).into_response()
}

async fn events_chart(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Err(response) = reject_unknown_params(&params, &["event_type"]) {
        return response;
    }

    let mut session = state.session.lock().await;
    if let Some(value) = params.get("event_type") {
        session.event_type = match mirador_model::EventType::parse(value, &state.domains) {
            Ok(event_type) => event_type,
            Err(e) => {
                return query_error_response(QueryError::from(e), json!({"event_type": value}))
            }
        };
    }
    let selected = session.event_type.clone();
    drop(session);

    let chart = events_by_province_and_canton(&state.tables, selected.as_str());
    let total = chart.total();
    let mut data = match serde_json::to_value(&chart) {
        Ok(value) => value,
        Err(e) => {
            return api_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new(ApiErrorCode::Internal, &format!("encode failed: {e}")),
            )
        }
    };
    data["total"] = json!(total);
    data["state"] = json!({"event_type": selected.as_str()});
    Json(v1_envelope(data)).into_response()
}

fn map_artifact_response(state: &AppState, headers: &HeaderMap, which: MapKind) -> Response {
    let artifact = match which {
        MapKind::Tourism => &state.tourism_map,
        MapKind::Hazards => &state.hazards_map,
    };
    let mut response_headers = HeaderMap::new();
    put_cache_headers(&mut response_headers, state.config.map_ttl, &artifact.etag);
    response_headers.insert(
        "content-type",
        HeaderValue::from_static("application/json"),
    );
    if if_none_match(headers).as_deref() == Some(artifact.etag.as_str()) {
        return (StatusCode::NOT_MODIFIED, response_headers).into_response();
    }
    (StatusCode::OK, response_headers, artifact.body.clone()).into_response()
}

enum MapKind {
    Tourism,
    Hazards,
}

async fn tourism_map(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    map_artifact_response(&state, &headers, MapKind::Tourism)
}

async fn hazards_map(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    map_artifact_response(&state, &headers, MapKind::Hazards)
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
}

async fn chat(State(state): State<Arc<AppState>>, Json(req): Json<ChatRequest>) -> Response {
    // One turn at a time: the gate mutex serializes submissions the way a
    // single event loop would.
    let mut gate = state.gate.lock().await;
    let reply = gate.respond(&req.message).await;
    let turns = gate.history().len();
    drop(gate);
    Json(v1_envelope(json!({"reply": reply, "turns": turns}))).into_response()
}

async fn chat_history(State(state): State<Arc<AppState>>) -> Response {
    let gate = state.gate.lock().await;
    let turns: Value = match serde_json::to_value(gate.history()) {
        Ok(value) => value,
        Err(e) => {
            return api_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new(ApiErrorCode::Internal, &format!("encode failed: {e}")),
            )
        }
    };
    drop(gate);
    Json(v1_envelope(json!({"turns": turns}))).into_response()
}
