#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const CRATE_NAME: &str = "mirador-api";
pub const API_VERSION: &str = "v1";
pub const CONTRACT_VERSION: &str = "v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ApiErrorCode {
    InvalidParameter,
    InvalidFilter,
    AssistantUnavailable,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    #[serde(default)]
    pub details: Value,
}

impl ApiError {
    #[must_use]
    pub fn new(code: ApiErrorCode, message: &str) -> Self {
        Self {
            code,
            message: message.to_string(),
            details: Value::Null,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }
}

/// Wraps a payload in the versioned success envelope.
#[must_use]
pub fn v1_envelope(data: Value) -> Value {
    json!({"api_version": API_VERSION, "data": data})
}

#[must_use]
pub fn openapi_v1_spec() -> Value {
    json!({
      "openapi": "3.0.3",
      "info": {
        "title": "mirador API",
        "version": API_VERSION
      },
      "paths": {
        "/healthz": {"get": {"responses": {"200": {"description": "ok"}}}},
        "/readyz": {"get": {"responses": {"200": {"description": "ready"}}}},
        "/v1/version": {"get": {"responses": {"200": {"description": "api and contract versions"}}}},
        "/v1/filters": {
          "get": {
            "responses": {
              "200": {"description": "filter domains, defaults and current selections"},
              "304": {"description": "not modified"}
            }
          }
        },
        "/v1/charts/homicides": {
          "get": {
            "parameters": [
              {"name": "province", "in": "query", "schema": {"type": "string"}},
              {"name": "death_type", "in": "query", "schema": {"type": "string"}}
            ],
            "responses": {
              "200": {"description": "grouped weapon/sex counts for the selected state"},
              "400": {"description": "unknown query parameter", "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ApiError"}}}},
              "422": {"description": "filter value outside the observed domain", "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ApiError"}}}}
            }
          }
        },
        "/v1/charts/events": {
          "get": {
            "parameters": [
              {"name": "event_type", "in": "query", "schema": {"type": "string"}}
            ],
            "responses": {
              "200": {"description": "grouped province/canton counts for one event type"},
              "400": {"description": "unknown query parameter", "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ApiError"}}}},
              "422": {"description": "filter value outside the observed domain", "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ApiError"}}}}
            }
          }
        },
        "/v1/maps/tourism": {
          "get": {"responses": {"200": {"description": "clustered tourist-attraction layer"}, "304": {"description": "not modified"}}}
        },
        "/v1/maps/hazards": {
          "get": {"responses": {"200": {"description": "clustered hazard-event layer"}, "304": {"description": "not modified"}}}
        },
        "/v1/chat": {
          "post": {
            "requestBody": {"content": {"application/json": {"schema": {"type": "object", "properties": {"message": {"type": "string"}}, "required": ["message"]}}}},
            "responses": {"200": {"description": "assistant reply; invocation failures are reported in-band"}}
          }
        },
        "/v1/chat/history": {
          "get": {"responses": {"200": {"description": "ordered conversation turns for this session"}}}
        },
        "/openapi.json": {"get": {"responses": {"200": {"description": "this document"}}}}
      },
      "components": {
        "schemas": {
          "ApiError": {
            "type": "object",
            "properties": {
              "code": {"type": "string", "enum": ["invalid_parameter", "invalid_filter", "assistant_unavailable", "internal"]},
              "message": {"type": "string"},
              "details": {}
            },
            "required": ["code", "message"]
          }
        }
      }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_serialize_snake_case() {
        let err = ApiError::new(ApiErrorCode::InvalidFilter, "province not present")
            .with_details(json!({"province": "ATLANTIS"}));
        let value = serde_json::to_value(&err).expect("error json");
        assert_eq!(value["code"], "invalid_filter");
        assert_eq!(value["details"]["province"], "ATLANTIS");
    }

    #[test]
    fn envelope_carries_the_api_version() {
        let value = v1_envelope(json!({"x": 1}));
        assert_eq!(value["api_version"], "v1");
        assert_eq!(value["data"]["x"], 1);
    }

    #[test]
    fn openapi_document_lists_every_route() {
        let spec = openapi_v1_spec();
        let paths = spec["paths"].as_object().expect("paths object");
        for route in [
            "/healthz",
            "/readyz",
            "/v1/version",
            "/v1/filters",
            "/v1/charts/homicides",
            "/v1/charts/events",
            "/v1/maps/tourism",
            "/v1/maps/hazards",
            "/v1/chat",
            "/v1/chat/history",
            "/openapi.json",
        ] {
            assert!(paths.contains_key(route), "missing route {route}");
        }
    }
}
