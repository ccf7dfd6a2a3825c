use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use roboadvisor_core::TurnDispatcher;
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    dispatcher: Arc<TurnDispatcher>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub dialog: HealthCheck,
    pub checked_at: String,
}

pub fn router(dispatcher: Arc<TurnDispatcher>) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { dispatcher })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let dialog = dialog_check(&state.dispatcher);
    let ready = dialog.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "roboadvisor-server runtime initialized".to_string(),
        },
        dialog,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

fn dialog_check(dispatcher: &TurnDispatcher) -> HealthCheck {
    let intents = dispatcher.supported_intents();
    if intents.is_empty() {
        HealthCheck { status: "degraded", detail: "no intent handlers registered".to_string() }
    } else {
        HealthCheck { status: "ready", detail: format!("handling intents: {}", intents.join(", ")) }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{extract::State, http::StatusCode, Json};
    use roboadvisor_core::TurnDispatcher;

    use crate::health::{health, HealthState};

    #[tokio::test]
    async fn health_returns_ready_when_an_intent_is_registered() {
        let state = HealthState { dispatcher: Arc::new(TurnDispatcher::default()) };

        let (status, Json(payload)) = health(State(state)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ready");
        assert_eq!(payload.dialog.status, "ready");
        assert!(payload.dialog.detail.contains("recommendPortfolio"));
        assert_eq!(payload.service.status, "ready");
    }

    #[tokio::test]
    async fn health_body_exposes_documented_fields() {
        let state = HealthState { dispatcher: Arc::new(TurnDispatcher::default()) };

        let (_, Json(payload)) = health(State(state)).await;
        let body = serde_json::to_value(&payload).expect("serialize health");
        let mut keys: Vec<&str> =
            body.as_object().map(|map| map.keys().map(String::as_str).collect()).unwrap_or_default();
        keys.sort_unstable();

        assert_eq!(keys, ["checked_at", "dialog", "service", "status"]);
        assert_eq!(body["dialog"]["status"], "ready");
    }

    #[tokio::test]
    async fn health_returns_service_unavailable_without_handlers() {
        let state = HealthState { dispatcher: Arc::new(TurnDispatcher::new()) };

        let (status, Json(payload)) = health(State(state)).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload.status, "degraded");
        assert_eq!(payload.dialog.status, "degraded");
        assert_eq!(payload.service.status, "ready");
    }
}
