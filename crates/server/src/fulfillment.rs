use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use roboadvisor_core::audit::{AuditContext, AuditSink};
use roboadvisor_core::{ApplicationError, InterfaceError, LexRequest, TurnDispatcher};
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

pub const CORRELATION_HEADER: &str = "x-correlation-id";

#[derive(Clone)]
pub struct FulfillmentState {
    dispatcher: Arc<TurnDispatcher>,
    audit_sink: Arc<dyn AuditSink>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FulfillmentError {
    pub error: &'static str,
    pub message: String,
    pub detail: String,
    pub correlation_id: String,
}

pub fn router(dispatcher: Arc<TurnDispatcher>, audit_sink: Arc<dyn AuditSink>) -> Router {
    Router::new()
        .route("/v1/lex/fulfillment", post(fulfill))
        .with_state(FulfillmentState { dispatcher, audit_sink })
}

pub async fn fulfill(
    State(state): State<FulfillmentState>,
    Json(request): Json<LexRequest>,
) -> Response {
    let correlation_id = Uuid::new_v4().to_string();
    info!(
        event_name = "server.fulfillment.received",
        correlation_id = %correlation_id,
        intent = request.intent_name(),
        invocation_source = ?request.invocation_source,
        user_id = request.user_id.as_deref().unwrap_or("unknown"),
        "dialog turn received"
    );

    let audit =
        AuditContext::new(request.user_id.clone(), correlation_id.clone(), "lex-fulfillment");
    match state.dispatcher.dispatch_with_audit(request, state.audit_sink.as_ref(), &audit) {
        Ok(response) => {
            info!(
                event_name = "server.fulfillment.responded",
                correlation_id = %correlation_id,
                dialog_action = response.dialog_action.kind(),
                "dialog turn answered"
            );
            ([(CORRELATION_HEADER, correlation_id)], Json(response)).into_response()
        }
        Err(dispatch_error) => {
            let interface = ApplicationError::from(dispatch_error).into_interface(&correlation_id);
            error!(
                event_name = "server.fulfillment.failed",
                correlation_id = %correlation_id,
                error_class = interface.error_class(),
                error = %interface,
                "dialog turn failed"
            );
            error_response(interface)
        }
    }
}

fn error_response(interface: InterfaceError) -> Response {
    let status = match interface {
        InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let correlation_id = interface.correlation_id().to_string();
    let body = FulfillmentError {
        error: interface.error_class(),
        message: interface.user_message().to_string(),
        detail: interface.message().to_string(),
        correlation_id: correlation_id.clone(),
    };

    (status, [(CORRELATION_HEADER, correlation_id)], Json(body)).into_response()
}
