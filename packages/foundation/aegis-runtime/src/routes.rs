//! The eleven HTTP routes, composed into one `axum::Router`
//! over shared `Arc<AppState>`.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use aegis_core::Event;
use aegis_gate::PipelineOutcome;
use aegis_telemetry::NpcCommand;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/deep", get(health_deep))
        .route("/api/events", post(post_event))
        .route("/api/events/batch", post(post_events_batch))
        .route("/api/status", get(status))
        .route("/api/audit", get(audit_recent))
        .route("/api/audit/stats", get(audit_stats))
        .route("/api/cleansing/deploy", post(cleansing_deploy))
        .route("/api/v1/npc/command", post(npc_command))
        .route("/api/v1/npc/command/batch", post(npc_command_batch))
        .route("/api/telemetry/watchdog", post(telemetry_watchdog))
        .route("/api/phoenix/drain", post(phoenix_drain))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "aegis-mesh",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": aegis_core::MeshTimestamp::now(),
    }))
}

async fn health_deep(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let backend_up = state.memory_graph.backend().is_reachable();
    let providers_up = state.providers.candidates_for_tier(aegis_core::Tier::Routine).len()
        + state.providers.candidates_for_tier(aegis_core::Tier::Operational).len()
        + state.providers.candidates_for_tier(aegis_core::Tier::Strategic).len()
        > 0;

    let body = serde_json::json!({
        "backend": backend_up,
        "providers_registered": providers_up,
        "bus_validation_failures": state.bus.validation_failure_count(),
        "timestamp": aegis_core::MeshTimestamp::now(),
    });

    if backend_up && providers_up {
        (StatusCode::OK, Json(body)).into_response()
    } else if backend_up || providers_up {
        let mut degraded = body;
        degraded["status"] = serde_json::json!("degraded");
        (StatusCode::OK, Json(degraded)).into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
    }
}

/// Deserializes an `Event` from already-parsed JSON, mapping a missing or
/// mistyped required field onto the contractual `InvalidInput` (400)
/// rather than axum's own `Json<Event>` rejection, which answers 422 to
/// the same condition.
fn parse_event(value: serde_json::Value) -> Result<Event, aegis_core::MeshError> {
    serde_json::from_value(value).map_err(|err| aegis_core::MeshError::invalid_input(err.to_string()))
}

async fn post_event(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, ApiError> {
    let event = parse_event(body)?;
    state.record_event_received();
    match state.pipeline.process(&event).await {
        Ok(PipelineOutcome::Accepted(response)) => Ok((StatusCode::OK, Json(response)).into_response()),
        Ok(PipelineOutcome::Vetoed { predicate, reason }) => Ok((
            StatusCode::OK,
            Json(serde_json::json!({"vetoed": true, "predicate": predicate, "reason": reason})),
        )
            .into_response()),
        Err(err) => Err(err.into()),
    }
}

async fn post_events_batch(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Vec<serde_json::Value>>,
) -> Result<impl IntoResponse, ApiError> {
    let events = body
        .into_iter()
        .map(parse_event)
        .collect::<Result<Vec<Event>, _>>()?;

    for _ in &events {
        state.record_event_received();
    }
    let results = state.pipeline.process_batch(&events).await;
    let bodies: Vec<serde_json::Value> = results
        .into_iter()
        .map(|result| match result {
            Ok(PipelineOutcome::Accepted(response)) => serde_json::to_value(response).unwrap_or_default(),
            Ok(PipelineOutcome::Vetoed { predicate, reason }) => {
                serde_json::json!({"vetoed": true, "predicate": predicate, "reason": reason})
            }
            Err(err) => serde_json::json!({"code": err.code(), "reason": err.reason()}),
        })
        .collect();
    Ok((StatusCode::OK, Json(bodies)))
}

async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let audit_stats = state.audit.stats();
    let retry_stats = state.memory_graph.retry_buffer().stats();
    Json(serde_json::json!({
        "events_received": state.events_received.load(Ordering::Relaxed),
        "uptime_hours": aegis_core::MeshTimestamp::now().elapsed_hours_since(&state.started_at),
        "audit": audit_stats,
        "retry_buffer_size": state.memory_graph.retry_buffer().size(),
        "retry_buffer_totals": {
            "enqueued": retry_stats.total_enqueued,
            "flushed": retry_stats.total_flushed,
            "dropped": retry_stats.total_dropped,
        },
    }))
}

#[derive(Debug, Deserialize)]
struct AuditQuery {
    count: Option<usize>,
}

async fn audit_recent(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AuditQuery>,
) -> impl IntoResponse {
    let limit = query.count.unwrap_or(aegis_gate::audit::DEFAULT_CAPACITY);
    Json(state.audit.recent(limit))
}

async fn audit_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.audit.stats())
}

#[derive(Debug, Deserialize, Default)]
struct CleansingRequest {
    #[serde(default)]
    npc_ids: Option<Vec<aegis_core::NpcId>>,
}

async fn cleansing_deploy(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CleansingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let npc_ids = request.npc_ids.unwrap_or_default();

    if npc_ids.is_empty() {
        return Err(aegis_core::MeshError::backend_unavailable("cleansing engine offline: no participants supplied").into());
    }

    let states: Vec<_> = npc_ids.iter().map(|id| state.behavior_registry.state_of(id)).collect();
    let avg = |f: fn(&aegis_core::NpcBehavioralState) -> f64| -> f64 {
        if states.is_empty() {
            0.0
        } else {
            states.iter().map(f).sum::<f64>() / states.len() as f64
        }
    };
    let avg_morale = avg(|s| s.morale);
    let avg_trauma = avg(|s| s.avg_trauma);
    let avg_confidence = npc_ids
        .iter()
        .map(|id| state.memory_graph.get_decayed_confidence(id, &aegis_core::EntityId::director()))
        .sum::<f64>()
        / npc_ids.len().max(1) as f64;

    let params = aegis_arbiter::cleansing::CleansingParams::defaults();
    let (outcome, trauma_increment) =
        aegis_arbiter::cleansing::attempt_cleansing(avg_morale, avg_trauma, avg_confidence, &params, &npc_ids);

    state.bus.publish(
        "telemetry",
        serde_json::json!({"event": "cleansing_deploy", "success": outcome.success, "successRate": outcome.success_rate}),
    );

    Ok(Json(serde_json::json!({
        "success": outcome.success,
        "successRate": outcome.success_rate,
        "traumaIncrement": trauma_increment,
    })))
}

async fn npc_command(State(state): State<Arc<AppState>>, Json(command): Json<NpcCommand>) -> Result<impl IntoResponse, ApiError> {
    command.validate().map_err(aegis_core::MeshError::from)?;
    state.bus.publish("npc-commands", serde_json::to_value(&command).unwrap_or_default());
    Ok(StatusCode::OK)
}

async fn npc_command_batch(
    State(state): State<Arc<AppState>>,
    Json(commands): Json<Vec<NpcCommand>>,
) -> Result<impl IntoResponse, ApiError> {
    for command in &commands {
        command.validate().map_err(aegis_core::MeshError::from)?;
    }
    for command in &commands {
        state.bus.publish("npc-commands", serde_json::to_value(command).unwrap_or_default());
    }
    Ok(StatusCode::OK)
}

async fn telemetry_watchdog(State(state): State<Arc<AppState>>, Json(envelope): Json<serde_json::Value>) -> impl IntoResponse {
    state.bus.publish("system-status", envelope);
    StatusCode::OK
}

async fn phoenix_drain(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let backend = state.memory_graph.backend();
    if backend.is_reachable() {
        state.memory_graph.retry_buffer().flush(backend.as_ref()).await;
        (StatusCode::OK, Json(serde_json::json!({"drained": true})))
    } else {
        (StatusCode::OK, Json(serde_json::json!({"drained": false, "reason": "backend unreachable"})))
    }
}
