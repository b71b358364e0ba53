//! REST handlers for the operator API.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/status` | Running flag, counts, leader, start time |
//! | `GET` | `/api/snapshot` | Current positions of every entity |
//! | `GET` | `/api/fleet` | Connected-agent mapping |
//! | `POST` | `/api/agents` | Place an agent |
//! | `POST` | `/api/obstacles` | Place an obstacle |
//! | `POST` | `/api/simulation/start` | Start the loops |
//! | `POST` | `/api/simulation/stop` | Stop the loops |
//! | `POST` | `/api/simulation/reset` | Clear the arena |
//! | `POST` | `/api/select` | Pointer press for leader selection |
//! | `POST` | `/api/cmd_vel` | Velocity command for one agent |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use swarmsim_core::ingress::IngressOutcome;
use swarmsim_types::{AgentId, LeaderChanged, Point, SelectionInput, VelocityCommand};

use crate::error::ObserverError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for placing an agent or obstacle.
#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub struct PlacementRequest {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl PlacementRequest {
    const fn point(self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Response body for a successful placement.
#[derive(Debug, serde::Serialize)]
struct PlacementResponse {
    /// Id assigned to the new entity.
    id: u32,
}

/// Response body for `POST /api/select`.
#[derive(Debug, serde::Serialize)]
struct SelectResponse {
    /// The leader event that was broadcast, if any.
    event: Option<LeaderChanged>,
}

/// Response body for `POST /api/cmd_vel`.
#[derive(Debug, serde::Serialize)]
struct CommandResponse {
    /// `"applied"` or `"ignored"`.
    outcome: &'static str,
    /// The agent whose velocity was set.
    #[serde(skip_serializing_if = "Option::is_none")]
    agent_id: Option<AgentId>,
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// `GET /api/status`
pub async fn get_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.controller.status())
}

/// `GET /api/snapshot`
pub async fn get_snapshot(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.controller.snapshot())
}

/// `GET /api/fleet`
pub async fn get_fleet(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.fleet.current())
}

// ---------------------------------------------------------------------------
// Arena edits
// ---------------------------------------------------------------------------

/// `POST /api/agents`: place an agent while stopped.
pub async fn add_agent(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PlacementRequest>,
) -> Result<impl IntoResponse, ObserverError> {
    let id = state.controller.add_agent(request.point())?;
    Ok((
        StatusCode::CREATED,
        Json(PlacementResponse {
            id: id.into_inner(),
        }),
    ))
}

/// `POST /api/obstacles`: place an obstacle while stopped.
pub async fn add_obstacle(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PlacementRequest>,
) -> Result<impl IntoResponse, ObserverError> {
    let id = state.controller.add_obstacle(request.point())?;
    Ok((
        StatusCode::CREATED,
        Json(PlacementResponse {
            id: id.into_inner(),
        }),
    ))
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// `POST /api/simulation/start`
pub async fn start(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    state.controller.start().await?;
    Ok(Json(state.controller.status()))
}

/// `POST /api/simulation/stop`
pub async fn stop(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ObserverError> {
    state.controller.stop().await?;
    Ok(Json(state.controller.status()))
}

/// `POST /api/simulation/reset`
pub async fn reset(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    state.controller.reset()?;
    Ok(Json(state.controller.status()))
}

// ---------------------------------------------------------------------------
// Runtime input
// ---------------------------------------------------------------------------

/// `POST /api/select`: feed a pointer press to the leader selector.
pub async fn select(
    State(state): State<Arc<AppState>>,
    Json(input): Json<SelectionInput>,
) -> impl IntoResponse {
    Json(SelectResponse {
        event: state.controller.select(input),
    })
}

/// `POST /api/cmd_vel`: apply a velocity command.
pub async fn command_velocity(
    State(state): State<Arc<AppState>>,
    Json(command): Json<VelocityCommand>,
) -> Result<impl IntoResponse, ObserverError> {
    let response = match state.controller.ingress().apply(&command)? {
        IngressOutcome::Applied(id) => CommandResponse {
            outcome: "applied",
            agent_id: Some(id),
        },
        IngressOutcome::Ignored => CommandResponse {
            outcome: "ignored",
            agent_id: None,
        },
    };
    Ok(Json(response))
}
