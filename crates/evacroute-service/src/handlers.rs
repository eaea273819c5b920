//! HTTP handlers. Each one validates identifiers, calls into
//! `evacroute_lib`, and wraps the result or error.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use evacroute_lib::{
    node_statuses, route_with_snapshot, FloorDefinition, HazardEntry, HazardKind, NodeStatus,
    RouteSummary,
};

use crate::problem::{from_lib_error, ProblemDetails};
use crate::request_id::{extract_or_generate_request_id, RequestId};
use crate::response::ServiceResponse;
use crate::AppState;

type HandlerResult<T> = Result<ServiceResponse<T>, ProblemDetails>;

#[derive(Debug, Clone, Serialize)]
pub struct FloorSummary {
    pub id: String,
    pub name: String,
    pub rooms: usize,
    pub exits: Vec<String>,
    pub stairs: Vec<String>,
    pub active_hazards: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FloorsResponse {
    pub building: String,
    pub floors: Vec<FloorSummary>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct FloorQuery {
    /// Position to route from when highlighting the floor.
    pub position: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FloorView {
    pub id: String,
    pub name: String,
    pub route: RouteSummary,
    pub nodes: Vec<NodeStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HazardsResponse {
    pub floor: String,
    pub hazards: Vec<HazardEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HazardUpdate {
    pub kind: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HazardChange {
    pub floor: String,
    pub node: String,
    pub hazard: HazardKind,
    pub previous: HazardKind,
}

/// Body of `POST /api/v1/route`.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteRequest {
    /// Defaults to the first floor of the building.
    #[serde(default)]
    pub floor: Option<String>,
    /// Selected position; absent means nothing is selected yet.
    #[serde(default)]
    pub start: Option<String>,
}

/// `GET /api/v1/floors`
pub async fn list_floors(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult<FloorsResponse> {
    let request_id = extract_or_generate_request_id(&headers);
    let building = state.building();
    let floors = building
        .floors
        .iter()
        .map(|floor| FloorSummary {
            id: floor.id.clone(),
            name: floor.display_name().to_string(),
            rooms: floor.rooms.len(),
            exits: floor.exit_ids().map(str::to_string).collect(),
            stairs: floor.stair_ids().map(str::to_string).collect(),
            active_hazards: state.hazards().snapshot(&floor.id).len(),
        })
        .collect();

    Ok(ServiceResponse::new(
        FloorsResponse {
            building: building.name.clone(),
            floors,
        },
        request_id.as_str(),
    ))
}

/// `GET /api/v1/floors/{floor}?position=<node>`
pub async fn floor_view(
    State(state): State<AppState>,
    Path(floor_id): Path<String>,
    Query(query): Query<FloorQuery>,
    headers: HeaderMap,
) -> HandlerResult<FloorView> {
    let request_id = extract_or_generate_request_id(&headers);
    let floor = require_floor(&state, &floor_id, &request_id)?;
    let position = query.position.as_deref();
    if let Some(position) = position {
        require_position(floor, position, &request_id)?;
    }

    let snapshot = state.hazards().snapshot(&floor.id);
    let outcome = route_with_snapshot(floor, position, &snapshot);
    Ok(ServiceResponse::new(
        FloorView {
            id: floor.id.clone(),
            name: floor.display_name().to_string(),
            route: RouteSummary::from_outcome(floor, position, &snapshot, &outcome),
            nodes: node_statuses(floor, &snapshot, position, &outcome),
        },
        request_id.as_str(),
    ))
}

/// `GET /api/v1/floors/{floor}/hazards`
pub async fn list_hazards(
    State(state): State<AppState>,
    Path(floor_id): Path<String>,
    headers: HeaderMap,
) -> HandlerResult<HazardsResponse> {
    let request_id = extract_or_generate_request_id(&headers);
    let floor = require_floor(&state, &floor_id, &request_id)?;
    let hazards = state
        .hazards()
        .active_hazards(&floor.id)
        .into_iter()
        .map(|(id, hazard)| HazardEntry {
            name: floor.node_name(&id).to_string(),
            id,
            hazard,
        })
        .collect();

    Ok(ServiceResponse::new(
        HazardsResponse {
            floor: floor.id.clone(),
            hazards,
        },
        request_id.as_str(),
    ))
}

/// `PUT /api/v1/floors/{floor}/hazards/{node}` with `{"kind": "..."}`
pub async fn put_hazard(
    State(state): State<AppState>,
    Path((floor_id, node)): Path<(String, String)>,
    headers: HeaderMap,
    payload: Result<Json<HazardUpdate>, JsonRejection>,
) -> HandlerResult<HazardChange> {
    let request_id = extract_or_generate_request_id(&headers);
    let Json(update) = payload.map_err(|rejection| reject_body(rejection, &request_id))?;
    let floor = require_floor(&state, &floor_id, &request_id)?;
    require_node(floor, &node, &request_id)?;
    let kind: HazardKind = update
        .kind
        .parse()
        .map_err(|err| from_lib_error(&err, request_id.as_str()))?;

    let previous = state.hazards().get_hazard(&floor.id, &node);
    state.hazards().set_hazard(&floor.id, &node, kind);
    info!(
        request_id = %request_id,
        floor = %floor.id,
        node = %node,
        hazard = %kind,
        "hazard updated"
    );

    Ok(ServiceResponse::new(
        HazardChange {
            floor: floor.id.clone(),
            node,
            hazard: kind,
            previous,
        },
        request_id.as_str(),
    ))
}

/// `DELETE /api/v1/floors/{floor}/hazards/{node}`
pub async fn delete_hazard(
    State(state): State<AppState>,
    Path((floor_id, node)): Path<(String, String)>,
    headers: HeaderMap,
) -> HandlerResult<HazardChange> {
    let request_id = extract_or_generate_request_id(&headers);
    let floor = require_floor(&state, &floor_id, &request_id)?;
    require_node(floor, &node, &request_id)?;

    let previous = state.hazards().clear_hazard(&floor.id, &node);
    info!(
        request_id = %request_id,
        floor = %floor.id,
        node = %node,
        previous = %previous,
        "hazard cleared"
    );

    Ok(ServiceResponse::new(
        HazardChange {
            floor: floor.id.clone(),
            node,
            hazard: HazardKind::Clear,
            previous,
        },
        request_id.as_str(),
    ))
}

/// `POST /api/v1/route`
///
/// A missing route is reported in the body with `"status": "no_route"`;
/// only unknown identifiers and malformed bodies produce problem responses.
pub async fn route_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<RouteRequest>, JsonRejection>,
) -> HandlerResult<RouteSummary> {
    let request_id = extract_or_generate_request_id(&headers);
    let Json(request) = payload.map_err(|rejection| reject_body(rejection, &request_id))?;

    let floor = match request.floor.as_deref() {
        Some(floor_id) => require_floor(&state, floor_id, &request_id)?,
        None => state.building().default_floor().ok_or_else(|| {
            ProblemDetails::internal_error("building has no floors", request_id.as_str())
        })?,
    };
    let start = request.start.as_deref();
    if let Some(start) = start {
        require_position(floor, start, &request_id)?;
    }

    let snapshot = state.hazards().snapshot(&floor.id);
    let outcome = route_with_snapshot(floor, start, &snapshot);
    let summary = RouteSummary::from_outcome(floor, start, &snapshot, &outcome);

    info!(
        request_id = %request_id,
        floor = %floor.id,
        start = ?start,
        status = ?summary.status,
        exit = ?summary.exit.as_ref().map(|exit| exit.id.as_str()),
        distance = ?summary.distance,
        "route computed"
    );

    Ok(ServiceResponse::new(summary, request_id.as_str()))
}

fn require_floor<'a>(
    state: &'a AppState,
    floor: &str,
    request_id: &RequestId,
) -> Result<&'a FloorDefinition, ProblemDetails> {
    state
        .building()
        .require_floor(floor)
        .map_err(|err| from_lib_error(&err, request_id.as_str()))
}

fn require_node(
    floor: &FloorDefinition,
    node: &str,
    request_id: &RequestId,
) -> Result<(), ProblemDetails> {
    floor
        .require_node(node)
        .map(|_| ())
        .map_err(|err| from_lib_error(&err, request_id.as_str()))
}

fn require_position(
    floor: &FloorDefinition,
    node: &str,
    request_id: &RequestId,
) -> Result<(), ProblemDetails> {
    floor
        .require_position(node)
        .map(|_| ())
        .map_err(|err| from_lib_error(&err, request_id.as_str()))
}

fn reject_body(rejection: JsonRejection, request_id: &RequestId) -> ProblemDetails {
    warn!(request_id = %request_id, error = %rejection.body_text(), "rejected request body");
    ProblemDetails::bad_request(rejection.body_text(), request_id.as_str())
}
