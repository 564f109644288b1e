use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::admin::AdminState;
use crate::group::{GroupError, GroupStatus, UrlTestGroup};
use crate::probe::TargetUrl;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub groups: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DelayResponse {
    pub delay_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct DelayQuery {
    pub url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

fn error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorBody { error: message.into() })).into_response()
}

fn find<'a>(state: &'a AdminState, name: &str) -> Option<&'a Arc<UrlTestGroup>> {
    state.groups.iter().find(|g| g.name() == name)
}

pub async fn get_status(State(state): State<AdminState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        groups: state.groups.len(),
    })
}

pub async fn list_groups(State(state): State<AdminState>) -> Json<Vec<GroupStatus>> {
    Json(state.groups.iter().map(|g| g.describe()).collect())
}

pub async fn get_group(State(state): State<AdminState>, Path(name): Path<String>) -> Response {
    match find(&state, &name) {
        Some(group) => Json(group.describe()).into_response(),
        None => error(StatusCode::NOT_FOUND, format!("group '{}' not found", name)),
    }
}

pub async fn probe_group(
    State(state): State<AdminState>,
    Path(name): Path<String>,
    Query(query): Query<DelayQuery>,
) -> Response {
    let Some(group) = find(&state, &name) else {
        return error(StatusCode::NOT_FOUND, format!("group '{}' not found", name));
    };

    let target = match query.url.as_deref().filter(|u| !u.is_empty()) {
        Some(raw) => match TargetUrl::parse(raw) {
            Ok(target) => Some(target),
            Err(e) => return error(StatusCode::BAD_REQUEST, e.to_string()),
        },
        None => None,
    };

    match group.probe_now(target.as_ref()).await {
        Ok(delay) => Json(DelayResponse {
            delay_ms: delay.as_millis() as u64,
        })
        .into_response(),
        Err(e @ GroupError::ProbeBusy) => error(StatusCode::CONFLICT, e.to_string()),
        Err(e) => error(StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
    }
}
