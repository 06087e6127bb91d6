// src/server.rs

use crate::error::ScheduleError;
use crate::fetch::DocumentSource;
use crate::schedule::{build_group_schedule, list_groups};
use serde::{Deserialize, Serialize};
use std::{convert::Infallible, sync::Arc, time::Instant};
use tracing::{info, warn};
use warp::{
    http::StatusCode,
    reject::{InvalidQuery, MethodNotAllowed},
    reply::{self, Response},
    Filter, Rejection, Reply,
};

pub const SERVICE_NAME: &str = "schedule-service";

#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    pub group: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GroupsResponse {
    pub groups: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}

fn error_reply(status: StatusCode, error: &str, details: Option<String>) -> Response {
    reply::with_status(
        reply::json(&ErrorResponse {
            error: error.to_string(),
            details,
        }),
        status,
    )
    .into_response()
}

fn schedule_error_reply(err: &ScheduleError) -> Response {
    match err {
        ScheduleError::GroupNotFound(_) => {
            error_reply(StatusCode::NOT_FOUND, "Group not found", Some(err.to_string()))
        }
        ScheduleError::SourceUnavailable(_) => error_reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to load schedule document",
            Some(err.to_string()),
        ),
    }
}

async fn index() -> Result<impl Reply, Rejection> {
    Ok(reply::json(&serde_json::json!({
        "message": "Schedule API. Use /schedule?group=GROUP_NAME"
    })))
}

async fn health_check() -> Result<impl Reply, Rejection> {
    Ok(reply::json(&serde_json::json!({
        "status": "healthy",
        "service": SERVICE_NAME
    })))
}

async fn get_schedule<S: DocumentSource>(
    query: ScheduleQuery,
    source: Arc<S>,
) -> Result<Response, Rejection> {
    let start = Instant::now();
    info!(group = %query.group, "schedule requested");

    let result = match source.fetch_grid().await {
        Ok(grid) => build_group_schedule(&grid, &query.group),
        Err(e) => Err(e.into()),
    };

    Ok(match result {
        Ok(schedule) => {
            info!(
                group = %schedule.group,
                days = schedule.schedule.len(),
                elapsed = ?start.elapsed(),
                "schedule served"
            );
            reply::json(&schedule).into_response()
        }
        Err(e) => {
            warn!(group = %query.group, elapsed = ?start.elapsed(), error = %e, "schedule lookup failed");
            schedule_error_reply(&e)
        }
    })
}

async fn get_groups<S: DocumentSource>(source: Arc<S>) -> Result<Response, Rejection> {
    Ok(match source.fetch_grid().await {
        Ok(grid) => reply::json(&GroupsResponse {
            groups: list_groups(&grid),
        })
        .into_response(),
        Err(e) => {
            warn!(error = %e, "group listing failed");
            schedule_error_reply(&ScheduleError::from(e))
        }
    })
}

async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let reply = if err.is_not_found() {
        error_reply(StatusCode::NOT_FOUND, "Not found", None)
    } else if let Some(e) = err.find::<InvalidQuery>() {
        error_reply(StatusCode::BAD_REQUEST, "Invalid query", Some(e.to_string()))
    } else if err.find::<MethodNotAllowed>().is_some() {
        error_reply(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed", None)
    } else {
        warn!(rejection = ?err, "unhandled rejection");
        error_reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal error",
            Some(format!("{:?}", err)),
        )
    };
    Ok(reply)
}

fn with_source<S: DocumentSource>(
    source: Arc<S>,
) -> impl Filter<Extract = (Arc<S>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&source))
}

/// All routes of the service, backed by `source`.
pub fn routes<S: DocumentSource>(
    source: Arc<S>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let root = warp::path::end().and(warp::get()).and_then(index);

    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(health_check);

    let schedule = warp::path("schedule")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<ScheduleQuery>())
        .and(with_source(source.clone()))
        .and_then(get_schedule::<S>);

    let groups = warp::path("groups")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_source(source))
        .and_then(get_groups::<S>);

    root.or(health)
        .or(schedule)
        .or(groups)
        .recover(handle_rejection)
        .with(warp::trace::request())
}

/// Serve on `0.0.0.0:port` until the process stops.
pub async fn serve<S: DocumentSource>(source: S, port: u16) {
    info!("Server starting on port {}", port);
    info!("Schedule endpoint: http://localhost:{}/schedule?group=GROUP_NAME", port);
    warp::serve(routes(Arc::new(source)))
        .run(([0, 0, 0, 0], port))
        .await;
}
