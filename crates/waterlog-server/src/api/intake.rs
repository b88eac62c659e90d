use crate::api::{error_response, parse_date_param, success_response, ApiError};
use crate::events::{emit, StoreEvent};
use crate::logging::TraceId;
use crate::state::AppState;
use crate::time::{local_day_range, today_local};
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use utoipa_axum::{router::OpenApiRouter, routes};
use waterlog_common::types::{IntakeLevel, IntakeLogRow};

#[derive(Deserialize, ToSchema)]
pub struct RecordIntakeRequest {
    /// Intake amount level: high / medium / low
    pub level: String,
    /// Timestamp of the intake; defaults to now when omitted
    pub recorded_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize, IntoParams)]
pub struct DayQuery {
    /// Calendar date (YYYY-MM-DD); defaults to today in the configured timezone
    pub date: Option<String>,
}

#[derive(Deserialize, IntoParams)]
pub struct RangeQuery {
    /// Range start date (YYYY-MM-DD), inclusive
    pub start_date: String,
    /// Range end date (YYYY-MM-DD), inclusive
    pub end_date: String,
}

/// Intake log entry
#[derive(Serialize, ToSchema)]
pub struct IntakeLogResponse {
    /// Log ID
    pub id: String,
    /// Owning account
    pub account_id: String,
    /// Intake amount level
    pub level: String,
    /// When the water was drunk
    pub recorded_at: DateTime<Utc>,
    /// When the row was written
    pub created_at: DateTime<Utc>,
}

impl From<IntakeLogRow> for IntakeLogResponse {
    fn from(row: IntakeLogRow) -> Self {
        Self {
            id: row.id,
            account_id: row.account_id,
            level: row.level.to_string(),
            recorded_at: row.recorded_at,
            created_at: row.created_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
struct DeleteResult {
    /// Whether a row was actually removed
    deleted: bool,
}

/// Record a water intake event.
#[utoipa::path(
    post,
    path = "/v1/intake",
    tag = "Intake",
    request_body = RecordIntakeRequest,
    responses(
        (status = 201, description = "Created intake log", body = IntakeLogResponse),
        (status = 400, description = "Invalid level", body = ApiError)
    )
)]
async fn record_intake(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Json(body): Json<RecordIntakeRequest>,
) -> impl IntoResponse {
    let level: IntakeLevel = match body.level.parse() {
        Ok(v) => v,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, &trace_id, "bad_request", &e);
        }
    };
    let recorded_at = body.recorded_at.unwrap_or_else(Utc::now);

    match state
        .store
        .insert_intake_log(&state.config.account_id, level, recorded_at)
        .await
    {
        Ok(row) => {
            emit(&state.events, StoreEvent::IntakeChanged);
            success_response(
                StatusCode::CREATED,
                &trace_id,
                IntakeLogResponse::from(row),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to insert intake log");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &trace_id,
                "storage_error",
                &e.to_string(),
            )
        }
    }
}

/// List intake logs for one calendar day, newest first.
#[utoipa::path(
    get,
    path = "/v1/intake",
    tag = "Intake",
    params(DayQuery),
    responses(
        (status = 200, description = "Intake logs for the day", body = Vec<IntakeLogResponse>),
        (status = 400, description = "Invalid date", body = ApiError)
    )
)]
async fn list_intake_by_day(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Query(query): Query<DayQuery>,
) -> impl IntoResponse {
    let date = match &query.date {
        Some(raw) => match parse_date_param(raw, "date", &trace_id) {
            Ok(d) => d,
            Err(resp) => return resp,
        },
        None => today_local(state.tz_offset),
    };

    let (from, to) = local_day_range(date, state.tz_offset);
    list_range_response(&state, &trace_id, from, to).await
}

/// List intake logs across an inclusive date range, newest first.
#[utoipa::path(
    get,
    path = "/v1/intake/range",
    tag = "Intake",
    params(RangeQuery),
    responses(
        (status = 200, description = "Intake logs in the range", body = Vec<IntakeLogResponse>),
        (status = 400, description = "Invalid range", body = ApiError)
    )
)]
async fn list_intake_by_range(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> impl IntoResponse {
    let start = match parse_date_param(&query.start_date, "start_date", &trace_id) {
        Ok(d) => d,
        Err(resp) => return resp,
    };
    let end = match parse_date_param(&query.end_date, "end_date", &trace_id) {
        Ok(d) => d,
        Err(resp) => return resp,
    };
    if start > end {
        return error_response(
            StatusCode::BAD_REQUEST,
            &trace_id,
            "bad_request",
            "start_date must not be after end_date",
        );
    }

    let (from, _) = local_day_range(start, state.tz_offset);
    let (_, to) = local_day_range(end, state.tz_offset);
    list_range_response(&state, &trace_id, from, to).await
}

async fn list_range_response(
    state: &AppState,
    trace_id: &str,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Response {
    match state
        .store
        .list_intake_by_range(&state.config.account_id, from, to)
        .await
    {
        Ok(rows) => {
            let items: Vec<IntakeLogResponse> =
                rows.into_iter().map(IntakeLogResponse::from).collect();
            success_response(StatusCode::OK, trace_id, items)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list intake logs");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                trace_id,
                "storage_error",
                &e.to_string(),
            )
        }
    }
}

/// Delete one intake log. Idempotent: deleting a missing ID reports
/// `deleted: false` rather than an error.
#[utoipa::path(
    delete,
    path = "/v1/intake/{id}",
    tag = "Intake",
    params(("id" = String, Path, description = "Intake log ID")),
    responses(
        (status = 200, description = "Deletion outcome", body = DeleteResult)
    )
)]
async fn delete_intake(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state
        .store
        .delete_intake_log(&state.config.account_id, &id)
        .await
    {
        Ok(deleted) => {
            if deleted {
                emit(&state.events, StoreEvent::IntakeChanged);
            }
            success_response(StatusCode::OK, &trace_id, DeleteResult { deleted })
        }
        Err(e) => {
            tracing::error!(error = %e, id = %id, "Failed to delete intake log");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &trace_id,
                "storage_error",
                &e.to_string(),
            )
        }
    }
}

pub fn intake_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(record_intake, list_intake_by_day))
        .routes(routes!(list_intake_by_range))
        .routes(routes!(delete_intake))
}
