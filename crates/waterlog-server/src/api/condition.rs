use crate::api::{error_response, parse_date_param, success_response, ApiError};
use crate::events::{emit, StoreEvent};
use crate::logging::TraceId;
use crate::state::AppState;
use crate::time::today_local;
use axum::extract::{Extension, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use utoipa_axum::{router::OpenApiRouter, routes};
use waterlog_common::types::{ConditionLogRow, ConditionType};

#[derive(Deserialize, ToSchema)]
pub struct UpsertConditionRequest {
    /// Condition: fatigue / swelling / good
    pub condition_type: String,
    /// Optional free-form note
    pub note: Option<String>,
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

/// Daily condition entry
#[derive(Serialize, ToSchema)]
pub struct ConditionLogResponse {
    /// Log ID
    pub id: String,
    /// Owning account
    pub account_id: String,
    /// Condition for the day
    pub condition_type: String,
    /// Optional note
    pub note: Option<String>,
    /// Calendar day the entry belongs to
    pub log_date: NaiveDate,
    /// When the row was last written
    pub created_at: DateTime<Utc>,
}

impl From<ConditionLogRow> for ConditionLogResponse {
    fn from(row: ConditionLogRow) -> Self {
        Self {
            id: row.id,
            account_id: row.account_id,
            condition_type: row.condition_type.to_string(),
            note: row.note,
            log_date: row.log_date,
            created_at: row.created_at,
        }
    }
}

/// Record today's condition. One entry per day: a second call for the
/// same day overwrites the previous condition and note.
#[utoipa::path(
    put,
    path = "/v1/condition/today",
    tag = "Condition",
    request_body = UpsertConditionRequest,
    responses(
        (status = 200, description = "Stored condition entry", body = ConditionLogResponse),
        (status = 400, description = "Invalid condition type", body = ApiError)
    )
)]
async fn upsert_condition_today(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Json(body): Json<UpsertConditionRequest>,
) -> impl IntoResponse {
    let condition: ConditionType = match body.condition_type.parse() {
        Ok(v) => v,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, &trace_id, "bad_request", &e);
        }
    };
    let date = today_local(state.tz_offset);

    match state
        .store
        .upsert_condition_log(&state.config.account_id, date, condition, body.note.as_deref())
        .await
    {
        Ok(row) => {
            emit(&state.events, StoreEvent::ConditionChanged);
            success_response(StatusCode::OK, &trace_id, ConditionLogResponse::from(row))
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to upsert condition log");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &trace_id,
                "storage_error",
                &e.to_string(),
            )
        }
    }
}

/// Fetch the condition entry for one day. `data` is null when nothing
/// was recorded for that day.
#[utoipa::path(
    get,
    path = "/v1/condition",
    tag = "Condition",
    params(DayQuery),
    responses(
        (status = 200, description = "Condition entry or null", body = ConditionLogResponse),
        (status = 400, description = "Invalid date", body = ApiError)
    )
)]
async fn get_condition_by_day(
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

    match state
        .store
        .get_condition_by_date(&state.config.account_id, date)
        .await
    {
        Ok(row) => success_response(
            StatusCode::OK,
            &trace_id,
            row.map(ConditionLogResponse::from),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch condition log");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &trace_id,
                "storage_error",
                &e.to_string(),
            )
        }
    }
}

/// List condition entries across an inclusive date range, newest first.
#[utoipa::path(
    get,
    path = "/v1/condition/range",
    tag = "Condition",
    params(RangeQuery),
    responses(
        (status = 200, description = "Condition entries in the range", body = Vec<ConditionLogResponse>),
        (status = 400, description = "Invalid range", body = ApiError)
    )
)]
async fn list_conditions_by_range(
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

    match state
        .store
        .list_conditions_by_range(&state.config.account_id, start, end)
        .await
    {
        Ok(rows) => {
            let items: Vec<ConditionLogResponse> =
                rows.into_iter().map(ConditionLogResponse::from).collect();
            success_response(StatusCode::OK, &trace_id, items)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list condition logs");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &trace_id,
                "storage_error",
                &e.to_string(),
            )
        }
    }
}

pub fn condition_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(upsert_condition_today))
        .routes(routes!(get_condition_by_day))
        .routes(routes!(list_conditions_by_range))
}
