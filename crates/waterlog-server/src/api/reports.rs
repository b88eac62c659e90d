use crate::api::{error_response, parse_date_param, success_response, ApiError};
use crate::logging::TraceId;
use crate::report::SynthesisError;
use crate::state::AppState;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};
use waterlog_ai::AiError;
use waterlog_common::types::{AIReportRow, ReportType};

#[derive(Deserialize, ToSchema)]
pub struct SynthesizeReportRequest {
    /// Window start date (YYYY-MM-DD), inclusive
    pub start_date: String,
    /// Window end date (YYYY-MM-DD), inclusive
    pub end_date: String,
    /// `weekly` or `manual`; defaults to `manual`
    pub report_type: Option<String>,
}

/// Synthesized coaching report
#[derive(Serialize, ToSchema)]
pub struct AIReportResponse {
    /// Report ID
    pub id: String,
    /// Owning account
    pub account_id: String,
    /// Generated coaching text
    pub content: String,
    /// UTC instant of the window start
    pub start_date: DateTime<Utc>,
    /// UTC instant of the window end
    pub end_date: DateTime<Utc>,
    /// weekly / manual
    pub report_type: String,
    /// When the report was persisted
    pub created_at: DateTime<Utc>,
}

impl From<AIReportRow> for AIReportResponse {
    fn from(row: AIReportRow) -> Self {
        Self {
            id: row.id,
            account_id: row.account_id,
            content: row.content,
            start_date: row.start_date,
            end_date: row.end_date,
            report_type: row.report_type.to_string(),
            created_at: row.created_at,
        }
    }
}

fn synthesis_error_response(trace_id: &str, err: SynthesisError) -> Response {
    match &err {
        SynthesisError::InsufficientData => error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            trace_id,
            "insufficient_data",
            &err.to_string(),
        ),
        SynthesisError::DataRetrieval(e) | SynthesisError::Persistence(e) => {
            tracing::error!(error = %e, "Report synthesis storage failure");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                trace_id,
                "storage_error",
                &err.to_string(),
            )
        }
        SynthesisError::Generation(AiError::Configuration(msg)) => {
            tracing::error!(error = %msg, "Text generator is not configured");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                trace_id,
                "ai_config_error",
                msg,
            )
        }
        SynthesisError::Generation(e) => {
            tracing::error!(error = %e, "Text generation failed");
            error_response(
                StatusCode::BAD_GATEWAY,
                trace_id,
                "ai_provider_error",
                &format!("text generation failed: {e}"),
            )
        }
    }
}

/// Synthesize a coaching report over an inclusive date window.
/// Calls the text provider exactly once; nothing is persisted when the
/// window holds no logs or the provider fails.
#[utoipa::path(
    post,
    path = "/v1/reports",
    tag = "Reports",
    request_body = SynthesizeReportRequest,
    responses(
        (status = 201, description = "Persisted report", body = AIReportResponse),
        (status = 400, description = "Invalid window", body = ApiError),
        (status = 422, description = "Window holds no logs", body = ApiError),
        (status = 502, description = "Provider failure", body = ApiError)
    )
)]
async fn synthesize_report(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Json(body): Json<SynthesizeReportRequest>,
) -> impl IntoResponse {
    let start = match parse_date_param(&body.start_date, "start_date", &trace_id) {
        Ok(d) => d,
        Err(resp) => return resp,
    };
    let end = match parse_date_param(&body.end_date, "end_date", &trace_id) {
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
    let report_type: Option<ReportType> = match &body.report_type {
        Some(raw) => match raw.parse() {
            Ok(v) => Some(v),
            Err(e) => {
                return error_response(StatusCode::BAD_REQUEST, &trace_id, "bad_request", &e);
            }
        },
        None => None,
    };

    match state
        .synthesizer()
        .synthesize(&state.config.account_id, start, end, report_type)
        .await
    {
        Ok(report) => success_response(
            StatusCode::CREATED,
            &trace_id,
            AIReportResponse::from(report),
        ),
        Err(e) => synthesis_error_response(&trace_id, e),
    }
}

/// List all reports for the account, newest first.
#[utoipa::path(
    get,
    path = "/v1/reports",
    tag = "Reports",
    responses(
        (status = 200, description = "All reports", body = Vec<AIReportResponse>)
    )
)]
async fn list_reports(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match state.store.list_ai_reports(&state.config.account_id).await {
        Ok(rows) => {
            let items: Vec<AIReportResponse> =
                rows.into_iter().map(AIReportResponse::from).collect();
            success_response(StatusCode::OK, &trace_id, items)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list reports");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &trace_id,
                "storage_error",
                &e.to_string(),
            )
        }
    }
}

/// Fetch one report by ID.
#[utoipa::path(
    get,
    path = "/v1/reports/{id}",
    tag = "Reports",
    params(("id" = String, Path, description = "Report ID")),
    responses(
        (status = 200, description = "The report", body = AIReportResponse),
        (status = 404, description = "No such report", body = ApiError)
    )
)]
async fn get_report(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state
        .store
        .get_ai_report_by_id(&state.config.account_id, &id)
        .await
    {
        Ok(Some(row)) => success_response(StatusCode::OK, &trace_id, AIReportResponse::from(row)),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            &trace_id,
            "not_found",
            &format!("report '{id}' not found"),
        ),
        Err(e) => {
            tracing::error!(error = %e, id = %id, "Failed to fetch report");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &trace_id,
                "storage_error",
                &e.to_string(),
            )
        }
    }
}

pub fn report_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(synthesize_report, list_reports))
        .routes(routes!(get_report))
}
