mod common;

use axum::http::StatusCode;
use common::{
    assert_err_envelope, assert_ok_envelope, build_test_context, build_test_context_with,
    request_json, request_no_body, CountingGenerator, TEST_ACCOUNT,
};
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;

#[tokio::test]
async fn health_reports_ok_and_sets_trace_id() {
    let ctx = build_test_context().await.unwrap();

    let (status, body, trace_id) = request_no_body(&ctx.app, "GET", "/v1/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_ok_envelope(&body);
    assert_eq!(body["data"]["storage_status"], "ok");
    assert_eq!(body["data"]["utc_offset"], "+09:00");
    assert!(trace_id.is_some());
}

#[tokio::test]
async fn record_and_list_intake_by_day() {
    let ctx = build_test_context().await.unwrap();

    // 09:30 KST on 2026-03-02
    let (status, body, _) = request_json(
        &ctx.app,
        "POST",
        "/v1/intake",
        Some(json!({ "level": "high", "recorded_at": "2026-03-02T00:30:00Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_ok_envelope(&body);
    assert_eq!(body["data"]["level"], "high");
    assert_eq!(body["data"]["account_id"], TEST_ACCOUNT);

    let (status, body, _) = request_json(
        &ctx.app,
        "POST",
        "/v1/intake",
        Some(json!({ "level": "low", "recorded_at": "2026-03-02T06:00:00Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_ok_envelope(&body);

    let (status, body, _) =
        request_no_body(&ctx.app, "GET", "/v1/intake?date=2026-03-02").await;
    assert_eq!(status, StatusCode::OK);
    assert_ok_envelope(&body);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    // newest first
    assert_eq!(items[0]["level"], "low");
    assert_eq!(items[1]["level"], "high");

    let (status, body, _) =
        request_no_body(&ctx.app, "GET", "/v1/intake?date=2026-03-03").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn intake_range_spans_multiple_days() {
    let ctx = build_test_context().await.unwrap();

    for (level, ts) in [
        ("medium", "2026-03-01T12:00:00Z"),
        ("high", "2026-03-03T12:00:00Z"),
        ("low", "2026-03-08T12:00:00Z"),
    ] {
        let (status, _, _) = request_json(
            &ctx.app,
            "POST",
            "/v1/intake",
            Some(json!({ "level": level, "recorded_at": ts })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body, _) = request_no_body(
        &ctx.app,
        "GET",
        "/v1/intake/range?start_date=2026-03-01&end_date=2026-03-04",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn invalid_intake_level_is_rejected() {
    let ctx = build_test_context().await.unwrap();

    let (status, body, _) = request_json(
        &ctx.app,
        "POST",
        "/v1/intake",
        Some(json!({ "level": "gallons" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_err_envelope(&body, 1001);
}

#[tokio::test]
async fn intake_range_rejects_inverted_window() {
    let ctx = build_test_context().await.unwrap();

    let (status, body, _) = request_no_body(
        &ctx.app,
        "GET",
        "/v1/intake/range?start_date=2026-03-05&end_date=2026-03-01",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_err_envelope(&body, 1001);
}

#[tokio::test]
async fn delete_intake_is_idempotent() {
    let ctx = build_test_context().await.unwrap();

    let (_, body, _) = request_json(
        &ctx.app,
        "POST",
        "/v1/intake",
        Some(json!({ "level": "medium", "recorded_at": "2026-03-02T03:00:00Z" })),
    )
    .await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body, _) =
        request_no_body(&ctx.app, "DELETE", &format!("/v1/intake/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_ok_envelope(&body);
    assert_eq!(body["data"]["deleted"], true);

    // second delete of the same id succeeds but removes nothing
    let (status, body, _) =
        request_no_body(&ctx.app, "DELETE", &format!("/v1/intake/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], false);
}

#[tokio::test]
async fn condition_upsert_keeps_one_entry_per_day() {
    let ctx = build_test_context().await.unwrap();

    let (status, body, _) = request_json(
        &ctx.app,
        "PUT",
        "/v1/condition/today",
        Some(json!({ "condition_type": "fatigue", "note": "long day" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_ok_envelope(&body);
    let first_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body, _) = request_json(
        &ctx.app,
        "PUT",
        "/v1/condition/today",
        Some(json!({ "condition_type": "good" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // same row, latest write wins
    assert_eq!(body["data"]["id"], first_id.as_str());
    assert_eq!(body["data"]["condition_type"], "good");
    assert!(body["data"]["note"].is_null());

    let (status, body, _) = request_no_body(&ctx.app, "GET", "/v1/condition").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["condition_type"], "good");
}

#[tokio::test]
async fn condition_for_an_empty_day_is_null() {
    let ctx = build_test_context().await.unwrap();

    let (status, body, _) =
        request_no_body(&ctx.app, "GET", "/v1/condition?date=1999-01-01").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["err_code"], 0);
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn invalid_condition_type_is_rejected() {
    let ctx = build_test_context().await.unwrap();

    let (status, body, _) = request_json(
        &ctx.app,
        "PUT",
        "/v1/condition/today",
        Some(json!({ "condition_type": "ecstatic" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_err_envelope(&body, 1001);
}

#[tokio::test]
async fn report_synthesis_end_to_end() {
    let ctx = build_test_context().await.unwrap();

    for ts in [
        "2026-03-02T00:30:00Z",
        "2026-03-02T06:00:00Z",
        "2026-03-04T09:00:00Z",
    ] {
        let (status, _, _) = request_json(
            &ctx.app,
            "POST",
            "/v1/intake",
            Some(json!({ "level": "medium", "recorded_at": ts })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body, _) = request_json(
        &ctx.app,
        "POST",
        "/v1/reports",
        Some(json!({ "start_date": "2026-03-01", "end_date": "2026-03-07" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_ok_envelope(&body);
    assert_eq!(body["data"]["report_type"], "manual");
    assert_eq!(body["data"]["content"], "drink steadily, you are doing well");
    let report_id = body["data"]["id"].as_str().unwrap().to_string();

    // provider was called exactly once, with all three intake entries
    assert_eq!(ctx.generator.calls.load(Ordering::SeqCst), 1);
    let prompt = ctx.generator.last_prompt.lock().unwrap().clone().unwrap();
    assert!(prompt.contains("(3 entries)"));
    assert!(prompt.contains("2026-03-01 ~ 2026-03-07"));

    let (status, body, _) = request_no_body(&ctx.app, "GET", "/v1/reports").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body, _) =
        request_no_body(&ctx.app, "GET", &format!("/v1/reports/{report_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], report_id.as_str());

    let (status, body, _) =
        request_no_body(&ctx.app, "GET", "/v1/reports/does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_err_envelope(&body, 1004);
}

#[tokio::test]
async fn empty_window_yields_422_without_provider_call() {
    let ctx = build_test_context().await.unwrap();

    let (status, body, _) = request_json(
        &ctx.app,
        "POST",
        "/v1/reports",
        Some(json!({ "start_date": "2026-03-01", "end_date": "2026-03-07" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_err_envelope(&body, 1201);
    assert_eq!(ctx.generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn provider_failure_yields_502_and_persists_nothing() {
    let ctx = build_test_context_with(Arc::new(CountingGenerator::failing()))
        .await
        .unwrap();

    let (status, _, _) = request_json(
        &ctx.app,
        "POST",
        "/v1/intake",
        Some(json!({ "level": "high", "recorded_at": "2026-03-02T03:00:00Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body, _) = request_json(
        &ctx.app,
        "POST",
        "/v1/reports",
        Some(json!({ "start_date": "2026-03-01", "end_date": "2026-03-07" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_err_envelope(&body, 1203);

    let (status, body, _) = request_no_body(&ctx.app, "GET", "/v1/reports").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn bad_report_type_is_rejected() {
    let ctx = build_test_context().await.unwrap();

    let (status, body, _) = request_json(
        &ctx.app,
        "POST",
        "/v1/reports",
        Some(json!({
            "start_date": "2026-03-01",
            "end_date": "2026-03-07",
            "report_type": "quarterly"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_err_envelope(&body, 1001);
}
