//! HTTP route handlers.

use std::path::Path;

use askama::Template;
use axum::body::Bytes;
use axum::{
    Form, Json, Router,
    extract::{
        Path as UrlPath, Query, State,
        rejection::{FormRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::domain::{Section, ServiceType};
use crate::registry::{RegistryError, SubmitReport};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/", get(reports_page))
        .route("/health", get(health))
        .route("/submit", get(submit_page).post(submit_form))
        .route("/manage", get(manage_page))
        .route("/manage/:index/:action", post(manage_action))
        .route("/api/reports", get(list_reports).post(submit_report))
        .route("/api/reports/:index", axum::routing::delete(delete_report))
        .route("/api/reports/:index/move-up", post(move_up))
        .route("/api/reports/:index/move-down", post(move_down))
        .route("/api/schedule", get(lookup_schedule))
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Render a template, mapping failures to an internal error.
fn render(template: &impl Template) -> Result<Html<String>, AppError> {
    template.render().map(Html).map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })
}

/// Full-page error response for the HTML tabs.
fn error_page(state: &AppState, status: StatusCode, title: &str, message: String) -> Response {
    warn!(%status, title, %message, "page request failed");
    let template = ErrorTemplate {
        station: state.registry.station().to_string(),
        active_tab: "manage",
        title: title.to_string(),
        message,
    };
    match render(&template) {
        Ok(html) => (status, html).into_response(),
        Err(e) => e.into_response(),
    }
}

// ============================================================================
// HTML pages
// ============================================================================

/// Report list tab.
async fn reports_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let listing = state.registry.list_reports().await?;
    render(&ReportsTemplate::new(state.registry.station(), &listing))
}

/// Submission tab, optionally previewing the scheduled departure.
async fn submit_page(
    State(state): State<AppState>,
    query: Result<Query<SubmitPageQuery>, QueryRejection>,
) -> Result<Html<String>, AppError> {
    let Query(query) = query?;
    let service_type = query.service_type.unwrap_or(ServiceType::Nozomi);
    let number = query.number.unwrap_or_default();
    let section = query.section.unwrap_or(Section::ShinOsakaKyoto);
    let delay_minutes = query
        .delay_minutes
        .and_then(|d| d.trim().parse().ok())
        .unwrap_or(0);

    let scheduled = state.registry.scheduled_departure(service_type, &number);
    render(&SubmitTemplate::new(
        state.registry.station(),
        service_type,
        &number,
        section,
        delay_minutes,
        scheduled,
    ))
}

/// Form message for a rejected submission.
fn form_error_message(err: &RegistryError) -> String {
    match err {
        RegistryError::ScheduleNotFound(name) => {
            format!("{} の所定発車時刻が見つかりません。", name)
        }
        RegistryError::InvalidDelay(_) => "遅れ（分）は0〜120の範囲で入力してください。".to_string(),
        other => format!("登録に失敗しました: {}", other),
    }
}

/// Handle the submission form.
async fn submit_form(
    State(state): State<AppState>,
    form: Result<Form<SubmitForm>, FormRejection>,
) -> Result<Response, AppError> {
    let Form(form) = form?;
    let registry = &state.registry;
    let scheduled = registry.scheduled_departure(form.service_type, &form.number);
    let page = |delay_minutes: i64| {
        SubmitTemplate::new(
            registry.station(),
            form.service_type,
            &form.number,
            form.section,
            delay_minutes,
            scheduled,
        )
    };

    let Ok(delay_minutes) = form.delay_minutes.trim().parse::<i64>() else {
        let template = page(0).with_error("遅れ（分）は0〜120の範囲で入力してください。");
        return Ok((StatusCode::BAD_REQUEST, render(&template)?).into_response());
    };

    let request = SubmitReport {
        service_type: form.service_type,
        number: form.number.clone(),
        section: form.section,
        delay_minutes,
    };

    match registry.submit_report(request).await {
        Ok(report) => {
            let template = page(0).with_notice(format!("{} を登録しました！", report.train_name));
            Ok(render(&template)?.into_response())
        }
        Err(e) => {
            let status = status_for(&e);
            if status.is_server_error() {
                error!(error = %e, "failed to register delay report");
            }
            let template = page(delay_minutes).with_error(form_error_message(&e));
            Ok((status, render(&template)?).into_response())
        }
    }
}

/// Reorder/delete tab.
async fn manage_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let listing = state.registry.list_reports().await?;
    render(&ManageTemplate::new(state.registry.station(), &listing))
}

/// Row buttons on the manage tab; redirects back to the tab on success.
async fn manage_action(
    State(state): State<AppState>,
    path: Result<UrlPath<(usize, String)>, PathRejection>,
) -> Response {
    let (index, action) = match path {
        Ok(UrlPath(params)) => params,
        Err(rejection) => return AppError::from(rejection).into_response(),
    };
    let result = match action.as_str() {
        "up" => state.registry.move_up(index).await,
        "down" => state.registry.move_down(index).await,
        "delete" => state.registry.delete_report(index).await.map(|_| ()),
        _ => {
            return error_page(
                &state,
                StatusCode::NOT_FOUND,
                "不明な操作です",
                format!("unknown action: {action}"),
            );
        }
    };

    match result {
        Ok(()) => Redirect::to("/manage").into_response(),
        Err(e) => error_page(&state, status_for(&e), "操作に失敗しました", e.to_string()),
    }
}

// ============================================================================
// JSON API
// ============================================================================

async fn listing_response(state: &AppState) -> Result<Json<ReportListResponse>, AppError> {
    let listing = state.registry.list_reports().await?;
    Ok(Json(ReportListResponse::from_listing(&listing)))
}

/// Current reports with elapsed time since the last update.
async fn list_reports(State(state): State<AppState>) -> Result<Json<ReportListResponse>, AppError> {
    listing_response(&state).await
}

/// Register a new delay report.
async fn submit_report(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<SubmitReportResponse>), AppError> {
    // Parse JSON manually so we can log the body on failure
    let req: SubmitReportRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(&body), "invalid submit body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    let report = state.registry.submit_report(req.into()).await?;
    let listing = ReportListResponse::from_listing(&state.registry.list_reports().await?);

    Ok((
        StatusCode::CREATED,
        Json(SubmitReportResponse { report, listing }),
    ))
}

async fn move_up(
    State(state): State<AppState>,
    index: Result<UrlPath<usize>, PathRejection>,
) -> Result<Json<ReportListResponse>, AppError> {
    let UrlPath(index) = index?;
    state.registry.move_up(index).await?;
    listing_response(&state).await
}

async fn move_down(
    State(state): State<AppState>,
    index: Result<UrlPath<usize>, PathRejection>,
) -> Result<Json<ReportListResponse>, AppError> {
    let UrlPath(index) = index?;
    state.registry.move_down(index).await?;
    listing_response(&state).await
}

async fn delete_report(
    State(state): State<AppState>,
    index: Result<UrlPath<usize>, PathRejection>,
) -> Result<Json<ReportListResponse>, AppError> {
    let UrlPath(index) = index?;
    state.registry.delete_report(index).await?;
    listing_response(&state).await
}

/// Look up the scheduled departure for a service type and number.
async fn lookup_schedule(
    State(state): State<AppState>,
    query: Result<Query<ScheduleQuery>, QueryRejection>,
) -> Result<Json<ScheduleResponse>, AppError> {
    let Query(query) = query?;
    let service_type = query.service_type.ok_or_else(|| AppError::BadRequest {
        message: "service_type is required".to_string(),
    })?;
    let number = query.number.unwrap_or_default();

    Ok(Json(ScheduleResponse {
        train_name: service_type.train_name(number.trim()),
        departure_time: state
            .registry
            .scheduled_departure(service_type, &number)
            .map(str::to_string),
    }))
}

/// HTTP status for a registry error.
fn status_for(err: &RegistryError) -> StatusCode {
    match err {
        RegistryError::ScheduleNotFound(_) => StatusCode::NOT_FOUND,
        RegistryError::InvalidDelay(_) | RegistryError::IndexOutOfRange { .. } => {
            StatusCode::BAD_REQUEST
        }
        RegistryError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Registry(RegistryError),
    Internal { message: String },
}

impl From<RegistryError> for AppError {
    fn from(e: RegistryError) -> Self {
        AppError::Registry(e)
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match &self {
            AppError::BadRequest { message } => {
                (StatusCode::BAD_REQUEST, "bad_request", message.clone())
            }
            AppError::Registry(e) => (status_for(e), e.kind(), e.to_string()),
            AppError::Internal { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", message.clone())
            }
        };

        if status.is_server_error() {
            error!(%status, kind, %message, "request failed");
        } else {
            warn!(%status, kind, %message, "request rejected");
        }

        let body = Json(ErrorResponse {
            kind: kind.to_string(),
            message,
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{DelayRegistry, RegistrySettings};
    use crate::store::MemoryStore;
    use crate::timetable::Timetable;
    use axum::body::Body;
    use axum::http::{Request, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> Router {
        let timetable = Timetable::from_entries([("のぞみ99", "10:05"), ("こだま701", "23:50")]);
        let registry = DelayRegistry::new(MemoryStore::new(), timetable, RegistrySettings::default());
        create_router(AppState::new(registry), "static")
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn report(service_type: &str, number: &str, delay: i64) -> Value {
        json!({
            "service_type": service_type,
            "number": number,
            "section": "gifu_hashima_nagoya",
            "delay_minutes": delay,
        })
    }

    async fn json_of(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = send(app, request).await;
        (status, serde_json::from_str(&body).unwrap())
    }

    #[tokio::test]
    async fn health_check() {
        let (status, body) = send(&app(), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn api_submit_and_list() {
        let app = app();

        let (status, body) = json_of(&app, post_json("/api/reports", report("kodama", "701", 20))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["report"]["train_name"], "こだま701");
        assert_eq!(body["report"]["station"], "名古屋");
        assert_eq!(body["reports"].as_array().unwrap().len(), 1);

        let (status, body) = json_of(&app, get("/api/reports")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reports"][0]["expected_departure"], "00:10");
        assert_eq!(body["reports"][0]["status"], "delayed");
        assert_eq!(body["minutes_since_update"], 0);
    }

    #[tokio::test]
    async fn api_rejections_use_kind_and_message() {
        let app = app();

        let (status, body) = json_of(&app, post_json("/api/reports", report("hikari", "1", 5))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["kind"], "schedule_not_found");
        assert_eq!(body["message"], "no scheduled departure found for ひかり1");

        let (status, body) = json_of(&app, post_json("/api/reports", report("nozomi", "99", 121))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "invalid_delay");

        let (status, body) = json_of(&app, post_json("/api/reports", json!({"number": "99"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "bad_request");

        let (_, body) = json_of(&app, get("/api/reports")).await;
        assert!(body["reports"].as_array().unwrap().is_empty());
        assert_eq!(body["last_updated"], Value::Null);
    }

    #[tokio::test]
    async fn api_reorder_and_delete() {
        let app = app();
        send(&app, post_json("/api/reports", report("nozomi", "99", 0))).await;
        send(&app, post_json("/api/reports", report("kodama", "701", 5))).await;

        let (status, body) = json_of(&app, post_json("/api/reports/1/move-up", json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reports"][0]["train_name"], "こだま701");

        let (_, body) = json_of(&app, post_json("/api/reports/0/move-down", json!({}))).await;
        assert_eq!(body["reports"][0]["train_name"], "のぞみ99");

        let delete = Request::builder()
            .method("DELETE")
            .uri("/api/reports/0")
            .body(Body::empty())
            .unwrap();
        let (status, body) = json_of(&app, delete).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reports"].as_array().unwrap().len(), 1);
        assert_eq!(body["reports"][0]["train_name"], "こだま701");

        let (status, body) = json_of(&app, post_json("/api/reports/7/move-up", json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "index_out_of_range");
    }

    #[tokio::test]
    async fn api_schedule_lookup() {
        let app = app();

        let (status, body) = json_of(&app, get("/api/schedule?service_type=nozomi&number=99")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["train_name"], "のぞみ99");
        assert_eq!(body["departure_time"], "10:05");

        let (_, body) = json_of(&app, get("/api/schedule?service_type=hikari&number=3")).await;
        assert_eq!(body["departure_time"], Value::Null);

        let (status, _) = send(&app, get("/api/schedule?number=3")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn html_tabs_render() {
        let app = app();

        let (status, body) = send(&app, get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("現在登録されている情報はありません。"));

        let (status, body) = send(&app, get("/submit?service_type=nozomi&number=99")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("10:05"));

        let (status, body) = send(&app, get("/manage")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("登録されている列車情報はありません。"));
    }

    #[tokio::test]
    async fn html_form_submission() {
        let app = app();

        let (status, body) = send(
            &app,
            post_form(
                "/submit",
                "service_type=nozomi&number=99&section=shin_osaka_kyoto&delay_minutes=15",
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("のぞみ99 を登録しました！"));

        let (_, body) = send(&app, get("/")).await;
        assert!(body.contains("10:20（15分遅れ）"));

        let (status, body) = send(
            &app,
            post_form(
                "/submit",
                "service_type=hikari&number=1&section=shin_osaka_kyoto&delay_minutes=5",
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("ひかり1 の所定発車時刻が見つかりません。"));

        let (status, _) = send(
            &app,
            post_form(
                "/submit",
                "service_type=nozomi&number=99&section=shin_osaka_kyoto&delay_minutes=",
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn html_manage_actions_redirect() {
        let app = app();
        send(&app, post_json("/api/reports", report("nozomi", "99", 0))).await;

        let response = app
            .clone()
            .oneshot(post_form("/manage/0/delete", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/manage");

        let (status, _) = send(&app, post_form("/manage/0/up", "")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, post_form("/manage/0/sideways", "")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    fn assert_bad_request(status: StatusCode, body: &Value) {
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "bad_request");
        assert!(!body["message"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_index_in_path_is_json_error() {
        let app = app();
        send(&app, post_json("/api/reports", report("nozomi", "99", 0))).await;

        for uri in ["/api/reports/abc/move-up", "/api/reports/-1/move-down"] {
            let (status, body) = json_of(&app, post_json(uri, json!({}))).await;
            assert_bad_request(status, &body);
        }

        let delete = Request::builder()
            .method("DELETE")
            .uri("/api/reports/abc")
            .body(Body::empty())
            .unwrap();
        let (status, body) = json_of(&app, delete).await;
        assert_bad_request(status, &body);

        let (status, body) = json_of(&app, post_form("/manage/abc/up", "")).await;
        assert_bad_request(status, &body);

        // Nothing was touched.
        let (_, body) = json_of(&app, get("/api/reports")).await;
        assert_eq!(body["reports"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_service_type_in_form_is_json_error() {
        let app = app();

        let (status, body) = json_of(
            &app,
            post_form(
                "/submit",
                "service_type=mizuho&number=99&section=shin_osaka_kyoto&delay_minutes=5",
            ),
        )
        .await;
        assert_bad_request(status, &body);

        let (status, body) = json_of(
            &app,
            post_form(
                "/submit",
                "service_type=nozomi&number=99&section=tokyo_shinagawa&delay_minutes=5",
            ),
        )
        .await;
        assert_bad_request(status, &body);

        let (_, body) = json_of(&app, get("/api/reports")).await;
        assert!(body["reports"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_service_type_in_query_is_json_error() {
        let app = app();

        let (status, body) = json_of(&app, get("/api/schedule?service_type=mizuho&number=1")).await;
        assert_bad_request(status, &body);

        let (status, body) = json_of(&app, get("/submit?service_type=mizuho")).await;
        assert_bad_request(status, &body);
    }

    #[tokio::test]
    async fn japanese_labels_accepted_in_form_and_query() {
        let app = app();

        let (status, body) = json_of(
            &app,
            get("/api/schedule?service_type=%E3%81%AE%E3%81%9E%E3%81%BF&number=99"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["departure_time"], "10:05");

        let (status, body) = send(
            &app,
            post_form(
                "/submit",
                "service_type=%E3%81%93%E3%81%A0%E3%81%BE&number=701&section=gifu_hashima_nagoya&delay_minutes=0",
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("こだま701 を登録しました！"));
    }
}
