//! Request routing.
//!
//! [`dispatch`] takes an already-collected body so it can be driven without a
//! socket.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::assets::CascadeAsset;
use super::pages::{self, Page};
use crate::app::App;
use crate::error::ApiError;
use crate::notify::NotificationSource;
use crate::watcher::WatcherState;

/// Response type of every handler.
pub type HttpResponse = Response<Full<Bytes>>;

/// Every path the server answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Page(Page),
    BlinkData,
    DrowsinessData,
    ScreenTime,
    Metrics,
    Insights,
    Notifications,
    ToggleBackground,
    SendNotification,
    Health,
    Asset(CascadeAsset),
}

impl Route {
    /// Resolve a request path.
    pub fn from_path(path: &str) -> Option<Self> {
        if let Some(page) = Page::from_path(path) {
            return Some(Route::Page(page));
        }
        if let Some(asset) = CascadeAsset::from_path(path) {
            return Some(Route::Asset(asset));
        }

        let route = match path {
            "/api/blink-data" => Route::BlinkData,
            "/api/drowsiness-data" => Route::DrowsinessData,
            "/api/screen-time" => Route::ScreenTime,
            "/api/metrics" => Route::Metrics,
            "/api/insights" => Route::Insights,
            "/api/notifications" => Route::Notifications,
            "/api/toggle-background" => Route::ToggleBackground,
            "/api/notification" | "/api/send-notification" => Route::SendNotification,
            "/health" | "/healthz" => Route::Health,
            _ => return None,
        };
        Some(route)
    }

    /// The only method this route accepts.
    pub fn method(&self) -> Method {
        match self {
            Route::ToggleBackground | Route::SendNotification => Method::POST,
            _ => Method::GET,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ToggleRequest {
    #[serde(alias = "run")]
    enabled: Option<bool>,
}

#[derive(Debug, Serialize)]
struct ToggleResponse {
    status: &'static str,
    state: WatcherState,
    background_processing: bool,
    message: &'static str,
}

#[derive(Debug, Deserialize)]
struct NotificationRequest {
    title: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    status: &'static str,
}

/// Route a request and render its response.
pub async fn dispatch(app: &App, method: &Method, path: &str, body: Bytes) -> HttpResponse {
    let response = match handle(app, method, path, body).await {
        Ok(response) => response,
        Err(e) => {
            warn!(%method, path, error = %e, "Request failed");
            error_response(&e)
        }
    };
    debug!(%method, path, status = %response.status(), "Handled request");
    response
}

async fn handle(
    app: &App,
    method: &Method,
    path: &str,
    body: Bytes,
) -> Result<HttpResponse, ApiError> {
    let route = Route::from_path(path).ok_or_else(|| ApiError::NotFound(path.to_string()))?;
    if *method != route.method() {
        return Err(ApiError::MethodNotAllowed {
            method: method.to_string(),
            path: path.to_string(),
        });
    }

    // Only asset reads await. Generator guards must never live across one.
    if let Route::Asset(asset) = route {
        let bytes = app.assets().load(asset).await?;
        return Ok(text(StatusCode::OK, "text/xml", bytes));
    }
    respond(app, route, &body)
}

fn respond(app: &App, route: Route, body: &Bytes) -> Result<HttpResponse, ApiError> {
    match route {
        Route::Page(page) => Ok(html(render_page(app, page))),
        Route::BlinkData => json(StatusCode::OK, &app.generator().lock().blink_data()),
        Route::DrowsinessData => json(StatusCode::OK, &app.generator().lock().drowsiness_data()),
        Route::ScreenTime => json(StatusCode::OK, &app.generator().lock().screen_time()),
        Route::Metrics => json(StatusCode::OK, &app.generator().lock().current_metrics()),
        Route::Insights => json(StatusCode::OK, &app.generator().lock().dashboard().insights),
        Route::Notifications => json(StatusCode::OK, &app.notifier().recent()),
        Route::ToggleBackground => toggle_background(app, body),
        Route::SendNotification => send_notification(app, body),
        Route::Health => Ok(text(StatusCode::OK, "text/plain", Bytes::from_static(b"OK"))),
        Route::Asset(asset) => Err(ApiError::NotFound(asset.file_name().to_string())),
    }
}

fn render_page(app: &App, page: Page) -> String {
    match page {
        Page::Home => pages::home(&app.generator().lock().dashboard()),
        Page::Analytics => {
            let (dashboard, mode) = {
                let mut generator = app.generator().lock();
                (generator.dashboard(), generator.mode())
            };
            pages::analytics(&dashboard, mode)
        }
        Page::Reports => {
            let (blink, drowsiness, screen_time) = {
                let mut generator = app.generator().lock();
                (
                    generator.blink_history().to_vec(),
                    generator.drowsiness_history().to_vec(),
                    generator.screen_time(),
                )
            };
            pages::reports(&blink, &drowsiness, &screen_time)
        }
        Page::Settings => pages::settings(
            app.settings(),
            app.mode(),
            app.watcher().state(),
            &app.notifier().recent(),
        ),
        Page::LiveTracking => pages::live_tracking(),
        Page::EyeExercises => pages::eye_exercises(),
        Page::AdvancedFeatures => pages::advanced_features(),
    }
}

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<Option<T>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    Ok(Some(serde_json::from_slice(body)?))
}

fn toggle_background(app: &App, body: &Bytes) -> Result<HttpResponse, ApiError> {
    let enabled = parse_body::<ToggleRequest>(body)?
        .and_then(|req| req.enabled)
        .ok_or_else(|| ApiError::missing("enabled"))?;

    let toggle = app.watcher().set_enabled(enabled);
    let state = app.watcher().state();

    json(
        StatusCode::OK,
        &ToggleResponse {
            status: "success",
            state,
            background_processing: state.is_active(),
            message: toggle.message(),
        },
    )
}

fn send_notification(app: &App, body: &Bytes) -> Result<HttpResponse, ApiError> {
    let request = parse_body::<NotificationRequest>(body)?;
    let (title, message) = match request {
        Some(NotificationRequest {
            title: Some(title),
            message: Some(message),
        }) => (title, message),
        _ => return Err(ApiError::MissingField("title or message".to_string())),
    };

    app.notifier().send(title, message, NotificationSource::Api);
    json(StatusCode::OK, &StatusResponse { status: "success" })
}

fn text(status: StatusCode, content_type: &'static str, body: Bytes) -> HttpResponse {
    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

fn html(body: String) -> HttpResponse {
    text(StatusCode::OK, "text/html; charset=utf-8", Bytes::from(body))
}

fn json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Result<HttpResponse, ApiError> {
    let body = serde_json::to_vec(value)?;
    Ok(text(status, "application/json", Bytes::from(body)))
}

/// Render an error as its JSON payload.
pub fn error_response(error: &ApiError) -> HttpResponse {
    text(
        error.status(),
        "application/json",
        Bytes::from(error.to_json().to_string()),
    )
}
