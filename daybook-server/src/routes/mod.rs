pub mod calendars;
pub mod categories;
pub mod events;
pub mod layout;
pub mod periods;
pub mod recurrences;
pub mod views;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use daybook_core::error::DaybookError;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// All routes with CORS and request tracing
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(calendars::router())
        .merge(events::router())
        .merge(recurrences::router())
        .merge(views::router())
        .merge(categories::router())
        .merge(periods::router())
        .merge(layout::router())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Convert errors to HTTP responses
pub struct AppError(anyhow::Error);

impl AppError {
    fn status(&self) -> StatusCode {
        match self.0.downcast_ref::<DaybookError>() {
            Some(DaybookError::Validation(_)) => StatusCode::BAD_REQUEST,
            Some(DaybookError::NotFound { .. }) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        let body = Json(ErrorResponse {
            error: self.0.to_string(),
        });
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use daybook_core::daybook::Daybook;
    use daybook_core::daybook_config::DaybookConfig;
    use serde_json::Value;
    use tower::ServiceExt; // for `oneshot`

    use crate::state::AppState;

    /// An app over a scratch daybook holding one calendar, `personal`.
    pub fn test_app() -> (tempfile::TempDir, Router) {
        let dir = tempfile::tempdir().unwrap();
        let config = DaybookConfig {
            calendar_dir: dir.path().to_path_buf(),
            timezone: Some("UTC".into()),
            ..DaybookConfig::default()
        };
        let daybook = Daybook::from_config(config).unwrap();
        daybook.create_calendar("Personal", None).unwrap();

        (dir, super::app(AppState::new(daybook)))
    }

    pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => request
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }
}
