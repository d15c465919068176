//! Calendar listing

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/calendars", get(list_calendars))
}

/// Calendar info returned by API
#[derive(Serialize)]
pub struct CalendarInfo {
    pub slug: String,
    pub name: String,
    pub color: Option<String>,
    pub path: String,
    pub is_default: bool,
}

/// GET /calendars - List all calendars
async fn list_calendars(State(state): State<AppState>) -> Result<Json<Vec<CalendarInfo>>, AppError> {
    let daybook = state.daybook();
    let default = daybook.config().default_calendar.as_deref();

    let calendars = daybook
        .calendars()
        .into_iter()
        .map(|cal| CalendarInfo {
            is_default: Some(cal.slug.as_str()) == default,
            name: cal.name().to_string(),
            color: cal.config.color.clone(),
            path: cal.path.to_string_lossy().to_string(),
            slug: cal.slug,
        })
        .collect();

    Ok(Json(calendars))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{send, test_app};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn lists_calendars() {
        let (_dir, app) = test_app();
        let (status, body) = send(&app, "GET", "/calendars", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["slug"], "personal");
        assert_eq!(body[0]["name"], "Personal");
    }
}
