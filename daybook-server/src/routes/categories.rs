//! Category endpoints

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};
use daybook_core::category::Category;
use serde::{Deserialize, Serialize};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/calendars/{slug}/categories",
            get(list_categories).post(create_category),
        )
        .route("/calendars/{slug}/categories/{id}", delete(delete_category))
}

async fn list_categories(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(state.calendar(&slug)?.categories()?))
}

#[derive(Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub color: String,
}

async fn create_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let calendar = state.calendar(&slug)?;
    let category = calendar.add_category(Category::new(req.name, req.color)?)?;
    Ok((StatusCode::CREATED, Json(category)))
}

#[derive(Serialize)]
pub struct DeletedCategory {
    /// Events that no longer carry the category
    pub cleared_events: usize,
}

async fn delete_category(
    State(state): State<AppState>,
    Path((slug, id)): Path<(String, String)>,
) -> Result<Json<DeletedCategory>, AppError> {
    let cleared_events = state.calendar(&slug)?.delete_category(&id)?;
    Ok(Json(DeletedCategory { cleared_events }))
}
