//! Stateless day packing for clients that hold their own events

use axum::{Json, Router, extract::State, routing::post};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use daybook_core::constants::DEFAULT_DURATION_MINUTES;
use daybook_core::error::DaybookError;
use daybook_core::event::TimeStatus;
use daybook_core::layout::{OverlapMode, Placeable, pack_day};
use serde::{Deserialize, Serialize};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/layout/day", post(layout_day))
}

/// An event as a client sends it; `datetime` may be missing.
#[derive(Deserialize)]
pub struct LayoutItem {
    pub id: String,
    pub datetime: Option<DateTime<Utc>>,
    pub end_datetime: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time_status: TimeStatus,
}

impl Placeable for LayoutItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        if self.time_status != TimeStatus::Standard {
            return None;
        }
        let start = self.datetime?;
        let end = self
            .end_datetime
            .unwrap_or(start + Duration::minutes(DEFAULT_DURATION_MINUTES));
        Some((start, end))
    }
}

#[derive(Deserialize)]
pub struct LayoutRequest {
    pub date: NaiveDate,
    /// IANA zone; the server's zone when absent
    pub timezone: Option<String>,
    /// The server's configured mode when absent
    pub overlap: Option<OverlapMode>,
    pub events: Vec<LayoutItem>,
}

#[derive(Serialize)]
pub struct LaneEntry {
    pub id: String,
    pub lane: usize,
    pub start_slot: usize,
    pub end_slot: usize,
}

#[derive(Serialize)]
pub struct LayoutResponse {
    pub lanes: Vec<Vec<LaneEntry>>,
    pub max_lane: Option<usize>,
    /// Ids of events with no place on the time grid
    pub skipped: Vec<String>,
}

/// POST /layout/day
async fn layout_day(
    State(state): State<AppState>,
    Json(req): Json<LayoutRequest>,
) -> Result<Json<LayoutResponse>, AppError> {
    let daybook = state.daybook();
    let tz = match req.timezone.as_deref() {
        Some(name) => name
            .parse::<Tz>()
            .map_err(|_| DaybookError::validation(format!("Unknown time zone '{}'", name)))?,
        None => daybook.tz(),
    };
    let mode = req.overlap.unwrap_or(daybook.config().overlap);

    let layout = pack_day(&req.events, req.date, &tz, mode);

    Ok(Json(LayoutResponse {
        lanes: layout
            .lanes
            .iter()
            .map(|lane| {
                lane.iter()
                    .map(|p| LaneEntry {
                        id: p.item.id.clone(),
                        lane: p.lane,
                        start_slot: p.slots.start,
                        end_slot: p.slots.end,
                    })
                    .collect()
            })
            .collect(),
        max_lane: layout.max_lane(),
        skipped: layout.skipped.iter().map(|item| item.id.clone()).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{send, test_app};
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    fn staggered(overlap: &str) -> Value {
        json!({
            "date": "2026-04-14",
            "timezone": "UTC",
            "overlap": overlap,
            "events": [
                { "id": "1", "datetime": "2026-04-14T09:00:00Z", "end_datetime": "2026-04-14T09:15:00Z" },
                { "id": "2", "datetime": "2026-04-14T09:10:00Z", "end_datetime": "2026-04-14T09:30:00Z" },
                { "id": "3", "datetime": "2026-04-14T09:20:00Z", "end_datetime": "2026-04-14T09:40:00Z" }
            ]
        })
    }

    fn lane_of(body: &Value, id: &str) -> Option<u64> {
        body["lanes"]
            .as_array()?
            .iter()
            .flat_map(|lane| lane.as_array().into_iter().flatten())
            .find(|entry| entry["id"] == id)
            .and_then(|entry| entry["lane"].as_u64())
    }

    #[tokio::test]
    async fn slot_mode_uses_a_third_lane() {
        let (_dir, app) = test_app();
        let (status, body) = send(&app, "POST", "/layout/day", Some(staggered("slot"))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(lane_of(&body, "1"), Some(0));
        assert_eq!(lane_of(&body, "2"), Some(1));
        assert_eq!(lane_of(&body, "3"), Some(2));
        assert_eq!(body["max_lane"], 2);
    }

    #[tokio::test]
    async fn continuous_mode_reuses_lane_zero() {
        let (_dir, app) = test_app();
        let (_, body) = send(&app, "POST", "/layout/day", Some(staggered("continuous"))).await;

        assert_eq!(lane_of(&body, "3"), Some(0));
        assert_eq!(body["max_lane"], 1);
    }

    #[tokio::test]
    async fn missing_start_is_skipped_not_rejected() {
        let (_dir, app) = test_app();
        let (status, body) = send(
            &app,
            "POST",
            "/layout/day",
            Some(json!({
                "date": "2026-04-14",
                "events": [
                    { "id": "no-start" },
                    { "id": "bucket", "datetime": "2026-04-14T12:00:00Z", "time_status": "NO_TIME" },
                    { "id": "ok", "datetime": "2026-04-14T08:00:00Z" }
                ]
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["skipped"], json!(["no-start", "bucket"]));
        assert_eq!(lane_of(&body, "ok"), Some(0));
        assert_eq!(body["lanes"][0][0]["start_slot"], 16);
        assert_eq!(body["lanes"][0][0]["end_slot"], 17);
    }
}
