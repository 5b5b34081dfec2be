mod dashboard;
mod markers;

use actix_web::{HttpResponse, ResponseError, http::header, web};
use anyhow::Context;
use derive_more::derive::{Display, Error};

use crate::comfort::{ComfortClient, MarkerAccess, MarkerError};
use crate::core::time::Duration;
use crate::floor_plan::{self, FloorPlan};

pub fn routes<A: MarkerAccess + 'static>(client: ComfortClient<A>) -> Vec<actix_web::Scope> {
    let data = web::Data::new(client);

    vec![
        web::scope("/api")
            .route("/{location}/comfort-data", web::get().to(dashboard::comfort_data::<A>))
            .route("/{location}/trend.csv", web::get().to(dashboard::trend_csv::<A>))
            .app_data(data.clone()),
        web::scope("")
            .route("/submit-markers", web::post().to(markers::submit_markers::<A>))
            .route("/get-markers/{location}/{user_id}", web::get().to(markers::get_markers::<A>))
            .route("/{location}/dashboard", web::get().to(dashboard::room_dashboard::<A>))
            .route("/{location}", web::get().to(dashboard::floor_map))
            .app_data(data),
    ]
}

type ApiResponse = Result<HttpResponse, ComfortApiError>;

const MAX_WINDOW_HOURS: i64 = 24 * 366;

#[derive(Debug, Error, Display)]
enum ComfortApiError {
    #[display("Error accessing data")]
    DataAccessError(anyhow::Error),

    #[display("Internal error")]
    InternalError(anyhow::Error),

    #[display("{_0}")]
    InvalidEvent(MarkerError),

    #[display("Invalid location")]
    NotFound,
}

impl From<MarkerError> for ComfortApiError {
    fn from(e: MarkerError) -> Self {
        ComfortApiError::InvalidEvent(e)
    }
}

impl ResponseError for ComfortApiError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            ComfortApiError::NotFound => StatusCode::NOT_FOUND,
            ComfortApiError::InvalidEvent(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        tracing::warn!("ComfortApiError: {:?}", self);

        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": self.to_string() }))
    }
}

fn find_floor_plan(location: &str) -> Result<&'static FloorPlan, ComfortApiError> {
    floor_plan::find(location).ok_or(ComfortApiError::NotFound)
}

#[derive(Clone, Debug, serde::Deserialize)]
struct WindowQuery {
    hours: Option<String>,
}

impl WindowQuery {
    /// Falls back to `default` for missing, unparsable or out of range values.
    fn window(&self, default: Duration) -> Duration {
        let Some(hours) = self.hours.as_deref() else {
            return default;
        };

        match hours.trim().parse::<i64>() {
            Ok(h) if (1..=MAX_WINDOW_HOURS).contains(&h) => Duration::hours(h),
            _ => {
                tracing::debug!("Ignoring invalid window of {} hours", hours);
                default
            }
        }
    }
}

fn csv_response<S: serde::Serialize>(rows: impl IntoIterator<Item = S>) -> ApiResponse {
    let mut writer = csv::Writer::from_writer(vec![]);

    for row in rows {
        writer
            .serialize(row)
            .context("Error serializing row to CSV")
            .map_err(ComfortApiError::InternalError)?;
    }

    let csv = writer
        .into_inner()
        .context("Error creating CSV")
        .map_err(ComfortApiError::InternalError)?;

    Ok(HttpResponse::Ok()
        .append_header(header::ContentType(mime::TEXT_CSV))
        .body(csv))
}
