use actix_web::{HttpResponse, web};

use super::{ApiResponse, ComfortApiError};
use crate::comfort::{ComfortClient, MarkerAccess, MarkerError, MarkerSubmission};
use crate::floor_plan;

pub(super) async fn submit_markers<A: MarkerAccess + 'static>(
    client: web::Data<ComfortClient<A>>,
    submission: web::Json<MarkerSubmission>,
) -> ApiResponse {
    let submission = submission.into_inner().validate()?;

    if floor_plan::find(&submission.location).is_none() {
        return Err(MarkerError::invalid(format!("unknown location '{}'", submission.location)).into());
    }

    client
        .submit_markers(submission)
        .await
        .map_err(ComfortApiError::DataAccessError)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "success" })))
}

pub(super) async fn get_markers<A: MarkerAccess + 'static>(
    client: web::Data<ComfortClient<A>>,
    path: web::Path<(String, String)>,
) -> ApiResponse {
    let (location, user_id) = path.into_inner();

    let markers = client
        .user_markers(&location, &user_id)
        .await
        .map_err(ComfortApiError::DataAccessError)?;

    tracing::debug!("Found {} recent markers of user {} in {}", markers.len(), user_id, location);

    Ok(HttpResponse::Ok().json(markers))
}
