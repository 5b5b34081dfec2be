use std::collections::BTreeMap;

use actix_web::{
    HttpResponse,
    web::{self, Query},
};

use super::{ApiResponse, ComfortApiError, WindowQuery, csv_response, find_floor_plan};
use crate::comfort::{ColorLabel, ComfortClient, MarkerAccess, RoomSummary, color_label_for};
use crate::core::time::DateTime;
use crate::floor_plan::RoomOutline;

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ComfortDataResponse {
    avg_comfort: f64,
    too_hot: f64,
    too_cold: f64,
    total_submissions: usize,
    trend: TrendSeries,
    rooms: BTreeMap<String, ColorLabel>,
}

#[derive(Debug, serde::Serialize)]
struct TrendSeries {
    labels: Vec<String>,
    values: Vec<f64>,
}

pub(super) async fn comfort_data<A: MarkerAccess + 'static>(
    client: web::Data<ComfortClient<A>>,
    location: web::Path<String>,
    query: Query<WindowQuery>,
) -> ApiResponse {
    let plan = find_floor_plan(&location)?;
    let window = query.window(client.default_window());

    let report = client
        .comfort_report(plan.id, window)
        .await
        .map_err(ComfortApiError::DataAccessError)?;

    let response = ComfortDataResponse {
        avg_comfort: report.overall.avg_comfort,
        too_hot: report.overall.too_hot_percent,
        too_cold: report.overall.too_cold_percent,
        total_submissions: report.overall.total_submissions,
        trend: TrendSeries {
            labels: report.trend.iter().map(|p| p.label()).collect(),
            values: report.trend.iter().map(|p| p.average_index).collect(),
        },
        rooms: report
            .rooms
            .iter()
            .map(|(room_id, comfort)| (room_id.clone(), color_label_for(comfort)))
            .collect(),
    };

    Ok(HttpResponse::Ok().json(response))
}

pub(super) async fn trend_csv<A: MarkerAccess + 'static>(
    client: web::Data<ComfortClient<A>>,
    location: web::Path<String>,
    query: Query<WindowQuery>,
) -> ApiResponse {
    #[derive(serde::Serialize)]
    struct Row {
        timestamp: DateTime,
        value: f64,
    }

    let plan = find_floor_plan(&location)?;
    let window = query.window(client.default_window());

    let report = client
        .comfort_report(plan.id, window)
        .await
        .map_err(ComfortApiError::DataAccessError)?;

    csv_response(report.trend.iter().map(|p| Row {
        timestamp: p.hour_bucket,
        value: p.average_index,
    }))
}

#[derive(Debug, serde::Serialize)]
struct DashboardResponse {
    location: &'static str,
    title: &'static str,
    image: &'static str,
    rooms: &'static [RoomOutline],
    comfort_data: BTreeMap<String, RoomSummary>,
}

pub(super) async fn room_dashboard<A: MarkerAccess + 'static>(
    client: web::Data<ComfortClient<A>>,
    location: web::Path<String>,
    query: Query<WindowQuery>,
) -> ApiResponse {
    let plan = find_floor_plan(&location)?;
    tracing::info!("Dashboard requested for location {}", plan.id);

    let comfort_data = client
        .room_summaries(plan.id, query.window(client.default_window()))
        .await
        .map_err(ComfortApiError::DataAccessError)?;

    Ok(HttpResponse::Ok().json(DashboardResponse {
        location: plan.id,
        title: plan.title,
        image: plan.image,
        rooms: plan.rooms,
        comfort_data,
    }))
}

#[derive(Debug, serde::Serialize)]
struct FloorMapResponse {
    location: &'static str,
    title: &'static str,
    image: &'static str,
    form_url: &'static str,
    rooms: &'static [RoomOutline],
}

pub(super) async fn floor_map(location: web::Path<String>) -> ApiResponse {
    let plan = find_floor_plan(&location)?;

    Ok(HttpResponse::Ok().json(FloorMapResponse {
        location: plan.id,
        title: plan.title,
        image: plan.image,
        form_url: plan.form_url,
        rooms: plan.rooms,
    }))
}
