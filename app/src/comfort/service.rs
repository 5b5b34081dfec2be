use std::collections::BTreeMap;

use crate::comfort::{
    ComfortResult, MarkerAccess, OverallComfort, RoomCounts, TrendPoint, UserMarker, ValidSubmission,
    aggregate_by_room, aggregate_overall, build_trend, count_by_room,
};
use crate::core::time::{DateTime, Duration};
use crate::t;

/// Everything the dashboard shows for one location and window.
#[derive(Debug, Clone, PartialEq)]
pub struct ComfortReport {
    pub overall: OverallComfort,
    pub trend: Vec<TrendPoint>,
    pub rooms: BTreeMap<String, ComfortResult>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RoomSummary {
    pub stats: RoomCounts,
    #[serde(flatten)]
    pub comfort: ComfortResult,
}

pub struct ComfortService<A> {
    access: A,
    default_window: Duration,
}

impl<A: MarkerAccess> ComfortService<A> {
    pub fn new(access: A, default_window: Duration) -> Self {
        Self { access, default_window }
    }

    pub fn default_window(&self) -> Duration {
        self.default_window
    }

    fn since(&self, window: Duration) -> DateTime {
        let now = t!(now);

        now.checked_sub(window)
            .or_else(|| {
                tracing::warn!(
                    "Window of {} exceeds the time range, using default of {}",
                    window,
                    self.default_window
                );
                now.checked_sub(self.default_window)
            })
            .unwrap_or(now)
    }

    #[tracing::instrument(skip(self))]
    pub async fn comfort_report(&self, location: &str, window: Duration) -> anyhow::Result<ComfortReport> {
        let events = self.access.markers_since(location, self.since(window)).await?;
        tracing::debug!("Aggregating {} markers for {}", events.len(), location);

        Ok(ComfortReport {
            overall: aggregate_overall(&events),
            trend: build_trend(&events),
            rooms: aggregate_by_room(&events),
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn room_summaries(&self, location: &str, window: Duration) -> anyhow::Result<BTreeMap<String, RoomSummary>> {
        let events = self.access.markers_since(location, self.since(window)).await?;

        Ok(count_by_room(&events)
            .into_iter()
            .map(|(room_id, stats)| {
                let comfort = stats.comfort();
                (room_id, RoomSummary { stats, comfort })
            })
            .collect())
    }

    #[tracing::instrument(skip_all, fields(location = %submission.location, markers = submission.markers.len()))]
    pub async fn submit_markers(&self, submission: ValidSubmission) -> anyhow::Result<u64> {
        if submission.markers.is_empty() {
            return Ok(0);
        }

        let stored = self
            .access
            .add_markers(&submission.user_id, &submission.location, &submission.markers)
            .await?;

        infrastructure::meter::add(
            "comfort_markers_submitted",
            stored,
            &[("location", submission.location.as_str())],
        );
        tracing::info!("Stored {} markers", stored);

        Ok(stored)
    }

    #[tracing::instrument(skip(self))]
    pub async fn user_markers(&self, location: &str, user_id: &str) -> anyhow::Result<Vec<UserMarker>> {
        self.access
            .user_markers_since(location, user_id, self.since(self.default_window))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comfort::adapter::memory::InMemoryMarkers;
    use crate::comfort::{ComfortLabel, MarkerType, NewMarker};
    use crate::core::time::FIXED_NOW;

    fn at(iso: &str) -> DateTime {
        DateTime::from_iso(iso).unwrap()
    }

    fn marker(room_id: &str, marker_type: MarkerType, iso: &str) -> NewMarker {
        NewMarker {
            room_id: room_id.to_string(),
            x: Some(1.0),
            y: Some(2.0),
            marker_type,
            timestamp: at(iso),
        }
    }

    fn service_with(rows: &[(&str, &str, NewMarker)]) -> ComfortService<InMemoryMarkers> {
        let access = InMemoryMarkers::default();
        for (user_id, location, marker) in rows {
            access.insert(user_id, location, marker.clone());
        }
        ComfortService::new(access, t!(3 hours))
    }

    #[tokio::test]
    async fn test_report_only_contains_markers_inside_window() {
        let service = service_with(&[
            ("u1", "lib-1", marker("A", MarkerType::Hot, "2025-03-10T11:30:00Z")),
            ("u2", "lib-1", marker("A", MarkerType::Warm, "2025-03-10T09:30:00Z")),
            ("u1", "lib-1", marker("B", MarkerType::Cold, "2025-03-10T08:59:00Z")),
            ("u1", "lib-2", marker("A", MarkerType::Cold, "2025-03-10T11:00:00Z")),
        ]);

        let report = FIXED_NOW
            .scope(at("2025-03-10T12:00:00Z"), service.comfort_report("lib-1", t!(3 hours)))
            .await
            .unwrap();

        assert_eq!(report.overall.total_submissions, 2);
        assert_eq!(report.overall.too_hot_percent, 100.0);
        assert_eq!(report.rooms.len(), 1);
        assert_eq!(report.rooms["A"].index, -0.75);
        assert_eq!(report.rooms["A"].label, ComfortLabel::TooHot);

        let labels: Vec<String> = report.trend.iter().map(TrendPoint::label).collect();
        assert_eq!(labels, vec!["09:00", "11:00"]);
    }

    #[tokio::test]
    async fn test_window_beyond_time_range_uses_default() {
        let service = service_with(&[
            ("u1", "lib-1", marker("A", MarkerType::Hot, "2025-03-10T11:30:00Z")),
            ("u2", "lib-1", marker("A", MarkerType::Cold, "2025-03-10T07:00:00Z")),
        ]);

        let report = FIXED_NOW
            .scope(
                at("2025-03-10T12:00:00Z"),
                service.comfort_report("lib-1", Duration::hours(3_000_000_000)),
            )
            .await
            .unwrap();

        assert_eq!(report.overall.total_submissions, 1);
    }

    #[tokio::test]
    async fn test_report_for_empty_location() {
        let service = service_with(&[]);

        let report = service.comfort_report("lib-1", t!(3 hours)).await.unwrap();

        assert_eq!(report.overall.total_submissions, 0);
        assert_eq!(report.overall.avg_comfort, 0.0);
        assert!(report.trend.is_empty());
        assert!(report.rooms.is_empty());
    }

    #[tokio::test]
    async fn test_wider_window_includes_older_markers() {
        let service = service_with(&[
            ("u1", "lib-1", marker("A", MarkerType::Hot, "2025-03-10T11:30:00Z")),
            ("u1", "lib-1", marker("B", MarkerType::Cold, "2025-03-10T06:00:00Z")),
        ]);

        let report = FIXED_NOW
            .scope(at("2025-03-10T12:00:00Z"), service.comfort_report("lib-1", t!(8 hours)))
            .await
            .unwrap();

        assert_eq!(report.overall.total_submissions, 2);
        assert_eq!(report.rooms.len(), 2);
    }

    #[tokio::test]
    async fn test_room_summaries_carry_counts() {
        let service = service_with(&[
            ("u1", "lib-1", marker("A", MarkerType::Hot, "2025-03-10T11:30:00Z")),
            ("u2", "lib-1", marker("A", MarkerType::Cold, "2025-03-10T11:40:00Z")),
            ("u3", "lib-1", marker("A", MarkerType::Cold, "2025-03-10T11:50:00Z")),
        ]);

        let summaries = FIXED_NOW
            .scope(at("2025-03-10T12:00:00Z"), service.room_summaries("lib-1", t!(3 hours)))
            .await
            .unwrap();

        let room = &summaries["A"];
        assert_eq!(room.stats.total(), 3);
        assert_eq!(room.stats.count(MarkerType::Cold), 2);
        assert_eq!(room.comfort.index, 0.33);
        assert_eq!(room.comfort.label, ComfortLabel::Cool);
    }

    #[tokio::test]
    async fn test_submitted_markers_are_readable_by_user() {
        let service = service_with(&[]);
        let now = at("2025-03-10T12:00:00Z");

        let stored = FIXED_NOW
            .scope(
                now,
                service.submit_markers(ValidSubmission {
                    user_id: "u1".to_string(),
                    location: "lib-1".to_string(),
                    markers: vec![
                        marker("A", MarkerType::Ideal, "2025-03-10T11:59:00Z"),
                        marker("B", MarkerType::Cool, "2025-03-10T11:58:00Z"),
                    ],
                }),
            )
            .await
            .unwrap();

        let own = FIXED_NOW.scope(now, service.user_markers("lib-1", "u1")).await.unwrap();
        let others = FIXED_NOW.scope(now, service.user_markers("lib-1", "u2")).await.unwrap();

        assert_eq!(stored, 2);
        assert_eq!(own.len(), 2);
        assert!(others.is_empty());
    }

    #[tokio::test]
    async fn test_empty_submission_stores_nothing() {
        let service = service_with(&[]);

        let stored = service
            .submit_markers(ValidSubmission {
                user_id: "u1".to_string(),
                location: "lib-1".to_string(),
                markers: vec![],
            })
            .await
            .unwrap();

        assert_eq!(stored, 0);
    }
}
