use std::sync::Mutex;

use crate::comfort::{MarkerAccess, MarkerEvent, NewMarker, UserMarker};
use crate::core::time::DateTime;

struct StoredMarker {
    user_id: String,
    location: String,
    marker: NewMarker,
}

/// Stand-in for the marker table.
#[derive(Default)]
pub struct InMemoryMarkers {
    rows: Mutex<Vec<StoredMarker>>,
}

impl InMemoryMarkers {
    pub fn insert(&self, user_id: &str, location: &str, marker: NewMarker) {
        self.rows.lock().unwrap().push(StoredMarker {
            user_id: user_id.to_string(),
            location: location.to_string(),
            marker,
        });
    }
}

impl MarkerAccess for InMemoryMarkers {
    async fn markers_since(&self, location: &str, since: DateTime) -> anyhow::Result<Vec<MarkerEvent>> {
        let rows = self.rows.lock().unwrap();

        Ok(rows
            .iter()
            .filter(|row| row.location == location && row.marker.timestamp >= since)
            .map(|row| MarkerEvent {
                room_id: row.marker.room_id.clone(),
                marker_type: row.marker.marker_type,
                timestamp: row.marker.timestamp,
            })
            .collect())
    }

    async fn user_markers_since(
        &self,
        location: &str,
        user_id: &str,
        since: DateTime,
    ) -> anyhow::Result<Vec<UserMarker>> {
        let rows = self.rows.lock().unwrap();

        Ok(rows
            .iter()
            .filter(|row| row.location == location && row.user_id == user_id && row.marker.timestamp >= since)
            .map(|row| UserMarker {
                room_id: row.marker.room_id.clone(),
                x: row.marker.x,
                y: row.marker.y,
                marker_type: row.marker.marker_type,
            })
            .collect())
    }

    async fn add_markers(&self, user_id: &str, location: &str, markers: &[NewMarker]) -> anyhow::Result<u64> {
        for marker in markers {
            self.insert(user_id, location, marker.clone());
        }
        Ok(markers.len() as u64)
    }
}
