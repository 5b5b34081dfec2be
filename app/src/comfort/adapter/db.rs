use anyhow::Context;

use crate::comfort::{MarkerAccess, MarkerError, MarkerEvent, MarkerType, NewMarker, UserMarker};
use crate::core::time::DateTime;

pub struct MarkerRepository {
    pool: sqlx::PgPool,
}

impl MarkerRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MarkerRow {
    room_id: Option<String>,
    #[sqlx(rename = "type")]
    marker_type: Option<String>,
    timestamp: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct UserMarkerRow {
    room_id: Option<String>,
    x: Option<f64>,
    y: Option<f64>,
    #[sqlx(rename = "type")]
    marker_type: Option<String>,
}

impl TryFrom<MarkerRow> for MarkerEvent {
    type Error = MarkerError;

    fn try_from(row: MarkerRow) -> Result<Self, Self::Error> {
        let marker_type = parse_type(row.marker_type.as_deref())?;
        MarkerEvent::new(row.room_id.unwrap_or_default(), marker_type, row.timestamp.into())
    }
}

impl TryFrom<UserMarkerRow> for UserMarker {
    type Error = MarkerError;

    fn try_from(row: UserMarkerRow) -> Result<Self, Self::Error> {
        let marker_type = parse_type(row.marker_type.as_deref())?;
        let room_id = row
            .room_id
            .filter(|r| !r.trim().is_empty())
            .ok_or_else(|| MarkerError::invalid("missing room_id"))?;

        Ok(UserMarker {
            room_id,
            x: row.x,
            y: row.y,
            marker_type,
        })
    }
}

fn parse_type(marker_type: Option<&str>) -> Result<MarkerType, MarkerError> {
    marker_type.ok_or_else(|| MarkerError::invalid("missing type"))?.parse()
}

/// Rows violating the marker contract are logged and left out instead of
/// failing the whole query.
fn skip_invalid<R, T>(rows: Vec<R>) -> Vec<T>
where
    R: std::fmt::Debug,
    T: TryFrom<R, Error = MarkerError>,
{
    rows.into_iter()
        .filter_map(|row| {
            let row_debug = format!("{row:?}");
            T::try_from(row)
                .inspect_err(|e| tracing::warn!("Skipping marker row {}: {}", row_debug, e))
                .ok()
        })
        .collect()
}

impl MarkerAccess for MarkerRepository {
    #[tracing::instrument(skip(self))]
    async fn markers_since(&self, location: &str, since: DateTime) -> anyhow::Result<Vec<MarkerEvent>> {
        let rows: Vec<MarkerRow> = sqlx::query_as(
            r#"SELECT room_id, type, timestamp
                FROM markers
                WHERE location = $1
                AND timestamp >= $2"#,
        )
        .bind(location)
        .bind(since.into_db())
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Error reading markers of {location}"))?;

        Ok(skip_invalid(rows))
    }

    #[tracing::instrument(skip(self))]
    async fn user_markers_since(
        &self,
        location: &str,
        user_id: &str,
        since: DateTime,
    ) -> anyhow::Result<Vec<UserMarker>> {
        let rows: Vec<UserMarkerRow> = sqlx::query_as(
            r#"SELECT room_id, x, y, type
                FROM markers
                WHERE location = $1
                AND user_id = $2
                AND timestamp >= $3"#,
        )
        .bind(location)
        .bind(user_id)
        .bind(since.into_db())
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Error reading markers of user {user_id} in {location}"))?;

        Ok(skip_invalid(rows))
    }

    #[tracing::instrument(skip(self, markers), fields(count = markers.len()))]
    async fn add_markers(&self, user_id: &str, location: &str, markers: &[NewMarker]) -> anyhow::Result<u64> {
        let mut tx = self.pool.begin().await.context("Error starting transaction")?;
        let mut stored = 0;

        for marker in markers {
            let result = sqlx::query(
                r#"INSERT INTO markers (id, user_id, location, room_id, x, y, type, timestamp)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"#,
            )
            .bind(uuid::Uuid::new_v4())
            .bind(user_id)
            .bind(location)
            .bind(&marker.room_id)
            .bind(marker.x)
            .bind(marker.y)
            .bind(marker.marker_type.as_str())
            .bind(marker.timestamp.into_db())
            .execute(&mut *tx)
            .await
            .context("Error adding marker")?;

            stored += result.rows_affected();
        }

        tx.commit().await.context("Error committing markers")?;

        Ok(stored)
    }
}
