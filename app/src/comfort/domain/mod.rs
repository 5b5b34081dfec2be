mod aggregate;
mod display;

use std::{fmt, str::FromStr};

use derive_more::derive::{Display, Error};

use crate::core::time::DateTime;

pub use aggregate::{
    ComfortLabel, ComfortResult, OverallComfort, RoomCounts, TrendPoint, aggregate_by_room, aggregate_overall,
    build_trend, count_by_room,
};
pub use display::{ColorLabel, color_label_for};

#[derive(Debug, Display, Error)]
pub enum MarkerError {
    #[display("Invalid marker event: {reason}")]
    InvalidEvent { reason: String },
}

impl MarkerError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        MarkerError::InvalidEvent { reason: reason.into() }
    }
}

/// Thermal sensation reported by a user, from too hot to too cold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerType {
    Hot,
    Warm,
    Ideal,
    Cool,
    Cold,
}

impl MarkerType {
    pub fn variants() -> [MarkerType; 5] {
        [
            MarkerType::Hot,
            MarkerType::Warm,
            MarkerType::Ideal,
            MarkerType::Cool,
            MarkerType::Cold,
        ]
    }

    /// Contribution to the comfort index. Negative is too warm, positive too cold.
    pub fn weight(&self) -> f64 {
        match self {
            MarkerType::Hot => -1.0,
            MarkerType::Warm => -0.5,
            MarkerType::Ideal => 0.0,
            MarkerType::Cool => 0.5,
            MarkerType::Cold => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerType::Hot => "hot",
            MarkerType::Warm => "warm",
            MarkerType::Ideal => "ideal",
            MarkerType::Cool => "cool",
            MarkerType::Cold => "cold",
        }
    }

    pub fn is_warm_side(&self) -> bool {
        matches!(self, MarkerType::Hot | MarkerType::Warm)
    }

    pub fn is_cold_side(&self) -> bool {
        matches!(self, MarkerType::Cool | MarkerType::Cold)
    }
}

impl fmt::Display for MarkerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarkerType {
    type Err = MarkerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MarkerType::variants()
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| MarkerError::invalid(format!("unknown marker type '{s}'")))
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MarkerEvent {
    pub room_id: String,
    #[serde(rename = "type")]
    pub marker_type: MarkerType,
    pub timestamp: DateTime,
}

impl MarkerEvent {
    pub fn new(room_id: impl Into<String>, marker_type: MarkerType, timestamp: DateTime) -> Result<Self, MarkerError> {
        let room_id = room_id.into();

        if room_id.trim().is_empty() {
            return Err(MarkerError::invalid("missing room_id"));
        }

        Ok(Self {
            room_id,
            marker_type,
            timestamp,
        })
    }
}

/// A marker as placed by one user, returned so the floor map can redraw it.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct UserMarker {
    pub room_id: String,
    pub x: Option<f64>,
    pub y: Option<f64>,
    #[serde(rename = "type")]
    pub marker_type: MarkerType,
}

/// Payload posted by the floor map page. Fields are optional on the wire and
/// checked by [`MarkerSubmission::validate`].
#[derive(Debug, Clone, serde::Deserialize)]
pub struct MarkerSubmission {
    pub user_id: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub markers: Vec<SubmittedMarker>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct SubmittedMarker {
    pub room_id: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    #[serde(rename = "type")]
    pub marker_type: Option<String>,
    /// Milliseconds since the epoch, as produced by `Date.now()`.
    pub timestamp: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMarker {
    pub room_id: String,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub marker_type: MarkerType,
    pub timestamp: DateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidSubmission {
    pub user_id: String,
    pub location: String,
    pub markers: Vec<NewMarker>,
}

impl MarkerSubmission {
    /// Rejects the whole submission if any marker is malformed.
    pub fn validate(self) -> Result<ValidSubmission, MarkerError> {
        let user_id = non_blank(self.user_id).ok_or_else(|| MarkerError::invalid("missing user_id"))?;
        let location = non_blank(self.location).ok_or_else(|| MarkerError::invalid("missing location"))?;

        let markers = self
            .markers
            .into_iter()
            .enumerate()
            .map(|(pos, marker)| {
                marker.validate().map_err(|MarkerError::InvalidEvent { reason }| {
                    MarkerError::invalid(format!("marker {pos}: {reason}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ValidSubmission {
            user_id,
            location,
            markers,
        })
    }
}

impl SubmittedMarker {
    fn validate(self) -> Result<NewMarker, MarkerError> {
        let room_id = non_blank(self.room_id).ok_or_else(|| MarkerError::invalid("missing room_id"))?;
        let marker_type: MarkerType = self
            .marker_type
            .ok_or_else(|| MarkerError::invalid("missing type"))?
            .parse()?;

        let millis = self.timestamp.ok_or_else(|| MarkerError::invalid("missing timestamp"))?;
        let timestamp = Some(millis)
            .filter(|m| m.is_finite())
            .and_then(|m| DateTime::from_epoch_millis(m as i64))
            .ok_or_else(|| MarkerError::invalid(format!("timestamp {millis} out of range")))?;

        Ok(NewMarker {
            room_id,
            x: self.x,
            y: self.y,
            marker_type,
            timestamp,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
