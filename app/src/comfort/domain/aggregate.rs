use std::collections::BTreeMap;

use serde::ser::SerializeMap as _;

use crate::core::math::{ratio, round_to};
use crate::core::time::DateTime;

use super::{MarkerEvent, MarkerType};

/// Occurrences per marker type within one aggregation window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomCounts {
    counts: BTreeMap<MarkerType, usize>,
    total: usize,
}

impl RoomCounts {
    pub fn add(&mut self, marker_type: MarkerType) {
        *self.counts.entry(marker_type).or_default() += 1;
        self.total += 1;
    }

    pub fn count(&self, marker_type: MarkerType) -> usize {
        self.counts.get(&marker_type).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Weighted mean of all markers, `None` without any marker.
    pub fn comfort_index(&self) -> Option<f64> {
        let weighted: f64 = self
            .counts
            .iter()
            .map(|(marker_type, count)| marker_type.weight() * *count as f64)
            .sum();

        ratio(weighted, self.total)
    }

    pub fn comfort(&self) -> ComfortResult {
        match self.comfort_index() {
            Some(index) => ComfortResult::from_index(index),
            None => ComfortResult::no_data(),
        }
    }

    fn share_percent(&self, matches: impl Fn(&MarkerType) -> bool) -> f64 {
        let count: usize = self
            .counts
            .iter()
            .filter(|(marker_type, _)| matches(*marker_type))
            .map(|(_, count)| count)
            .sum();

        ratio(100.0 * count as f64, self.total)
            .map(|percent| round_to(percent, 1))
            .unwrap_or(0.0)
    }
}

impl FromIterator<MarkerType> for RoomCounts {
    fn from_iter<I: IntoIterator<Item = MarkerType>>(iter: I) -> Self {
        let mut counts = RoomCounts::default();
        for marker_type in iter {
            counts.add(marker_type);
        }
        counts
    }
}

//serialized like the dashboard expects it: present types plus "total"
impl serde::Serialize for RoomCounts {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len() + 1))?;
        for (marker_type, count) in &self.counts {
            map.serialize_entry(marker_type.as_str(), count)?;
        }
        map.serialize_entry("total", &self.total)?;
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum ComfortLabel {
    #[serde(rename = "Too Hot")]
    TooHot,
    Warm,
    Ideal,
    Cool,
    #[serde(rename = "Too Cold")]
    TooCold,
    #[serde(rename = "No Data")]
    NoData,
}

impl ComfortLabel {
    /// Bands with inclusive upper bounds.
    pub fn classify(index: f64) -> Self {
        if index <= -0.75 {
            ComfortLabel::TooHot
        } else if index <= -0.25 {
            ComfortLabel::Warm
        } else if index <= 0.25 {
            ComfortLabel::Ideal
        } else if index <= 0.75 {
            ComfortLabel::Cool
        } else {
            ComfortLabel::TooCold
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ComfortLabel::TooHot => "Too Hot",
            ComfortLabel::Warm => "Warm",
            ComfortLabel::Ideal => "Ideal",
            ComfortLabel::Cool => "Cool",
            ComfortLabel::TooCold => "Too Cold",
            ComfortLabel::NoData => "No Data",
        }
    }
}

impl std::fmt::Display for ComfortLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Comfort of a room. `index` is rounded to two decimals, the label is
/// derived from the unrounded value.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ComfortResult {
    pub index: f64,
    pub label: ComfortLabel,
}

impl ComfortResult {
    pub fn no_data() -> Self {
        Self {
            index: 0.0,
            label: ComfortLabel::NoData,
        }
    }

    fn from_index(index: f64) -> Self {
        Self {
            index: round_to(index, 2),
            label: ComfortLabel::classify(index),
        }
    }

    pub fn has_data(&self) -> bool {
        self.label != ComfortLabel::NoData
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverallComfort {
    pub avg_comfort: f64,
    pub too_hot_percent: f64,
    pub too_cold_percent: f64,
    pub total_submissions: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPoint {
    pub hour_bucket: DateTime,
    pub average_index: f64,
}

impl TrendPoint {
    pub fn label(&self) -> String {
        self.hour_bucket.format_hour_minute()
    }
}

pub fn count_by_room(events: &[MarkerEvent]) -> BTreeMap<String, RoomCounts> {
    let mut rooms: BTreeMap<String, RoomCounts> = BTreeMap::new();

    for event in events {
        rooms.entry(event.room_id.clone()).or_default().add(event.marker_type);
    }

    rooms
}

pub fn aggregate_by_room(events: &[MarkerEvent]) -> BTreeMap<String, ComfortResult> {
    count_by_room(events)
        .into_iter()
        .map(|(room_id, counts)| (room_id, counts.comfort()))
        .collect()
}

pub fn aggregate_overall(events: &[MarkerEvent]) -> OverallComfort {
    let counts: RoomCounts = events.iter().map(|e| e.marker_type).collect();

    let too_hot_percent = counts.share_percent(MarkerType::is_warm_side);
    //both shares rounding up must not push the sum above 100%
    let too_cold_percent = counts
        .share_percent(MarkerType::is_cold_side)
        .min(round_to(100.0 - too_hot_percent, 1));

    OverallComfort {
        avg_comfort: counts.comfort_index().unwrap_or(0.0),
        too_hot_percent,
        too_cold_percent,
        total_submissions: counts.total(),
    }
}

/// Average comfort per hour, oldest hour first. Input order does not matter.
pub fn build_trend(events: &[MarkerEvent]) -> Vec<TrendPoint> {
    let mut buckets: BTreeMap<DateTime, (f64, usize)> = BTreeMap::new();

    for event in events {
        let (sum, count) = buckets.entry(event.timestamp.truncate_to_hour()).or_default();
        *sum += event.marker_type.weight();
        *count += 1;
    }

    buckets
        .into_iter()
        .filter_map(|(hour_bucket, (sum, count))| {
            ratio(sum, count).map(|average_index| TrendPoint {
                hour_bucket,
                average_index,
            })
        })
        .collect()
}
