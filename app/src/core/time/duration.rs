#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Duration {
    #[serde(with = "duration_format")]
    pub(super) delegate: chrono::Duration,
}

impl Duration {
    pub(super) fn new(delegate: chrono::Duration) -> Self {
        Self { delegate }
    }

    pub fn hours(hours: i64) -> Self {
        Self::new(chrono::Duration::hours(hours))
    }

    pub fn minutes(minutes: i64) -> Self {
        Self::new(chrono::Duration::minutes(minutes))
    }

    pub fn seconds(seconds: i64) -> Self {
        Self::new(chrono::Duration::seconds(seconds))
    }

    pub fn as_minutes(&self) -> i64 {
        self.delegate.num_minutes()
    }

    pub fn as_hours(&self) -> i64 {
        self.delegate.num_hours()
    }
}

impl std::ops::Add<Duration> for Duration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Self::Output {
        Self::new(self.delegate + rhs.delegate)
    }
}

impl std::fmt::Display for Duration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", from_chrono_duration(&self.delegate))
    }
}

mod duration_format {
    use iso8601_duration::Duration as Iso8601Duration;
    use serde::{Deserializer, Serializer, de::Visitor};

    pub fn serialize<S>(duration: &chrono::TimeDelta, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::from_chrono_duration(duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<chrono::Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DurationVisitor;

        impl Visitor<'_> for DurationVisitor {
            type Value = chrono::TimeDelta;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("a string representing an ISO 8601 duration (e.g., PT3H)")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                let iso_duration = Iso8601Duration::parse(value)
                    .map_err(|e| E::custom(format!("Error parsing {value} to duration: {e:?}")))?;

                iso_duration.to_chrono().ok_or_else(|| {
                    E::custom(format!(
                        "Duration too long. Must not contain years and/or months. Received {value}"
                    ))
                })
            }
        }

        deserializer.deserialize_str(DurationVisitor)
    }
}

fn from_chrono_duration(duration: &chrono::Duration) -> iso8601_duration::Duration {
    let days = duration.num_days();
    let seconds = duration.num_seconds() - days * 86400;
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let seconds = seconds % 60;

    iso8601_duration::Duration::new(0.0, 0.0, days as f32, hours as f32, minutes as f32, seconds as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::t;

    #[test]
    fn test_serialize_duration() {
        let duration = t!(3 hours) + t!(30 minutes);
        let serialized = serde_json::to_string(&duration).unwrap();
        assert_eq!(serialized, r#""PT3H30M""#);
    }

    #[test]
    fn test_deserialize_duration() {
        let duration = serde_json::from_str::<Duration>(r#""PT3H""#).unwrap();
        assert_eq!(duration, t!(3 hours));
    }

    #[test]
    fn test_deserialize_rejects_months() {
        assert!(serde_json::from_str::<Duration>(r#""P1M""#).is_err());
    }
}
