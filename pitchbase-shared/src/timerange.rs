use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum TimeRangeError {
    #[error("Invalid time, expected HH:MM: {0}")]
    Format(String),

    #[error("Range end must be after its start")]
    EndNotAfterStart,
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&t.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveTime::parse_from_str(&raw, "%H:%M").map_err(serde::de::Error::custom)
    }
}

/// A same-day time window, wire format `HH:MM` (24h) on both ends.
///
/// All slot and booking windows in the system are expressed with this type so
/// overlap semantics are defined exactly once: two ranges overlap when each
/// starts before the other ends. Touching ranges (10:00-11:00, 11:00-12:00)
/// do not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    #[serde(with = "hhmm")]
    start: NaiveTime,
    #[serde(with = "hhmm")]
    end: NaiveTime,
}

impl TimeRange {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, TimeRangeError> {
        if end <= start {
            return Err(TimeRangeError::EndNotAfterStart);
        }
        Ok(Self { start, end })
    }

    /// Parse a range from two `HH:MM` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, TimeRangeError> {
        let parse_one = |s: &str| {
            NaiveTime::parse_from_str(s, "%H:%M")
                .map_err(|_| TimeRangeError::Format(s.to_string()))
        };
        Self::new(parse_one(start)?, parse_one(end)?)
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Whole hours covered by the range, if it is hour-aligned in length.
    pub fn whole_hours(&self) -> Option<u32> {
        let minutes = self.duration_minutes();
        if minutes > 0 && minutes % 60 == 0 {
            Some((minutes / 60) as u32)
        } else {
            None
        }
    }

    // Minute-of-day accessors for storage backends that keep ranges as ints.
    pub fn start_minute(&self) -> i32 {
        (self.start.num_seconds_from_midnight() / 60) as i32
    }

    pub fn end_minute(&self) -> i32 {
        (self.end.num_seconds_from_midnight() / 60) as i32
    }

    pub fn from_minutes(start: i32, end: i32) -> Result<Self, TimeRangeError> {
        let to_time = |m: i32| {
            NaiveTime::from_hms_opt((m / 60) as u32, (m % 60) as u32, 0)
                .ok_or_else(|| TimeRangeError::Format(format!("minute {}", m)))
        };
        Self::new(to_time(start)?, to_time(end)?)
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let range = TimeRange::parse("18:00", "19:30").unwrap();
        assert_eq!(range.to_string(), "18:00-19:30");
        assert_eq!(range.duration_minutes(), 90);
        assert_eq!(range.whole_hours(), None);
    }

    #[test]
    fn test_rejects_inverted_range() {
        assert!(TimeRange::parse("19:00", "18:00").is_err());
        assert!(TimeRange::parse("18:00", "18:00").is_err());
    }

    #[test]
    fn test_rejects_malformed_time() {
        assert!(TimeRange::parse("25:00", "26:00").is_err());
        assert!(TimeRange::parse("6pm", "7pm").is_err());
    }

    #[test]
    fn test_overlap() {
        let evening = TimeRange::parse("18:00", "20:00").unwrap();
        let inside = TimeRange::parse("18:30", "19:00").unwrap();
        let before = TimeRange::parse("16:00", "18:00").unwrap();
        let straddle = TimeRange::parse("19:00", "21:00").unwrap();

        assert!(evening.overlaps(&inside));
        assert!(inside.overlaps(&evening));
        assert!(evening.overlaps(&straddle));
        // Touching at a boundary is not an overlap.
        assert!(!evening.overlaps(&before));
    }

    #[test]
    fn test_minute_round_trip() {
        let range = TimeRange::parse("06:15", "07:45").unwrap();
        let back = TimeRange::from_minutes(range.start_minute(), range.end_minute()).unwrap();
        assert_eq!(range, back);
    }

    #[test]
    fn test_serde_wire_format() {
        let range = TimeRange::parse("09:00", "11:00").unwrap();
        let json = serde_json::to_string(&range).unwrap();
        assert_eq!(json, r#"{"start":"09:00","end":"11:00"}"#);
        let parsed: TimeRange = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, range);
    }
}
