//! Shaping of workout records for the history and progress views.
//!
//! Everything here is a pure function over records already loaded for one
//! user. Nothing fails: optional filters that cannot be parsed impose no
//! constraint.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Serialize, Serializer};

use crate::models::{SetEntry, WorkoutRecord};

/// Calendar day a record belongs to, displayed as `YYYY-MM-DD`.
///
/// Days are taken in UTC, so ordering keys is the same as ordering their text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn of(instant: DateTime<Utc>) -> Self {
        Self(instant.date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Chart label, e.g. "Jan 5".
    pub fn short_label(&self) -> String {
        self.0.format("%b %-d").to_string()
    }

    /// Heading label, e.g. "January 1st, 2025".
    pub fn long_label(&self) -> String {
        let day = self.0.day();
        let suffix = match (day % 10, day % 100) {
            (_, 11..=13) => "th",
            (1, _) => "st",
            (2, _) => "nd",
            (3, _) => "rd",
            _ => "th",
        };
        format!(
            "{} {}{}, {}",
            self.0.format("%B"),
            day,
            suffix,
            self.0.year()
        )
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Optional constraints for the history view. `None` means unconstrained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    pub exercise: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl RecordFilter {
    /// Build a filter from raw form input.
    ///
    /// Bounds accept `YYYY-MM-DD` or RFC 3339. A bare date as lower bound means
    /// the start of that day, as upper bound the end of it. Blank or
    /// unparseable values are dropped.
    pub fn parse(exercise: Option<&str>, from: Option<&str>, to: Option<&str>) -> Self {
        Self {
            exercise: exercise
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
            from: from.and_then(|raw| parse_bound(raw, Bound::Lower)),
            to: to.and_then(|raw| parse_bound(raw, Bound::Upper)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.exercise.is_none() && self.from.is_none() && self.to.is_none()
    }

    pub fn matches(&self, record: &WorkoutRecord) -> bool {
        if let Some(exercise) = &self.exercise {
            if !record.sets.iter().any(|set| &set.exercise == exercise) {
                return false;
            }
        }
        if let Some(from) = self.from {
            if record.date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if record.date > to {
                return false;
            }
        }
        true
    }
}

#[derive(Clone, Copy)]
enum Bound {
    Lower,
    Upper,
}

fn parse_bound(raw: &str, bound: Bound) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let time = match bound {
            Bound::Lower => NaiveTime::from_hms_opt(0, 0, 0)?,
            Bound::Upper => NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)?,
        };
        return Some(date.and_time(time).and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|instant| instant.with_timezone(&Utc))
}

/// Records of one calendar day plus the volume lifted across all of them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayGroup {
    pub day: DayKey,
    pub records: Vec<WorkoutRecord>,
    pub total_volume: f64,
}

impl DayGroup {
    fn new(day: DayKey, records: Vec<WorkoutRecord>) -> Self {
        let total_volume = compute_volume(records.iter().flat_map(|record| &record.sets));
        Self {
            day,
            records,
            total_volume,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: DayKey,
    pub max_weight: f64,
}

/// Best weight per day for one exercise, ascending by day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseTimeSeries {
    pub exercise: String,
    pub points: Vec<SeriesPoint>,
}

impl ExerciseTimeSeries {
    pub fn chart_data(&self) -> ChartData {
        ChartData {
            exercise: self.exercise.clone(),
            labels: self.points.iter().map(|p| p.date.short_label()).collect(),
            values: self.points.iter().map(|p| p.max_weight).collect(),
        }
    }
}

/// Parallel label/value sequences handed to the chart renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub exercise: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Keep records matching `filter`, preserving their order.
pub fn filter_records(records: Vec<WorkoutRecord>, filter: &RecordFilter) -> Vec<WorkoutRecord> {
    if filter.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|record| filter.matches(record))
        .collect()
}

/// Partition records by calendar day, most recent day first.
///
/// Within a day, records keep the order they were given in.
pub fn group_by_day(records: Vec<WorkoutRecord>) -> Vec<DayGroup> {
    let mut days: BTreeMap<DayKey, Vec<WorkoutRecord>> = BTreeMap::new();
    for record in records {
        days.entry(DayKey::of(record.date)).or_default().push(record);
    }

    days.into_iter()
        .rev()
        .map(|(day, records)| DayGroup::new(day, records))
        .collect()
}

/// Per exercise, the maximum weight lifted on each day it was trained.
pub fn build_exercise_time_series(
    records: &[WorkoutRecord],
) -> BTreeMap<String, ExerciseTimeSeries> {
    let mut maxima: BTreeMap<&str, BTreeMap<DayKey, f64>> = BTreeMap::new();

    for record in records {
        let day = DayKey::of(record.date);
        for set in &record.sets {
            let best = maxima
                .entry(set.exercise.as_str())
                .or_default()
                .entry(day)
                .or_insert(set.weight);
            if set.weight > *best {
                *best = set.weight;
            }
        }
    }

    maxima
        .into_iter()
        .map(|(exercise, days)| {
            let series = ExerciseTimeSeries {
                exercise: exercise.to_string(),
                points: days
                    .into_iter()
                    .map(|(date, max_weight)| SeriesPoint { date, max_weight })
                    .collect(),
            };
            (exercise.to_string(), series)
        })
        .collect()
}

/// Sum of weight x reps. Empty input is 0.
pub fn compute_volume<'a>(sets: impl IntoIterator<Item = &'a SetEntry>) -> f64 {
    sets.into_iter().fold(0.0, |total, set| total + set.volume())
}
