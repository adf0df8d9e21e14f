//! Recorded navigation telemetry
//!
//! Comma-separated text: the first row names the columns, every following
//! row is one sample. Fields are looked up by column name, so column order
//! does not matter and unknown columns are ignored.
//!
//! Example header:
//! `time,dpt,mtw,awa,aws,cog,hdg,rot,sog,stw,pitch,yaw,roll,lng,lat,tws,twa,twd,vmg,dist,cum_dist`

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, FixedOffset};
use csv::StringRecord;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Columns every row must carry
pub const MANDATORY_COLUMNS: [&str; 9] = [
    "time", "hdg", "twa", "tws", "twd", "lat", "lng", "cum_dist", "cog",
];

/// One recorded sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationDataPoint {
    pub timestamp: DateTime<FixedOffset>,
    pub heading: f64,
    /// Frequently missing from recordings
    pub speed_through_water: Option<f64>,
    pub true_wind_angle: f64,
    pub true_wind_speed: f64,
    pub true_wind_direction: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub cumulative_distance: f64,
    pub course_over_ground: f64,
    pub speed_over_ground: Option<f64>,
    pub apparent_wind_speed: Option<f64>,
    pub apparent_wind_angle: Option<f64>,
}

/// What to do with a row that cannot be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Treat the row as the end of the data
    #[default]
    Strict,
    /// Log and skip the row
    Lenient,
}

/// Inclusive time filter; open-ended on either side when `None`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    pub start: Option<DateTime<FixedOffset>>,
    pub end: Option<DateTime<FixedOffset>>,
}

impl TimeRange {
    pub fn new(start: Option<DateTime<FixedOffset>>, end: Option<DateTime<FixedOffset>>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, timestamp: &DateTime<FixedOffset>) -> bool {
        if self.start.is_some_and(|start| *timestamp < start) {
            return false;
        }
        if self.end.is_some_and(|end| *timestamp > end) {
            return false;
        }
        true
    }
}

/// Parse an RFC3339 timestamp (used for CLI time filters)
pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value.trim()).map_err(|source| Error::InvalidTimestamp {
        value: value.to_string(),
        source,
    })
}

/// Telemetry loaded into memory, read through a cursor
#[derive(Debug, Clone)]
pub struct ReplayNavigationData {
    fields: HashMap<String, usize>,
    records: Vec<StringRecord>,
    range: TimeRange,
    mode: ParseMode,
    pos: usize,
}

enum RowOutcome {
    Point(NavigationDataPoint),
    OutOfRange,
    Malformed,
}

impl ReplayNavigationData {
    /// Load telemetry from any reader
    pub fn from_reader<R: Read>(mut reader: R, range: TimeRange, mode: ParseMode) -> Result<Self> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|e| Error::io("<telemetry>", e))?;
        Self::parse(&text, range, mode)
    }

    /// Load telemetry from a file
    pub fn open(path: impl AsRef<Path>, range: TimeRange, mode: ParseMode) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let data = Self::parse(&text, range, mode)?;
        log::info!("Loaded {} telemetry rows from {}", data.records.len(), path.display());
        Ok(data)
    }

    fn parse(text: &str, range: TimeRange, mode: ParseMode) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let fields: HashMap<String, usize> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(pos, key)| (key.to_string(), pos))
            .collect();
        if fields.is_empty() {
            return Err(Error::EmptyTelemetry);
        }

        if let Some(missing) = MANDATORY_COLUMNS.iter().find(|c| !fields.contains_key(**c)) {
            return Err(Error::MissingColumn(missing.to_string()));
        }

        // Unreadable rows stay in place, empty, so the parse mode decides
        let records: Vec<StringRecord> = reader
            .records()
            .map(|record| {
                record.unwrap_or_else(|e| {
                    log::warn!("unreadable telemetry row: {}", e);
                    StringRecord::new()
                })
            })
            .collect();
        if records.is_empty() {
            return Err(Error::EmptyTelemetry);
        }

        Ok(Self {
            fields,
            records,
            range,
            mode,
            pos: 0,
        })
    }

    /// Number of data rows, before filtering
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Next sample inside the time range, `None` once the data is exhausted
    /// (or, in strict mode, at the first malformed row)
    pub fn next_point(&mut self) -> Option<NavigationDataPoint> {
        let mut pos = self.pos;
        let point = self.read_from(&mut pos);
        self.pos = pos;
        point
    }

    /// Every sample inside the time range. Leaves the read cursor untouched.
    pub fn all_points(&self) -> Vec<NavigationDataPoint> {
        let mut pos = 0;
        std::iter::from_fn(|| self.read_from(&mut pos)).collect()
    }

    /// Rewind the read cursor to the first row
    pub fn rewind(&mut self) {
        self.pos = 0;
    }

    fn read_from(&self, pos: &mut usize) -> Option<NavigationDataPoint> {
        while let Some(record) = self.records.get(*pos) {
            *pos += 1;

            match self.parse_record(record) {
                RowOutcome::Point(point) => return Some(point),
                RowOutcome::OutOfRange => continue,
                RowOutcome::Malformed => match self.mode {
                    ParseMode::Strict => {
                        // Nothing after a bad row is trusted
                        *pos = self.records.len();
                        return None;
                    }
                    ParseMode::Lenient => continue,
                },
            }
        }
        None
    }

    fn parse_record(&self, record: &StringRecord) -> RowOutcome {
        let Some(raw_time) = self.raw_field(record, "time") else {
            log::warn!("row has no time field: {:?}", record);
            return RowOutcome::Malformed;
        };
        let timestamp = match DateTime::parse_from_rfc3339(raw_time) {
            Ok(t) => t,
            Err(e) => {
                log::warn!("error parsing time '{}': {}", raw_time, e);
                return RowOutcome::Malformed;
            }
        };

        if !self.range.contains(&timestamp) {
            return RowOutcome::OutOfRange;
        }

        let mandatory = || -> Option<NavigationDataPoint> {
            Some(NavigationDataPoint {
                timestamp,
                heading: self.number(record, "hdg")?,
                speed_through_water: self.optional_number(record, "stw"),
                true_wind_angle: self.number(record, "twa")?,
                true_wind_speed: self.number(record, "tws")?,
                true_wind_direction: self.number(record, "twd")?,
                latitude: self.number(record, "lat")?,
                longitude: self.number(record, "lng")?,
                cumulative_distance: self.number(record, "cum_dist")?,
                course_over_ground: self.number(record, "cog")?,
                speed_over_ground: self.optional_number(record, "sog"),
                apparent_wind_speed: self.optional_number(record, "aws"),
                apparent_wind_angle: self.optional_number(record, "awa"),
            })
        };

        match mandatory() {
            Some(point) => RowOutcome::Point(point),
            None => RowOutcome::Malformed,
        }
    }

    fn raw_field<'a>(&self, record: &'a StringRecord, key: &str) -> Option<&'a str> {
        record.get(*self.fields.get(key)?)
    }

    fn number(&self, record: &StringRecord, key: &str) -> Option<f64> {
        let Some(raw) = self.raw_field(record, key) else {
            log::warn!("field {} not found", key);
            return None;
        };
        match raw.parse::<f64>() {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("error parsing field {} '{}': {}", key, raw, e);
                None
            }
        }
    }

    fn optional_number(&self, record: &StringRecord, key: &str) -> Option<f64> {
        let raw = self.raw_field(record, key).filter(|raw| !raw.is_empty())?;
        match raw.parse::<f64>() {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("ignoring optional field {} '{}': {}", key, raw, e);
                None
            }
        }
    }
}

impl Iterator for ReplayNavigationData {
    type Item = NavigationDataPoint;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_point()
    }
}

/// Median of a set of values (mean of the middle pair for even counts)
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    if n % 2 == 0 {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    } else {
        Some(sorted[n / 2])
    }
}

/// Median true wind direction over a set of samples
pub fn median_wind_direction(points: &[NavigationDataPoint]) -> Option<f64> {
    let directions: Vec<f64> = points.iter().map(|p| p.true_wind_direction).collect();
    median(&directions)
}

/// Geographic bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

/// Bounding box of a set of samples
pub fn bounds(points: &[NavigationDataPoint]) -> Option<GeoBounds> {
    let first = points.first()?;
    let init = GeoBounds {
        min_lat: first.latitude,
        max_lat: first.latitude,
        min_lng: first.longitude,
        max_lng: first.longitude,
    };
    Some(points[1..].iter().fold(init, |b, p| GeoBounds {
        min_lat: b.min_lat.min(p.latitude),
        max_lat: b.max_lat.max(p.latitude),
        min_lng: b.min_lng.min(p.longitude),
        max_lng: b.max_lng.max(p.longitude),
    }))
}
