//! Client-side admission control
//!
//! Every submission passes through [`validate`] before any network call is
//! made. The checks run in a fixed order and the first failure wins: an
//! oversized or out-of-window request never reaches the processing backend.
//!
//! Validation is pure. It takes the current date as an argument rather than
//! reading the clock, so identical inputs always produce the same verdict.

mod cadence;

pub use cadence::{plan_intervals, sample_count};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aoi::Polygon;

/// Default maximum polygon area accepted for processing, in km².
pub const DEFAULT_MAX_AREA_SQ_KM: f64 = 25.0;

/// Default maximum length of a requested date range, in days.
pub const DEFAULT_MAX_DURATION_DAYS: i64 = 365;

/// Default maximum number of samples a single request may plan.
pub const DEFAULT_MAX_SAMPLES: usize = 50;

/// Sentinel-2A launch date; no imagery exists before this.
pub fn default_mission_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2015, 6, 23).expect("valid mission start date")
}

/// An inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// First sampled date.
    pub start: NaiveDate,
    /// Last sampled date.
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range; validity (`start <= end`) is checked at admission
    /// time, not here.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Inclusive length of the range in days.
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Sampling cadence requested from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// One sample per 7-day window.
    Weekly,
    /// One sample per calendar month.
    Monthly,
}

impl Frequency {
    /// The wire-format name of this cadence.
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
        }
    }
}

impl std::str::FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            other => Err(format!(
                "unsupported frequency '{}', expected 'weekly' or 'monthly'",
                other
            )),
        }
    }
}

/// Immutable parameters of one submission attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestParams {
    /// The drawn area of interest.
    pub polygon: Polygon,
    /// Requested acquisition window.
    pub range: DateRange,
    /// Requested sampling cadence.
    pub frequency: Frequency,
}

/// Limits applied by admission control.
#[derive(Debug, Clone)]
pub struct AdmissionConfig {
    /// Maximum polygon area in km².
    pub max_area_sq_km: f64,
    /// Earliest date with imagery available.
    pub mission_start: NaiveDate,
    /// Maximum requested range length in days.
    pub max_duration_days: i64,
    /// Maximum planned sample count.
    pub max_samples: usize,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            max_area_sq_km: DEFAULT_MAX_AREA_SQ_KM,
            mission_start: default_mission_start(),
            max_duration_days: DEFAULT_MAX_DURATION_DAYS,
            max_samples: DEFAULT_MAX_SAMPLES,
        }
    }
}

impl AdmissionConfig {
    /// Set the maximum polygon area.
    pub fn with_max_area_sq_km(mut self, max: f64) -> Self {
        self.max_area_sq_km = max;
        self
    }

    /// Set the earliest acceptable start date.
    pub fn with_mission_start(mut self, date: NaiveDate) -> Self {
        self.mission_start = date;
        self
    }
}

/// Reason a submission was refused without contacting the backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("no polygon drawn")]
    NoPolygon,

    #[error("polygon area {estimated_sq_km:.2} km² exceeds the maximum of {max_sq_km:.2} km²")]
    AreaTooLarge {
        /// Estimated area, echoed back for display.
        estimated_sq_km: f64,
        max_sq_km: f64,
    },

    #[error("start date must not be after end date")]
    InvalidDateOrder,

    #[error("start date {start} is before data availability ({mission_start})")]
    StartBeforeMission {
        start: NaiveDate,
        mission_start: NaiveDate,
    },

    #[error("end date {end} is in the future")]
    EndInFuture { end: NaiveDate },

    #[error("date range spans {days} days, the maximum is {max_days}")]
    RangeTooLong { days: i64, max_days: i64 },

    #[error("request plans {count} samples, the maximum is {max}; shorten the range or switch cadence")]
    TooManySamples { count: usize, max: usize },
}

/// Outcome of admission control.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// All checks passed; the area estimate is echoed for display.
    Accepted {
        /// Estimated polygon area in km².
        estimated_sq_km: f64,
    },
    /// A check failed; the first failing check wins.
    Rejected(Rejection),
}

impl Verdict {
    /// Whether the submission may proceed to the backend.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted { .. })
    }
}

/// Runs the ordered admission checks for one submission attempt.
///
/// # Arguments
///
/// * `polygon` - The drawn ring, if any
/// * `range` - Requested date range
/// * `frequency` - Requested cadence
/// * `today` - The caller's snapshot of the current date
/// * `config` - Configured limits
///
/// Checks short-circuit: geometry first (presence, then area), then date
/// ordering, the acquisition window, and finally the range-size limits.
/// Boundary dates are inclusive on both ends.
pub fn validate(
    polygon: Option<&Polygon>,
    range: DateRange,
    frequency: Frequency,
    today: NaiveDate,
    config: &AdmissionConfig,
) -> Verdict {
    let polygon = match polygon {
        Some(p) if p.is_ring() => p,
        _ => return Verdict::Rejected(Rejection::NoPolygon),
    };

    let estimated_sq_km = polygon.area_sq_km();
    if estimated_sq_km > config.max_area_sq_km {
        return Verdict::Rejected(Rejection::AreaTooLarge {
            estimated_sq_km,
            max_sq_km: config.max_area_sq_km,
        });
    }

    if range.start > range.end {
        return Verdict::Rejected(Rejection::InvalidDateOrder);
    }

    if range.start < config.mission_start {
        return Verdict::Rejected(Rejection::StartBeforeMission {
            start: range.start,
            mission_start: config.mission_start,
        });
    }

    if range.end > today {
        return Verdict::Rejected(Rejection::EndInFuture { end: range.end });
    }

    let days = range.duration_days();
    if days > config.max_duration_days {
        return Verdict::Rejected(Rejection::RangeTooLong {
            days,
            max_days: config.max_duration_days,
        });
    }

    let count = sample_count(&range, frequency);
    if count > config.max_samples {
        return Verdict::Rejected(Rejection::TooManySamples {
            count,
            max: config.max_samples,
        });
    }

    Verdict::Accepted { estimated_sq_km }
}
