//! Budget period resolution.
//!
//! A budget is a spending cap over a recurring window. This module resolves
//! when the current window started and sums the journey costs inside it; it
//! never persists anything.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::{EngineError, journeys::Journey, metrics::round};

/// Recurring budget window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetRange {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl BudgetRange {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Quarterly => "Quarterly",
            Self::Yearly => "Yearly",
        }
    }

    /// Unrecognized stored values behave as `Daily`.
    pub fn from_stored(value: Option<&str>) -> Self {
        value
            .and_then(|v| Self::try_from(v).ok())
            .unwrap_or_default()
    }
}

impl TryFrom<&str> for BudgetRange {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" => Ok(Self::Yearly),
            other => Err(EngineError::Validation(format!(
                "invalid budget range: {other}"
            ))),
        }
    }
}

/// One journey inside the current period, with the running total.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetPoint {
    pub date: DateTime<Utc>,
    pub cost: f64,
    pub cumulative: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetPeriod {
    pub period: BudgetRange,
    pub period_start: DateTime<Utc>,
    pub budget: f64,
    pub cost: f64,
    /// `budget - cost`; positive means under budget.
    pub over_under: f64,
    pub journeys: Vec<BudgetPoint>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    pub enabled: bool,
    #[serde(flatten)]
    pub period: Option<BudgetPeriod>,
}

impl BudgetStatus {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            period: None,
        }
    }
}

/// Map a reset day to a weekday: 1 = Monday .. 7 = Sunday, 0 is also Sunday.
/// Anything else means Monday.
fn reset_weekday(reset_day: i32) -> Weekday {
    match reset_day {
        0 | 7 => Weekday::Sun,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        6 => Weekday::Sat,
        _ => Weekday::Mon,
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map_or(28, |last| last.day())
}

/// The reset day of the given month, clamped to the month length.
fn clamped_day(year: i32, month: u32, reset_day: i32) -> Option<NaiveDate> {
    let day = (reset_day.max(1) as u32).min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

fn start_date(range: BudgetRange, reset_day: i32, today: NaiveDate) -> NaiveDate {
    let resolved = match range {
        BudgetRange::Daily => Some(today),
        BudgetRange::Weekly => {
            let target = i64::from(reset_weekday(reset_day).num_days_from_monday());
            let current = i64::from(today.weekday().num_days_from_monday());
            let diff = (current - target).rem_euclid(7);
            today.checked_sub_signed(TimeDelta::days(diff))
        }
        BudgetRange::Monthly => {
            match clamped_day(today.year(), today.month(), reset_day) {
                Some(start) if start <= today => Some(start),
                _ => {
                    let (year, month) = if today.month() == 1 {
                        (today.year() - 1, 12)
                    } else {
                        (today.year(), today.month() - 1)
                    };
                    clamped_day(year, month, reset_day)
                }
            }
        }
        BudgetRange::Quarterly => {
            NaiveDate::from_ymd_opt(today.year(), today.month0() / 3 * 3 + 1, 1)
        }
        BudgetRange::Yearly => NaiveDate::from_ymd_opt(today.year(), 1, 1),
    };
    resolved.unwrap_or(today)
}

/// Midnight of `date` in `tz`, as UTC.
pub(crate) fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&naive)
        .earliest()
        // midnight can fall inside a DST gap
        .or_else(|| {
            tz.from_local_datetime(&(naive + TimeDelta::hours(1)))
                .earliest()
        })
        .map_or_else(|| naive.and_utc(), |dt| dt.with_timezone(&Utc))
}

/// Start of the budget period containing `now`, computed in `now`'s zone.
pub fn period_start<Tz: TimeZone>(
    range: BudgetRange,
    reset_day: i32,
    now: &DateTime<Tz>,
) -> DateTime<Utc> {
    let today = now.date_naive();
    local_midnight(&now.timezone(), start_date(range, reset_day, today))
}

/// Sum the costs of `journeys` since `start` and build the cumulative series.
pub fn summarize(
    range: BudgetRange,
    budget: f64,
    start: DateTime<Utc>,
    journeys: &[Journey],
) -> BudgetPeriod {
    let mut in_period: Vec<&Journey> = journeys.iter().filter(|j| j.date_time >= start).collect();
    in_period.sort_by_key(|j| j.date_time);

    let mut cumulative = 0.0;
    let points: Vec<BudgetPoint> = in_period
        .into_iter()
        .map(|journey| {
            cumulative += journey.total_cost;
            BudgetPoint {
                date: journey.date_time,
                cost: journey.total_cost,
                cumulative: round(cumulative, 2),
            }
        })
        .collect();

    let cost = round(cumulative, 2);
    BudgetPeriod {
        period: range,
        period_start: start,
        budget,
        cost,
        over_under: round(budget - cost, 2),
        journeys: points,
    }
}
