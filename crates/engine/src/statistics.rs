//! Aggregates over a set of journeys.
//!
//! All functions are pure and return zeros for an empty set.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::{journeys::Journey, metrics::round};

/// Quick totals shown on the dashboard.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_miles: f64,
    pub total_time: f64,
    pub total_fuel: f64,
    pub total_cost: f64,
    pub avg_mpg: f64,
    pub longest_distance: f64,
    pub longest_time: f64,
    pub best_mpg: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullStats {
    pub journeys: u64,
    pub total_miles: f64,
    pub total_time: f64,
    pub total_fuel: f64,
    pub total_cost: f64,
    pub avg_mpg: f64,
    pub avg_speed: f64,
    pub avg_fuel_price: f64,
    pub avg_temp: f64,
    pub avg_time_driven: f64,
    pub avg_miles_per_tank: f64,
    pub avg_cost_per_day: f64,
    pub avg_cost_per_mile: f64,
}

/// Total cost over trailing windows ending at "now". Windows overlap.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostWindows {
    pub seven: f64,
    pub fourteen: f64,
    pub twenty_eight: f64,
    pub ninety: f64,
    pub six_month: f64,
    pub three_six_five: f64,
}

/// Optional bounds of the range a statistics request covers.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| at >= start) && self.end.is_none_or(|end| at <= end)
    }
}

fn mean(total: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { total / count as f64 }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

pub fn summary(journeys: &[Journey]) -> Summary {
    if journeys.is_empty() {
        return Summary::default();
    }

    let mut summary = Summary::default();
    let mut mpg_total = 0.0;
    for journey in journeys {
        summary.total_miles += journey.distance;
        summary.total_time += journey.time_driven;
        summary.total_fuel += journey.fuel_used_l;
        summary.total_cost += journey.total_cost;
        mpg_total += journey.mpg;
        summary.longest_distance = summary.longest_distance.max(journey.distance);
        summary.longest_time = summary.longest_time.max(journey.time_driven);
        summary.best_mpg = summary.best_mpg.max(journey.mpg);
    }

    Summary {
        total_miles: round(summary.total_miles, 2),
        total_time: round(summary.total_time, 2),
        total_fuel: round(summary.total_fuel, 2),
        total_cost: round(summary.total_cost, 2),
        avg_mpg: round(mean(mpg_total, journeys.len()), 2),
        ..summary
    }
}

/// Full statistics for `journeys`, which the caller has already filtered to
/// `range`. The bounds are still needed for the per-day average.
pub fn full_stats(journeys: &[Journey], range: DateRange, tank_volume: f64) -> FullStats {
    if journeys.is_empty() {
        return FullStats::default();
    }

    let count = journeys.len();
    let sum = |field: fn(&Journey) -> f64| journeys.iter().map(field).sum::<f64>();

    let total_miles = sum(|j| j.distance);
    let total_time = sum(|j| j.time_driven);
    let total_fuel = sum(|j| j.fuel_used_l);
    let total_cost = sum(|j| j.total_cost);

    let first = journeys.iter().map(|j| j.date_time).min();
    let last = journeys.iter().map(|j| j.date_time).max();
    let span = match (range.start.or(first), range.end.or(last)) {
        (Some(from), Some(to)) => to - from,
        _ => TimeDelta::zero(),
    };
    let days = (span.num_seconds() as f64 / 86_400.0).ceil().max(1.0);

    FullStats {
        journeys: count as u64,
        total_miles: round(total_miles, 2),
        total_time: round(total_time, 2),
        total_fuel: round(total_fuel, 2),
        total_cost: round(total_cost, 2),
        avg_mpg: round(mean(sum(|j| j.mpg), count), 2),
        avg_speed: round(mean(sum(|j| j.avg_speed), count), 2),
        avg_fuel_price: round(mean(sum(|j| j.cost_pl), count), 3),
        avg_temp: round(mean(sum(|j| j.temp), count), 1),
        avg_time_driven: round(mean(total_time, count), 2),
        avg_miles_per_tank: round(ratio(total_miles, total_fuel) * tank_volume, 2),
        avg_cost_per_day: round(total_cost / days, 2),
        avg_cost_per_mile: round(ratio(total_cost, total_miles), 2),
    }
}

pub fn cost_windows(journeys: &[Journey], now: DateTime<Utc>) -> CostWindows {
    let since = |days: i64| {
        let from = now - TimeDelta::days(days);
        round(
            journeys
                .iter()
                .filter(|j| j.date_time >= from)
                .map(|j| j.total_cost)
                .sum(),
            2,
        )
    };

    CostWindows {
        seven: since(7),
        fourteen: since(14),
        twenty_eight: since(28),
        ninety: since(90),
        six_month: since(180),
        three_six_five: since(365),
    }
}
