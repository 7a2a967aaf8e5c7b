//! Per-journey derived metrics.
//!
//! Everything here is pure: the inputs are the primary values a user types in
//! (distance, mpg, time driven, cost per litre) plus the owner's vehicle
//! profile, the outputs are the fields stored next to them.
//!
//! # Examples
//!
//! ```rust
//! use engine::metrics::{derive, GallonUnit, PrimaryInputs, TimeUnit, VehicleProfile};
//!
//! let inputs = PrimaryInputs { distance: 60.0, mpg: 30.0, time_driven: 60.0, cost_pl: 1.5 };
//! let profile = VehicleProfile { gallon: GallonUnit::Uk, tank_volume: 64.0 };
//! let derived = derive(&inputs, &profile, TimeUnit::Minutes);
//! assert_eq!(derived.fuel_used_l, 9.09);
//! assert_eq!(derived.avg_speed, 60.0);
//! ```

use serde::{Deserialize, Serialize};

/// Litres in a US gallon, as used by the journey calculations.
pub const US_GALLON_LITRES: f64 = 3.79541;
/// Litres in an imperial (UK) gallon.
pub const UK_GALLON_LITRES: f64 = 4.54609;

/// Gallon unit the user's mpg figures are expressed in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GallonUnit {
    #[default]
    #[serde(rename = "UK")]
    Uk,
    #[serde(rename = "US")]
    Us,
}

impl GallonUnit {
    pub fn litres(self) -> f64 {
        match self {
            Self::Uk => UK_GALLON_LITRES,
            Self::Us => US_GALLON_LITRES,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uk => "UK",
            Self::Us => "US",
        }
    }

    /// Parse a stored value, anything other than `US` reads as UK.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("us") => Self::Us,
            _ => Self::Uk,
        }
    }
}

/// Unit of the `timeDriven` input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimeUnit {
    #[default]
    Minutes,
    Hours,
}

/// Values entered by the user for a single journey.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PrimaryInputs {
    pub distance: f64,
    pub mpg: f64,
    pub time_driven: f64,
    pub cost_pl: f64,
}

impl PrimaryInputs {
    /// Apply the storage rounding policy to the primary values.
    #[must_use]
    pub fn rounded(self) -> Self {
        Self {
            distance: round(self.distance, 2),
            mpg: round(self.mpg, 2),
            time_driven: round(self.time_driven, 2),
            cost_pl: round(self.cost_pl, 3),
        }
    }
}

/// The owner's vehicle settings the derived values depend on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VehicleProfile {
    pub gallon: GallonUnit,
    /// Tank capacity in litres.
    pub tank_volume: f64,
}

/// Fields computed from [`PrimaryInputs`] at write time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetrics {
    pub avg_speed: f64,
    pub fuel_used_l: f64,
    pub cost_per_mile: f64,
    pub total_cost: f64,
    pub perc_of_tank: f64,
}

/// Round to `dp` decimal places; NaN and infinities become 0.
pub fn round(value: f64, dp: u32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(dp as i32);
    let rounded = (value * factor).round() / factor;
    if rounded.is_finite() { rounded } else { 0.0 }
}

/// Miles per litre, falling back to 1 when mpg is not positive.
pub fn miles_per_litre(mpg: f64, gallon: GallonUnit) -> f64 {
    if mpg > 0.0 { mpg / gallon.litres() } else { 1.0 }
}

/// Hours driven, never 0 so the speed division stays defined.
fn hours_driven(time_driven: f64, unit: TimeUnit) -> f64 {
    let hours = match unit {
        TimeUnit::Minutes => time_driven / 60.0,
        TimeUnit::Hours => time_driven,
    };
    if hours > 0.0 { hours } else { 1.0 }
}

/// Compute the derived journey fields.
///
/// Callers are expected to pass already rounded inputs (see
/// [`PrimaryInputs::rounded`]) so the stored values can be recomputed exactly
/// from the stored primaries.
pub fn derive(inputs: &PrimaryInputs, profile: &VehicleProfile, unit: TimeUnit) -> DerivedMetrics {
    let mpl = miles_per_litre(inputs.mpg, profile.gallon);

    let avg_speed = inputs.distance / hours_driven(inputs.time_driven, unit);
    let fuel_used_l = inputs.distance / mpl;
    let cost_per_mile = inputs.cost_pl / mpl;
    let total_cost = cost_per_mile * inputs.distance;
    let perc_of_tank = if profile.tank_volume > 0.0 {
        fuel_used_l / profile.tank_volume
    } else {
        0.0
    };

    DerivedMetrics {
        avg_speed: round(avg_speed, 2),
        fuel_used_l: round(fuel_used_l, 2),
        cost_per_mile: round(cost_per_mile, 2),
        total_cost: round(total_cost, 2),
        perc_of_tank: round(perc_of_tank, 4),
    }
}
