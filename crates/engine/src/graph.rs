//! Graph data extraction: pick two journey fields and return sorted points.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{EngineError, journeys::Journey};

/// Logical axis a client can plot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphField {
    Date,
    Distance,
    TimeDriven,
    AvgSpeed,
    Mpg,
    Cost,
}

impl GraphField {
    /// Wire name and the journey column it reads.
    const TABLE: [(&'static str, GraphField, &'static str); 6] = [
        ("date", GraphField::Date, "dateTime"),
        ("distance", GraphField::Distance, "distance"),
        ("timeDriven", GraphField::TimeDriven, "timeDriven"),
        ("avgSpeed", GraphField::AvgSpeed, "avgSpeed"),
        ("mpg", GraphField::Mpg, "mpg"),
        ("cost", GraphField::Cost, "totalCost"),
    ];

    /// Name of the stored journey field this axis reads.
    pub fn column(self) -> &'static str {
        Self::TABLE
            .iter()
            .find(|(_, field, _)| *field == self)
            .map_or("", |(_, _, column)| column)
    }

    pub fn value(self, journey: &Journey) -> GraphValue {
        match self {
            Self::Date => GraphValue::Date(journey.date_time),
            Self::Distance => GraphValue::Number(journey.distance),
            Self::TimeDriven => GraphValue::Number(journey.time_driven),
            Self::AvgSpeed => GraphValue::Number(journey.avg_speed),
            Self::Mpg => GraphValue::Number(journey.mpg),
            Self::Cost => GraphValue::Number(journey.total_cost),
        }
    }
}

impl TryFrom<&str> for GraphField {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::TABLE
            .iter()
            .find(|(name, _, _)| *name == value)
            .map(|(_, field, _)| *field)
            .ok_or_else(|| EngineError::InvalidGraphField(value.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GraphValue {
    Date(DateTime<Utc>),
    Number(f64),
}

impl GraphValue {
    fn sort_key(&self) -> f64 {
        match self {
            Self::Date(at) => at.timestamp_millis() as f64,
            Self::Number(n) => *n,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphPoint {
    pub x: GraphValue,
    pub y: GraphValue,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    pub data: Vec<GraphPoint>,
}

/// Project `journeys` onto the two axes, ascending by x.
pub fn extract(journeys: &[Journey], x: GraphField, y: GraphField) -> GraphData {
    let mut data: Vec<GraphPoint> = journeys
        .iter()
        .map(|journey| GraphPoint {
            x: x.value(journey),
            y: y.value(journey),
        })
        .collect();
    data.sort_by(|a, b| a.x.sort_key().total_cmp(&b.x.sort_key()));
    GraphData { data }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone};

    use super::*;
    use crate::{
        journeys::Condition,
        metrics::{DerivedMetrics, PrimaryInputs},
    };

    fn journey(days: i64, distance: f64, cost: f64) -> Journey {
        let base = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
        Journey::new(
            "alice".to_string(),
            String::new(),
            base + TimeDelta::days(days),
            PrimaryInputs {
                distance,
                ..Default::default()
            },
            0.0,
            Condition::Dry,
            DerivedMetrics {
                total_cost: cost,
                ..Default::default()
            },
        )
    }

    #[test]
    fn field_names_map_to_columns() {
        assert_eq!(GraphField::try_from("cost").unwrap().column(), "totalCost");
        assert_eq!(GraphField::try_from("date").unwrap().column(), "dateTime");
        assert_eq!(GraphField::try_from("avgSpeed").unwrap(), GraphField::AvgSpeed);
    }

    #[test]
    fn unknown_field_is_rejected() {
        assert_eq!(
            GraphField::try_from("password").unwrap_err(),
            EngineError::InvalidGraphField("password".to_string())
        );
        assert!(GraphField::try_from("").is_err());
    }

    #[test]
    fn points_sorted_by_date() {
        let journeys = vec![journey(2, 5.0, 1.0), journey(0, 7.0, 2.0), journey(1, 3.0, 3.0)];
        let graph = extract(&journeys, GraphField::Date, GraphField::Distance);
        let ys: Vec<GraphValue> = graph.data.iter().map(|p| p.y).collect();
        assert_eq!(
            ys,
            vec![GraphValue::Number(7.0), GraphValue::Number(3.0), GraphValue::Number(5.0)]
        );
    }

    #[test]
    fn points_sorted_by_number() {
        let journeys = vec![journey(0, 5.0, 1.0), journey(1, 7.0, 2.0), journey(2, 3.0, 3.0)];
        let graph = extract(&journeys, GraphField::Distance, GraphField::Cost);
        let xs: Vec<GraphValue> = graph.data.iter().map(|p| p.x).collect();
        assert_eq!(
            xs,
            vec![GraphValue::Number(3.0), GraphValue::Number(5.0), GraphValue::Number(7.0)]
        );
    }

    #[test]
    fn dates_serialize_as_rfc3339() {
        let graph = extract(&[journey(0, 5.0, 1.5)], GraphField::Date, GraphField::Cost);
        let json = serde_json::to_value(&graph).unwrap();
        assert_eq!(json["data"][0]["x"], "2025-01-01T08:00:00Z");
        assert_eq!(json["data"][0]["y"], 1.5);
    }
}
