//! Bulk journey import rows.
//!
//! Rows come from exported spreadsheets or older clients, so numeric columns
//! are coerced leniently: numbers, numeric strings, blanks and nulls are all
//! accepted and anything unreadable counts as 0.

use std::fmt;

use serde::{
    Deserialize, Deserializer,
    de::{self, Visitor},
};

use crate::{
    EngineError, ResultEngine,
    commands::JourneyNewCmd,
    journeys::Condition,
    metrics::PrimaryInputs,
    util::{normalize_optional_text, parse_date_time},
};

/// One raw imported row. Unknown columns (stored derived values, ids) are
/// ignored since derived fields are recomputed.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRow {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub distance: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub mpg: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub time_driven: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub temp: f64,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub cost_pl: f64,
}

struct LenientNumber;

impl<'de> Visitor<'de> for LenientNumber {
    type Value = f64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number, a numeric string or nothing")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
        Ok(if v.is_finite() { v } else { 0.0 })
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<f64, E> {
        Ok(0.0)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
        Ok(v.trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .unwrap_or(0.0))
    }

    fn visit_unit<E: de::Error>(self) -> Result<f64, E> {
        Ok(0.0)
    }

    fn visit_none<E: de::Error>(self) -> Result<f64, E> {
        Ok(0.0)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<f64, D::Error> {
        deserializer.deserialize_any(LenientNumber)
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<f64, A::Error> {
        while seq.next_element::<de::IgnoredAny>()?.is_some() {}
        Ok(0.0)
    }

    fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<f64, A::Error> {
        while map.next_entry::<de::IgnoredAny, de::IgnoredAny>()?.is_some() {}
        Ok(0.0)
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    deserializer.deserialize_any(LenientNumber)
}

/// Parse a JSON array of rows.
pub fn parse_json(body: &str) -> ResultEngine<Vec<ImportRow>> {
    serde_json::from_str(body)
        .map_err(|err| EngineError::Validation(format!("invalid import payload: {err}")))
}

/// Parse a CSV document with a header row.
pub fn parse_csv(body: &str) -> ResultEngine<Vec<ImportRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(body.as_bytes());
    reader
        .deserialize::<ImportRow>()
        .map(|row| row.map_err(EngineError::from))
        .collect()
}

impl ImportRow {
    /// Turn the row into a create command. `username` overrides the row's
    /// own user. `index` is zero based and only used in error messages.
    pub fn into_command(self, index: usize, username: Option<&str>) -> ResultEngine<JourneyNewCmd> {
        let row = index + 1;
        let user = username
            .map(ToString::to_string)
            .or_else(|| normalize_optional_text(self.user.as_deref()))
            .ok_or_else(|| EngineError::Validation(format!("row {row}: missing user")))?;
        let date_time = self
            .date_time
            .as_deref()
            .and_then(parse_date_time)
            .ok_or_else(|| EngineError::Validation(format!("row {row}: invalid dateTime")))?;

        let inputs = PrimaryInputs {
            distance: self.distance,
            mpg: self.mpg,
            time_driven: self.time_driven,
            cost_pl: self.cost_pl,
        };
        Ok(JourneyNewCmd::new(user, date_time, inputs)
            .description(self.description.unwrap_or_default())
            .temp(self.temp)
            .condition(Condition::from_stored(self.condition.as_deref())))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn json_rows_accept_mixed_number_forms() {
        let rows = parse_json(
            r#"[
                {"user": "alice", "dateTime": "2025-01-02T08:00:00Z", "distance": "12.5",
                 "mpg": 44, "timeDriven": null, "costPl": "", "totalCost": 99},
                {"user": "alice", "dateTime": "2025-01-03", "distance": "n/a"}
            ]"#,
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].distance, 12.5);
        assert_eq!(rows[0].mpg, 44.0);
        assert_eq!(rows[0].time_driven, 0.0);
        assert_eq!(rows[0].cost_pl, 0.0);
        assert_eq!(rows[1].distance, 0.0);
        assert_eq!(rows[1].temp, 0.0);
    }

    #[test]
    fn json_must_be_an_array() {
        assert!(matches!(
            parse_json(r#"{"user": "alice"}"#),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn csv_rows_with_blanks_and_extra_columns() {
        let body = "user,description,dateTime,distance,mpg,timeDriven,temp,condition,costPl,fuelUsedL\n\
                    alice,commute,2025-01-02T08:00,10.5,45,20,,Wet,1.459,1.2\n\
                    bob,, 2025-01-03 ,7,,,3.5,,1.5,\n";
        let rows = parse_csv(body).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].distance, 10.5);
        assert_eq!(rows[0].temp, 0.0);
        assert_eq!(rows[0].condition.as_deref(), Some("Wet"));
        assert_eq!(rows[1].mpg, 0.0);
        assert_eq!(rows[1].temp, 3.5);
        assert_eq!(rows[1].date_time.as_deref(), Some("2025-01-03"));
    }

    #[test]
    fn csv_with_missing_columns_uses_defaults() {
        let rows = parse_csv("user,dateTime,distance\nalice,2025-01-02,3\n").unwrap();
        assert_eq!(rows[0].distance, 3.0);
        assert_eq!(rows[0].mpg, 0.0);
        assert_eq!(rows[0].condition, None);
    }

    #[test]
    fn row_becomes_command() {
        let row = ImportRow {
            user: Some("alice".to_string()),
            date_time: Some("2025-01-02T08:00".to_string()),
            distance: 10.0,
            ..Default::default()
        };
        let cmd = row.into_command(0, None).unwrap();
        assert_eq!(cmd.user, "alice");
        assert_eq!(cmd.condition, Condition::Dry);
        assert_eq!(cmd.date_time, Utc.with_ymd_and_hms(2025, 1, 2, 8, 0, 0).unwrap());
    }

    #[test]
    fn username_parameter_wins() {
        let row = ImportRow {
            user: Some("alice".to_string()),
            date_time: Some("2025-01-02".to_string()),
            ..Default::default()
        };
        assert_eq!(row.into_command(0, Some("bob")).unwrap().user, "bob");
    }

    #[test]
    fn row_errors_name_the_row() {
        let no_user = ImportRow {
            date_time: Some("2025-01-02".to_string()),
            ..Default::default()
        };
        assert_eq!(
            no_user.into_command(2, None).unwrap_err(),
            EngineError::Validation("row 3: missing user".to_string())
        );

        let bad_date = ImportRow {
            user: Some("alice".to_string()),
            date_time: Some("yesterday".to_string()),
            ..Default::default()
        };
        assert_eq!(
            bad_date.into_command(0, None).unwrap_err(),
            EngineError::Validation("row 1: invalid dateTime".to_string())
        );
    }
}
