use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

pub const DAY_FIELD: &str = "day";
const USERNAME_FIELD: &str = "username";
const RANK_FIELD: &str = "rank";
const POWER_FIELD: &str = "power";
const EXTRA_FIELD: &str = "extra";

/// One participant's entry in a day file.
///
/// `username`, `rank`, `power` and `extra` are lifted out of the source object
/// only when they have the expected type. Anything else, including a known
/// field with an unexpected type, stays in `fields` and is written back out
/// unchanged when the record is serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct Record {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<Number>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,

    /// Original spelling of the file key, never serialized.
    #[serde(skip)]
    pub display: String,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl From<Map<String, Value>> for Record {
    fn from(mut fields: Map<String, Value>) -> Self {
        let username = take(&mut fields, USERNAME_FIELD, |value| match value {
            Value::String(s) => Some(s.clone()),
            _ => None,
        });
        let rank = take(&mut fields, RANK_FIELD, Value::as_i64);
        let power = take(&mut fields, POWER_FIELD, |value| match value {
            Value::Number(n) => Some(n.clone()),
            _ => None,
        });
        let extra = take(&mut fields, EXTRA_FIELD, |value| match value {
            Value::String(s) => Some(s.clone()),
            _ => None,
        });

        Self {
            username,
            rank,
            power,
            extra,
            display: String::new(),
            fields,
        }
    }
}

/// Remove `key` from `fields` when `project` accepts its value.
fn take<T>(
    fields: &mut Map<String, Value>,
    key: &str,
    project: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    let projected = project(fields.get(key)?)?;
    fields.remove(key);

    Some(projected)
}

impl Record {
    /// Copy of this record tagged with its day. A `day` already present in
    /// the source data wins.
    pub fn for_day(&self, day: u32) -> Self {
        let mut record = self.clone();
        record
            .fields
            .entry(DAY_FIELD)
            .or_insert_with(|| Value::from(day));
        record
    }

    /// Fill in `username` when the source record had none.
    pub fn or_username(mut self, username: &str) -> Self {
        self.username.get_or_insert_with(|| username.to_string());
        self
    }

    /// Stored username, else the file key as written, else `key`.
    pub fn display_name(&self, key: &str) -> String {
        match &self.username {
            Some(username) => username.clone(),
            None if !self.display.is_empty() => self.display.clone(),
            None => key.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub username: String,
    pub rank: Option<i64>,
    pub power: Option<Number>,
    pub extra: String,
}

impl Row {
    pub fn from_record(key: &str, record: &Record) -> Self {
        Self {
            username: record.display_name(key),
            rank: record.rank,
            power: record.power.clone(),
            extra: record.extra.clone().unwrap_or_default(),
        }
    }
}

/// Leaderboard row as exposed by the JSON API, without `extra`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiRow {
    pub username: String,
    pub rank: Option<i64>,
    pub power: Option<Number>,
}

impl From<Row> for ApiRow {
    fn from(row: Row) -> Self {
        Self {
            username: row.username,
            rank: row.rank,
            power: row.power,
        }
    }
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub username: String,
    pub results: Vec<Record>,
}

#[derive(Serialize)]
pub struct LeaderboardResponse {
    pub day: u32,
    pub rows: Vec<ApiRow>,
}

#[derive(Serialize)]
pub struct ReloadResponse {
    pub status: &'static str,
    pub days: Vec<u32>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_unknown_fields_preserved() {
        let record: Record = serde_json::from_value(json!({
            "rank": 2,
            "power": 1500.5,
            "guild": "North",
            "badges": [1, 2]
        }))
        .unwrap();

        assert_eq!(record.rank, Some(2));
        assert_eq!(record.fields["guild"], json!("North"));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(
            back,
            json!({"rank": 2, "power": 1500.5, "guild": "North", "badges": [1, 2]})
        );
    }

    #[test]
    fn test_null_rank_is_unranked() {
        let record: Record = serde_json::from_value(json!({"rank": null, "power": 3})).unwrap();

        assert_eq!(record.rank, None);
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"rank": null, "power": 3})
        );
    }

    #[test]
    fn test_mistyped_known_fields_kept_raw() {
        let record: Record =
            serde_json::from_value(json!({"rank": 2.0, "power": "high", "extra": 7, "username": 1}))
                .unwrap();

        assert_eq!(record.rank, None);
        assert_eq!(record.power, None);
        assert_eq!(record.extra, None);
        assert_eq!(record.username, None);
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"rank": 2.0, "power": "high", "extra": 7, "username": 1})
        );
    }

    #[test]
    fn test_for_day_keeps_existing_day() {
        let record: Record = serde_json::from_value(json!({"day": 42, "power": 1})).unwrap();

        assert_eq!(record.for_day(3).fields[DAY_FIELD], json!(42));
        assert_eq!(Record::default().for_day(3).fields[DAY_FIELD], json!(3));
    }

    #[test]
    fn test_or_username() {
        let record: Record = serde_json::from_value(json!({"username": "Bob"})).unwrap();

        assert_eq!(record.or_username("bob").username.as_deref(), Some("Bob"));
        assert_eq!(
            Record::default().or_username("BOB").username.as_deref(),
            Some("BOB")
        );
    }

    #[test]
    fn test_display_name_not_serialized() {
        let record = Record {
            display: "Alice".to_string(),
            ..Record::default()
        };

        assert_eq!(record.display_name("alice"), "Alice");
        assert_eq!(serde_json::to_value(&record).unwrap(), json!({}));
    }

    #[test]
    fn test_row_defaults() {
        let row = Row::from_record("carol", &Record::default());

        assert_eq!(row.username, "carol");
        assert_eq!(row.rank, None);
        assert_eq!(row.extra, "");
        assert_eq!(
            serde_json::to_value(ApiRow::from(row)).unwrap(),
            json!({"username": "carol", "rank": null, "power": null})
        );
    }
}
