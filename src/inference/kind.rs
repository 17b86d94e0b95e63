use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};

/// Runtime shape of a single JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Number,
    String,
    Date,
    Array,
    Object,
}

/// JSON has no date type; these decide what counts as one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifyOptions {
    /// `{"$date": ...}` (MongoDB Extended JSON) is a date.
    pub extended_json: bool,
    /// RFC 3339 timestamps and `YYYY-MM-DD` strings are dates.
    pub iso_dates: bool,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self { extended_json: true, iso_dates: false }
    }
}

pub fn classify(v: &Value, opts: &ClassifyOptions) -> Kind {
    match v {
        Value::Null => Kind::Null,
        Value::Bool(_) => Kind::Bool,
        Value::Number(_) => Kind::Number,
        Value::String(s) if opts.iso_dates && looks_like_date(s) => Kind::Date,
        Value::String(_) => Kind::String,
        Value::Array(_) => Kind::Array,
        Value::Object(m) if opts.extended_json && is_extended_date(m) => Kind::Date,
        Value::Object(_) => Kind::Object,
    }
}

pub fn looks_like_date(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok() || NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

fn is_extended_date(m: &Map<String, Value>) -> bool {
    m.len() == 1 && m.contains_key("$date")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_and_containers() {
        let opts = ClassifyOptions::default();
        assert_eq!(classify(&json!(null), &opts), Kind::Null);
        assert_eq!(classify(&json!(false), &opts), Kind::Bool);
        assert_eq!(classify(&json!(1.5), &opts), Kind::Number);
        assert_eq!(classify(&json!("x"), &opts), Kind::String);
        assert_eq!(classify(&json!([1]), &opts), Kind::Array);
        assert_eq!(classify(&json!({"a": 1}), &opts), Kind::Object);
    }

    #[test]
    fn extended_json_dates() {
        let date = json!({"$date": "2024-03-01T10:00:00Z"});
        assert_eq!(classify(&date, &ClassifyOptions::default()), Kind::Date);

        let off = ClassifyOptions { extended_json: false, ..ClassifyOptions::default() };
        assert_eq!(classify(&date, &off), Kind::Object);

        // extra keys make it a plain object
        let not_date = json!({"$date": 1, "tz": "UTC"});
        assert_eq!(classify(&not_date, &ClassifyOptions::default()), Kind::Object);
    }

    #[test]
    fn iso_strings_only_when_enabled() {
        let ts = json!("2024-03-01T10:00:00+02:00");
        let day = json!("2024-03-01");
        assert_eq!(classify(&ts, &ClassifyOptions::default()), Kind::String);

        let on = ClassifyOptions { iso_dates: true, ..ClassifyOptions::default() };
        assert_eq!(classify(&ts, &on), Kind::Date);
        assert_eq!(classify(&day, &on), Kind::Date);
        assert_eq!(classify(&json!("March 1st"), &on), Kind::String);
    }
}
