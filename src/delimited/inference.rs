//! Column kind inference and field parsing.
//!
//! Inference looks at a bounded sample of a column's raw fields and tries
//! the candidate kinds in priority order Boolean, DateTime, Integer, Real.
//! The first kind every sampled field parses as wins. Text accepts
//! anything and is the fallback, including for an empty sample.

use chrono::{NaiveDate, NaiveDateTime};

use crate::storage::DataType;

const CANDIDATES: [DataType; 4] = [
    DataType::Boolean,
    DataType::DateTime,
    DataType::Integer,
    DataType::Real,
];

const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn parse_boolean(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

pub(crate) fn parse_date_time(raw: &str, format: &str) -> Option<NaiveDateTime> {
    //! Parse with the configured format, falling back to a bare date at
    //! midnight.

    NaiveDateTime::parse_from_str(raw, format).ok().or_else(|| {
        NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    })
}

pub(crate) fn parse_integer(raw: &str) -> Option<i64> {
    raw.parse().ok()
}

pub(crate) fn parse_real(raw: &str) -> Option<f64> {
    raw.parse().ok()
}

fn accepts(kind: DataType, raw: &str, date_time_format: &str) -> bool {
    match kind {
        DataType::Boolean => parse_boolean(raw).is_some(),
        DataType::DateTime => parse_date_time(raw, date_time_format).is_some(),
        DataType::Integer => parse_integer(raw).is_some(),
        DataType::Real => parse_real(raw).is_some(),
        DataType::Text => true,
    }
}

pub(crate) fn infer_kind<'a, I>(samples: I, date_time_format: &str) -> DataType
where
    I: Iterator<Item = &'a str> + Clone,
{
    let mut samples = samples.peekable();
    if samples.peek().is_none() {
        return DataType::Text;
    }

    CANDIDATES
        .into_iter()
        .find(|&kind| {
            samples
                .clone()
                .all(|raw| accepts(kind, raw, date_time_format))
        })
        .unwrap_or(DataType::Text)
}
