// ABOUTME: Row decoding and value formatting shared by the table managers
// ABOUTME: Converts stored text ids, dates, and timestamps back into typed values

use crate::errors::{AppResult, DatabaseError};
use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

/// Fixed-width RFC 3339 so stored timestamps sort lexically
pub(super) fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// ISO `YYYY-MM-DD`
pub(super) fn format_date(value: NaiveDate) -> String {
    value.format("%Y-%m-%d").to_string()
}

pub(super) fn format_time(value: NaiveTime) -> String {
    value.format("%H:%M:%S").to_string()
}

fn invalid(field: &'static str, value: &str) -> DatabaseError {
    DatabaseError::InvalidData {
        field,
        value: value.to_owned(),
    }
}

pub(super) fn get_uuid(row: &SqliteRow, column: &'static str) -> AppResult<Uuid> {
    let raw: String = row.get(column);
    Uuid::parse_str(&raw).map_err(|_| invalid(column, &raw).into())
}

pub(super) fn get_timestamp(row: &SqliteRow, column: &'static str) -> AppResult<DateTime<Utc>> {
    let raw: String = row.get(column);
    parse_timestamp(column, &raw)
}

pub(super) fn get_optional_timestamp(
    row: &SqliteRow,
    column: &'static str,
) -> AppResult<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(column);
    raw.map(|value| parse_timestamp(column, &value)).transpose()
}

fn parse_timestamp(column: &'static str, raw: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| invalid(column, raw).into())
}

pub(super) fn get_date(row: &SqliteRow, column: &'static str) -> AppResult<NaiveDate> {
    let raw: String = row.get(column);
    parse_date(column, &raw)
}

pub(super) fn get_optional_date(
    row: &SqliteRow,
    column: &'static str,
) -> AppResult<Option<NaiveDate>> {
    let raw: Option<String> = row.get(column);
    raw.map(|value| parse_date(column, &value)).transpose()
}

fn parse_date(column: &'static str, raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid(column, raw).into())
}

pub(super) fn get_optional_time(
    row: &SqliteRow,
    column: &'static str,
) -> AppResult<Option<NaiveTime>> {
    let raw: Option<String> = row.get(column);
    raw.map(|value| {
        NaiveTime::parse_from_str(&value, "%H:%M:%S").map_err(|_| invalid(column, &value).into())
    })
    .transpose()
}

pub(super) fn get_bool(row: &SqliteRow, column: &'static str) -> bool {
    let raw: i64 = row.get(column);
    raw != 0
}

/// Decode an optional text enum column with the enum's own parser
pub(super) fn get_optional_enum<T>(
    row: &SqliteRow,
    column: &'static str,
    parse: fn(&str) -> Option<T>,
) -> AppResult<Option<T>> {
    let raw: Option<String> = row.get(column);
    raw.map(|value| parse(&value).ok_or_else(|| invalid(column, &value).into()))
        .transpose()
}

/// Decode a required text enum column with the enum's own parser
pub(super) fn get_enum<T>(
    row: &SqliteRow,
    column: &'static str,
    parse: fn(&str) -> Option<T>,
) -> AppResult<T> {
    let raw: String = row.get(column);
    parse(&raw).ok_or_else(|| invalid(column, &raw).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_timestamps_sort_lexically() {
        let earlier = DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let later = earlier + Duration::microseconds(1);
        assert!(format_timestamp(&earlier) < format_timestamp(&later));
        assert_eq!(format_timestamp(&earlier), "2024-05-01T10:00:00.000000Z");
    }

    #[test]
    fn test_date_format() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
        assert_eq!(format_date(date), "2024-01-09");
    }
}
