use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;

use crate::error::AppError;

pub(crate) const DEFAULT_PAGE: u64 = 1;
pub(crate) const DEFAULT_LIMIT: u64 = 10;
pub(crate) const MAX_LIMIT: u64 = 100;

pub(crate) fn required_text(value: Option<String>, field: &str) -> Result<String, AppError> {
    match value.as_deref().map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed.to_string()),
        _ => Err(AppError::bad_request(format!("{field} is required"))),
    }
}

/// `None` leaves the column alone; a blank value is an error.
pub(crate) fn optional_text(value: Option<String>, field: &str) -> Result<Option<String>, AppError> {
    match value {
        Some(raw) => required_text(Some(raw), field).map(Some),
        None => Ok(None),
    }
}

pub(crate) fn required_date(
    value: Option<String>,
    field: &str,
) -> Result<DateTimeWithTimeZone, AppError> {
    match value.as_deref().map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => parse_date(trimmed, field),
        _ => Err(AppError::bad_request(format!("{field} is required"))),
    }
}

pub(crate) fn optional_date(
    value: Option<String>,
    field: &str,
) -> Result<Option<DateTimeWithTimeZone>, AppError> {
    match value {
        Some(raw) => required_date(Some(raw), field).map(Some),
        None => Ok(None),
    }
}

/// RFC 3339 timestamps are converted to UTC. Plain `YYYY-MM-DD` dates are
/// midnight UTC. Date columns carry no offset, so every stored value is UTC.
pub(crate) fn parse_date(raw: &str, field: &str) -> Result<DateTimeWithTimeZone, AppError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc).fixed_offset());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN).and_utc().fixed_offset())
        .map_err(|_| {
            AppError::bad_request(format!(
                "{field} must be an ISO-8601 date (YYYY-MM-DD or RFC 3339)"
            ))
        })
}

pub(crate) fn page_params(page: Option<u64>, limit: Option<u64>) -> Result<(u64, u64), AppError> {
    let page = page.unwrap_or(DEFAULT_PAGE);
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    if page == 0 {
        return Err(AppError::bad_request("page must be >= 1"));
    }
    if limit == 0 || limit > MAX_LIMIT {
        return Err(AppError::bad_request(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }
    Ok((page, limit))
}
