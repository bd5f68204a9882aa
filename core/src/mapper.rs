//! Conversion of decoded JSON payloads into typed DTOs.
//!
//! Every function here is total apart from the documented `PayloadError`.
//! Wire payloads use snake_case keys (`first_name`, `per_page`, ...) except
//! `createdAt`, which the API sends in camelCase. A key holding `null` is
//! treated the same as an absent key.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

use crate::error::PayloadError;
use crate::types::{CreatedUser, User, UserPage};

/// Map a wire user object (`id, email, first_name, last_name, avatar`).
pub fn to_user(map: &Map<String, Value>) -> Result<User, PayloadError> {
    user_at(map, "")
}

/// Map a list envelope. `data` defaults to an empty list; one bad user
/// fails the whole page.
pub fn to_user_page(map: &Map<String, Value>) -> Result<UserPage, PayloadError> {
    require_fields(map, &["page", "per_page", "total", "total_pages"])?;

    let page = count_field(map, "page")?;
    let per_page = count_field(map, "per_page")?;
    let total = count_field(map, "total")?;
    let total_pages = count_field(map, "total_pages")?;

    let users = match present(map, "data") {
        None => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let context = format!("data[{index}]");
                let object = as_object(item, &context)?;
                user_at(object, &context)
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(PayloadError::wrong_type("data", "array of users")),
    };

    Ok(UserPage::new(page, per_page, total, total_pages, users))
}

/// Map a create response. `name` and `job` come from the caller, not the
/// payload. Presence of `id` and `createdAt` is checked before the
/// timestamp is parsed.
pub fn to_created_user(map: &Map<String, Value>, name: &str, job: &str) -> Result<CreatedUser, PayloadError> {
    require_fields(map, &["id", "createdAt"])?;

    let id = string_field(map, "id", "id")?;
    let created_at = match present(map, "createdAt") {
        Some(Value::String(raw)) => parse_timestamp("createdAt", raw)?,
        _ => return Err(PayloadError::wrong_type("createdAt", "ISO-8601 timestamp string")),
    };

    Ok(CreatedUser::new(id, name.to_string(), job.to_string(), created_at))
}

/// Fail with `MissingField` for the first of `fields` that is absent or null.
pub fn require_fields(map: &Map<String, Value>, fields: &[&str]) -> Result<(), PayloadError> {
    match fields.iter().find(|field| present(map, field).is_none()) {
        Some(field) => Err(PayloadError::missing(*field)),
        None => Ok(()),
    }
}

/// Borrow `value` as a JSON object, naming `field` on failure.
pub fn as_object<'a>(value: &'a Value, field: &str) -> Result<&'a Map<String, Value>, PayloadError> {
    value
        .as_object()
        .ok_or_else(|| PayloadError::wrong_type(field, "object"))
}

fn user_at(map: &Map<String, Value>, context: &str) -> Result<User, PayloadError> {
    const FIELDS: [&str; 5] = ["id", "email", "first_name", "last_name", "avatar"];
    if let Some(field) = FIELDS.iter().find(|field| present(map, field).is_none()) {
        return Err(PayloadError::missing(qualified(context, field)));
    }

    Ok(User::new(
        integer_field(map, "id", &qualified(context, "id"))?,
        string_field(map, "email", &qualified(context, "email"))?,
        string_field(map, "first_name", &qualified(context, "first_name"))?,
        string_field(map, "last_name", &qualified(context, "last_name"))?,
        string_field(map, "avatar", &qualified(context, "avatar"))?,
    ))
}

fn qualified(context: &str, field: &str) -> String {
    if context.is_empty() {
        field.to_string()
    } else {
        format!("{context}.{field}")
    }
}

fn present<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|value| !value.is_null())
}

/// Integer coercion: JSON integers, floats (truncated) and numeric strings.
fn integer_field(map: &Map<String, Value>, key: &str, context: &str) -> Result<i64, PayloadError> {
    let wrong = || PayloadError::wrong_type(context, "integer");
    match present(map, key) {
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if n.is_u64() {
                Err(wrong())
            } else {
                match n.as_f64() {
                    Some(f) if f.is_finite() => Ok(f.trunc() as i64),
                    _ => Err(wrong()),
                }
            }
        }
        Some(Value::String(s)) => s.trim().parse::<i64>().map_err(|_| wrong()),
        Some(_) => Err(wrong()),
        None => Err(PayloadError::missing(context)),
    }
}

fn count_field(map: &Map<String, Value>, key: &str) -> Result<u64, PayloadError> {
    let value = integer_field(map, key, key)?;
    u64::try_from(value).map_err(|_| PayloadError::wrong_type(key, "non-negative integer"))
}

/// String coercion: strings as-is, numbers rendered in decimal.
fn string_field(map: &Map<String, Value>, key: &str, context: &str) -> Result<String, PayloadError> {
    match present(map, key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(_) => Err(PayloadError::wrong_type(context, "string")),
        None => Err(PayloadError::missing(context)),
    }
}

/// ISO-8601 date-times with an offset, in extended or basic form.
const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y%m%dT%H%M%S%z",
];

/// The same shapes without an offset; read as UTC.
const LOCAL_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y%m%dT%H%M%S"];

/// RFC 3339 first, then the other ISO-8601 shapes. A trailing `Z` means
/// UTC, a missing offset is read as UTC, and a bare date is midnight UTC.
fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<FixedOffset>, PayloadError> {
    let rfc_err = match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => return Ok(ts),
        Err(e) => e,
    };

    let zulu = raw
        .strip_suffix(['Z', 'z'])
        .map(|stem| format!("{stem}+0000"));
    let with_offset = zulu.as_deref().unwrap_or(raw);
    let parsed = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(with_offset, fmt).ok())
        .or_else(|| {
            LOCAL_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .or_else(|| {
                    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                        .ok()
                        .and_then(|date| date.and_hms_opt(0, 0, 0))
                })
                .map(|naive| naive.and_utc().fixed_offset())
        });

    parsed.ok_or_else(|| PayloadError::InvalidTimestamp {
        field: field.to_string(),
        value: raw.to_string(),
        source: rfc_err,
    })
}
