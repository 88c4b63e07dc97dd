//! Request validation helpers.
//!
//! Request structs implement [`Validate`]; the [`ApiJson`](super::extract::ApiJson)
//! extractor runs it before the handler sees the body.

use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};

use crate::errors::ApiError;

pub type ValidationResult = Result<(), ApiError>;

/// Boundary validation for request bodies.
pub trait Validate {
    fn validate(&self) -> ValidationResult;
}

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

const MAX_TEXT_LEN: usize = 200;
const MAX_LONG_TEXT_LEN: usize = 2000;

/// Non-blank and at most 200 characters.
pub fn validate_required(value: &str, field: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{field} is required")));
    }
    validate_max_len(value, field, MAX_TEXT_LEN)
}

pub fn validate_max_len(value: &str, field: &str, max: usize) -> ValidationResult {
    if value.chars().count() > max {
        return Err(ApiError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Like [`validate_required`], but only when the field was supplied.
pub fn validate_optional(value: Option<&str>, field: &str) -> ValidationResult {
    value.map_or(Ok(()), |v| validate_required(v, field))
}

/// Free-form text such as descriptions or notes.
pub fn validate_long_text(value: Option<&str>, field: &str) -> ValidationResult {
    value.map_or(Ok(()), |v| validate_max_len(v, field, MAX_LONG_TEXT_LEN))
}

pub fn validate_email(email: &str) -> ValidationResult {
    let email = email.trim();
    if email.is_empty() {
        return Err(ApiError::Validation("Email is required".to_string()));
    }
    if email.len() > 254 || !EMAIL_REGEX.is_match(email) {
        return Err(ApiError::Validation(
            "Please provide a valid email".to_string(),
        ));
    }
    Ok(())
}

/// Parse a calendar date from `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// serde adapter accepting either date form.
pub mod flexible_date {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_date(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date `{raw}`, expected YYYY-MM-DD")))
    }

    /// For optional fields; pair with `#[serde(default)]`.
    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) => parse_date(&raw).map(Some).ok_or_else(|| {
                serde::de::Error::custom(format!("invalid date `{raw}`, expected YYYY-MM-DD"))
            }),
        }
    }
}

/// Distinguishes an explicit `null` from an absent field.
///
/// Pair with `#[serde(default)]` on an `Option<Option<T>>`: absent stays
/// `None`, `null` becomes `Some(None)`.
pub fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("jane@example.com", true; "plain")]
    #[test_case("  jane.doe+spa@mail.example.org ", true; "padded with tag")]
    #[test_case("jane@", false; "no domain")]
    #[test_case("jane example@x.com", false; "whitespace")]
    #[test_case("", false; "empty")]
    fn test_validate_email(email: &str, ok: bool) {
        assert_eq!(validate_email(email).is_ok(), ok);
    }

    #[test]
    fn test_validate_required() {
        assert!(validate_required("Jane", "First name").is_ok());
        let err = validate_required("   ", "First name").unwrap_err();
        assert_eq!(err.client_message(), "First name is required");
        assert!(validate_required(&"x".repeat(201), "Title").is_err());
        assert!(validate_optional(None, "Title").is_ok());
        assert!(validate_optional(Some(""), "Title").is_err());
    }

    #[test]
    fn test_parse_date_forms() {
        let expected = NaiveDate::from_ymd_opt(1990, 4, 2);
        assert_eq!(parse_date("1990-04-02"), expected);
        assert_eq!(parse_date("1990-04-02T00:00:00.000Z"), expected);
        assert_eq!(parse_date("02/04/1990"), None);
        assert_eq!(parse_date("1990-02-30"), None);
    }

    #[derive(Deserialize)]
    struct Dated {
        #[serde(deserialize_with = "flexible_date::deserialize")]
        date: NaiveDate,
        #[serde(default, deserialize_with = "flexible_date::deserialize_option")]
        maybe: Option<NaiveDate>,
    }

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "nullable")]
        notes: Option<Option<String>>,
    }

    #[test]
    fn test_nullable_field() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.notes, None);
        let cleared: Patch = serde_json::from_str(r#"{"notes":null}"#).unwrap();
        assert_eq!(cleared.notes, Some(None));
        let set: Patch = serde_json::from_str(r#"{"notes":"VIP"}"#).unwrap();
        assert_eq!(set.notes, Some(Some("VIP".to_string())));
    }

    #[test]
    fn test_flexible_date_serde() {
        let parsed: Dated = serde_json::from_str(r#"{"date":"2030-01-15"}"#).unwrap();
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2030, 1, 15).unwrap());
        assert!(parsed.maybe.is_none());

        let parsed: Dated =
            serde_json::from_str(r#"{"date":"2030-01-15","maybe":"2030-02-01T10:00:00Z"}"#).unwrap();
        assert_eq!(parsed.maybe, NaiveDate::from_ymd_opt(2030, 2, 1));

        assert!(serde_json::from_str::<Dated>(r#"{"date":"tomorrow"}"#).is_err());
    }
}
