//! Input rules applied before any domain object is built for a write.
//!
//! Every check returns a [`ValidationError`] naming the offending field.

use crate::error::ValidationError;
use jiff::civil::Date;
use jiff::Zoned;
use url::Url;

pub const GAME_NAME_MAX_LEN: usize = 50;
pub const AUTHOR_NAME_MAX_LEN: usize = 30;

type Result = std::result::Result<(), ValidationError>;

/// Today's civil date in the system time zone.
pub fn today() -> Date {
    Zoned::now().date()
}

/// Accepts only absolute URLs with a host, such as `https://example.com`.
pub fn validate_url(field: &str, value: &str) -> Result {
    match Url::parse(value) {
        Ok(url) if url.has_host() && !url.cannot_be_a_base() => Ok(()),
        _ => Err(ValidationError::new(field, "Invalid")),
    }
}

/// Rejects dates strictly after `today`. A date equal to `today` passes.
pub fn validate_published_date(field: &str, value: Date, today: Date) -> Result {
    if value > today {
        return Err(ValidationError::new(
            field,
            "Published date is greater than today.",
        ));
    }
    Ok(())
}

/// A new game needs at least one inline author or one existing author id.
pub fn validate_author_refs(field: &str, inline_authors: usize, author_ids: usize) -> Result {
    if inline_authors == 0 && author_ids == 0 {
        return Err(ValidationError::new(
            field,
            "Both author and author_ids can not be empty.",
        ));
    }
    Ok(())
}

/// Requires a non-blank value of at most `max` characters.
pub fn validate_text(field: &str, value: &str, max: usize) -> Result {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "Must not be empty."));
    }
    let len = value.chars().count();
    if len > max {
        return Err(ValidationError::new(
            field,
            format!("Must be at most {max} characters, got {len}."),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;
    use jiff::ToSpan;

    #[test]
    fn url_accepts_absolute_http_urls() {
        assert!(validate_url("url", "https://example.com").is_ok());
        assert!(validate_url("url", "http://example.com/games/1?ref=x").is_ok());
    }

    #[test]
    fn url_rejects_malformed_values() {
        for value in ["not a url", "", "example.com", "mailto:someone@example.com"] {
            let err = validate_url("url", value).unwrap_err();
            assert_eq!(err.field, "url", "value: {value:?}");
            assert_eq!(err.error, "Invalid");
        }
    }

    #[test]
    fn published_today_is_accepted() {
        let today = date(2024, 3, 15);
        assert!(validate_published_date("published_date", today, today).is_ok());
        assert!(validate_published_date("published_date", date(1999, 1, 1), today).is_ok());
    }

    #[test]
    fn published_tomorrow_is_rejected() {
        let today = date(2024, 3, 15);
        let tomorrow = today.checked_add(1.day()).unwrap();

        let err = validate_published_date("published_date", tomorrow, today).unwrap_err();
        assert_eq!(err.field, "published_date");
    }

    #[test]
    fn author_refs_need_at_least_one_entry() {
        assert!(validate_author_refs("authors", 1, 0).is_ok());
        assert!(validate_author_refs("authors", 0, 2).is_ok());

        let err = validate_author_refs("authors", 0, 0).unwrap_err();
        assert_eq!(err.field, "authors");
    }

    #[test]
    fn text_limits() {
        assert!(validate_text("name", "Chess", GAME_NAME_MAX_LEN).is_ok());
        assert!(validate_text("name", &"x".repeat(50), GAME_NAME_MAX_LEN).is_ok());
        assert!(validate_text("name", &"x".repeat(51), GAME_NAME_MAX_LEN).is_err());
        assert!(validate_text("name", "   ", GAME_NAME_MAX_LEN).is_err());
    }
}
