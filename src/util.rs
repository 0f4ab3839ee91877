//! Shared utility functions for the promo service.

use axum::http::HeaderMap;
use chrono::{DateTime, SecondsFormat, Utc};

pub const SECONDS_PER_DAY: i64 = 86400;

/// Normalize a user-entered promo code for lookup.
///
/// Codes are stored trimmed and lowercased. Returns None if nothing is left.
pub fn normalize_code(raw: &str) -> Option<String> {
    let normalized = raw.trim().to_lowercase();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// New end of the access window after granting `days` more days.
///
/// The grant is appended after any access that is still running, so an
/// extension never shortens what the user already has. Expired or missing
/// access starts the new window at `now`.
pub fn extend_access_until(now: i64, prior_access_until: Option<i64>, days: i64) -> i64 {
    let base = prior_access_until.map_or(now, |prior| prior.max(now));
    base.saturating_add(days.saturating_mul(SECONDS_PER_DAY))
}

/// Format a unix timestamp the way the web client writes dates
/// (`2024-01-31T00:00:00.000Z`).
pub fn to_iso8601(ts: i64) -> String {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .unwrap_or(if ts > 0 {
            DateTime::<Utc>::MAX_UTC
        } else {
            DateTime::<Utc>::MIN_UTC
        })
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Extract a Bearer token from the Authorization header.
///
/// Returns the token string without the "Bearer " prefix, or None if
/// the header is missing, malformed, or empty after the prefix.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn ts(s: &str) -> i64 {
        DateTime::parse_from_rfc3339(s).unwrap().timestamp()
    }

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code("  SUMMER24 "), Some("summer24".to_string()));
        assert_eq!(normalize_code("   "), None);
        assert_eq!(normalize_code(""), None);
    }

    #[test]
    fn test_extend_without_prior_access_starts_now() {
        let now = ts("2024-01-01T00:00:00Z");
        assert_eq!(extend_access_until(now, None, 30), ts("2024-01-31T00:00:00Z"));
    }

    #[test]
    fn test_extend_stacks_on_future_expiry() {
        let now = ts("2024-01-15T00:00:00Z");
        let prior = ts("2024-02-01T00:00:00Z");
        assert_eq!(extend_access_until(now, Some(prior), 7), ts("2024-02-08T00:00:00Z"));
    }

    #[test]
    fn test_extend_ignores_expired_access() {
        let now = ts("2024-03-01T00:00:00Z");
        let prior = ts("2024-01-01T00:00:00Z");
        assert_eq!(extend_access_until(now, Some(prior), 7), ts("2024-03-08T00:00:00Z"));
    }

    #[test]
    fn test_extend_never_shortens() {
        let now = 1_700_000_000;
        for prior in [now - 10 * SECONDS_PER_DAY, now, now + 90 * SECONDS_PER_DAY] {
            let extended = extend_access_until(now, Some(prior), 1);
            assert!(extended > prior);
            assert!(extended >= now + SECONDS_PER_DAY);
        }
    }

    #[test]
    fn test_extend_saturates_near_max() {
        assert_eq!(extend_access_until(0, Some(i64::MAX - 10), 7), i64::MAX);
        assert_eq!(extend_access_until(0, Some(i64::MAX), 1), i64::MAX);
    }

    #[test]
    fn test_to_iso8601() {
        assert_eq!(to_iso8601(ts("2024-01-31T00:00:00Z")), "2024-01-31T00:00:00.000Z");
    }

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer_token(&headers), None);

        headers.insert("Authorization", HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(extract_bearer_token(&headers), Some("abc.def"));

        headers.insert("Authorization", HeaderValue::from_static("Bearer   "));
        assert_eq!(extract_bearer_token(&headers), None);

        headers.insert("Authorization", HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_bearer_token(&headers), None);
    }
}
