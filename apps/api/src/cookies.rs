//! Cookie helpers and the client timezone extractor.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use chrono_tz::Tz;
use std::convert::Infallible;

/// Returns the value of cookie `name`, if the request carries it.
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// The browser's IANA zone, read from the `timezone` cookie.
/// Missing or unknown zones fall back to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientTimezone(pub Tz);

impl Default for ClientTimezone {
    fn default() -> Self {
        ClientTimezone(Tz::UTC)
    }
}

/// Parses an IANA name such as `America/New_York`. Browsers may
/// percent-encode the slash when writing the cookie.
pub fn parse_timezone(raw: &str) -> Option<Tz> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.replace("%2F", "/")
        .replace("%2f", "/")
        .parse::<Tz>()
        .ok()
}

#[async_trait]
impl<S> FromRequestParts<S> for ClientTimezone
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(read_cookie(&parts.headers, "timezone")
            .and_then(parse_timezone)
            .map(ClientTimezone)
            .unwrap_or_default())
    }
}
