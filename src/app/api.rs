// src/app/api.rs
use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;
use tracing::debug;

use crate::app::types::Recommendation;

pub const GENERIC_FETCH_ERROR: &str = "Couldn't fetch recommendations. Try another title.";

/// How a lookup request went wrong. Everything here is terminal for the
/// session; the user re-submits to retry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchError {
    /// Network unreachable, DNS failure, timeout — no usable response.
    Transport(String),
    /// Non-2xx status, with the server-supplied error text when it sent one.
    Server { status: u16, message: Option<String> },
    /// 2xx status but the body is not the expected envelope.
    Payload(String),
}

impl FetchError {
    /// Message shown in the error region. A server-supplied string wins;
    /// every other failure funnels into the fixed fallback.
    pub fn user_message(&self) -> String {
        match self {
            Self::Server {
                message: Some(m), ..
            } => m.clone(),
            _ => GENERIC_FETCH_ERROR.to_string(),
        }
    }
}

pub fn build_client() -> Result<Client, String> {
    Client::builder()
        .user_agent("smartstream/desktop")
        .timeout(Duration::from_secs(20))
        .build()
        .map_err(|e| format!("http client build: {e}"))
}

pub fn recommend_url(base_url: &str, title: &str) -> String {
    format!(
        "{}/recommend?title={}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(title)
    )
}

/// Issue the one outbound lookup. Blocking; call from a worker thread.
pub fn fetch_recommendations(
    client: &Client,
    base_url: &str,
    title: &str,
) -> Result<Vec<Recommendation>, FetchError> {
    let url = recommend_url(base_url, title);
    debug!("GET {url}");

    let resp = client
        .get(&url)
        .send()
        .map_err(|e| FetchError::Transport(format!("GET {url}: {e}")))?;
    let status = resp.status();
    let body = resp
        .text()
        .map_err(|e| FetchError::Transport(format!("read body: {e}")))?;

    if !status.is_success() {
        return Err(FetchError::Server {
            status: status.as_u16(),
            message: parse_error_body(&body),
        });
    }

    parse_success_body(&body)
}

/// Error envelope on non-2xx is optionally `{"error": "..."}`; any other
/// shape yields no server text.
pub(crate) fn parse_error_body(body: &str) -> Option<String> {
    let v: Value = serde_json::from_str(body).ok()?;
    v.get("error")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_owned)
}

/// Success envelope is `{"recommendations": [ ... ]}`. A missing or
/// non-array `recommendations` rejects the whole body; individual records
/// are extracted leniently so one defective entry never fails the response.
pub(crate) fn parse_success_body(body: &str) -> Result<Vec<Recommendation>, FetchError> {
    let v: Value = serde_json::from_str(body)
        .map_err(|e| FetchError::Payload(format!("parse envelope: {e}")))?;
    let Some(list) = v.get("recommendations").and_then(Value::as_array) else {
        return Err(FetchError::Payload(
            "missing `recommendations` array".into(),
        ));
    };
    Ok(list.iter().map(record_from_value).collect())
}

fn record_from_value(v: &Value) -> Recommendation {
    let title = v
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let poster = v
        .get("poster")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned);
    let overview = v
        .get("overview")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_owned);
    // The match label is displayed as supplied; numbers are stringified,
    // anything else is dropped.
    let match_label = v.get("match").and_then(|m| match m {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    });

    Recommendation {
        title,
        poster,
        overview,
        match_label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_encodes_title() {
        let url = recommend_url("http://localhost:5000", "Toy Story");
        assert_eq!(url, "http://localhost:5000/recommend?title=Toy%20Story");
    }

    #[test]
    fn url_tolerates_trailing_slash() {
        let url = recommend_url("http://localhost:5000/", "Up");
        assert_eq!(url, "http://localhost:5000/recommend?title=Up");
    }

    #[test]
    fn server_error_text_is_extracted() {
        assert_eq!(
            parse_error_body(r#"{"error": "rate limited"}"#),
            Some("rate limited".to_string())
        );
    }

    #[test]
    fn unparseable_error_body_yields_fallback() {
        assert_eq!(parse_error_body("<html>502</html>"), None);
        assert_eq!(parse_error_body(r#"{"detail": "nope"}"#), None);

        let err = FetchError::Server {
            status: 502,
            message: None,
        };
        assert_eq!(err.user_message(), GENERIC_FETCH_ERROR);

        let err = FetchError::Server {
            status: 429,
            message: Some("rate limited".into()),
        };
        assert_eq!(err.user_message(), "rate limited");
    }

    #[test]
    fn missing_recommendations_field_is_payload_error() {
        let err = parse_success_body(r#"{"input_movie": "toy story"}"#).unwrap_err();
        assert!(matches!(err, FetchError::Payload(_)));
    }

    #[test]
    fn garbage_body_is_payload_error() {
        let err = parse_success_body("not json at all").unwrap_err();
        assert!(matches!(err, FetchError::Payload(_)));
    }

    #[test]
    fn empty_list_is_a_valid_success() {
        let recs = parse_success_body(r#"{"recommendations": []}"#).unwrap();
        assert!(recs.is_empty());
    }

    #[test]
    fn defective_records_degrade_instead_of_failing() {
        let body = r#"{"recommendations": [
            {"title": "Toy Story 2", "poster": "http://img/p.jpg", "overview": "Buzz again", "match": "97.5%"},
            {"poster": 42, "overview": null, "match": 88.1},
            {"title": "A Bug's Life", "poster": ""}
        ]}"#;
        let recs = parse_success_body(body).unwrap();
        assert_eq!(recs.len(), 3);

        assert_eq!(recs[0].title, "Toy Story 2");
        assert_eq!(recs[0].match_label.as_deref(), Some("97.5%"));

        // Missing title becomes empty, wrong-typed poster is dropped and a
        // numeric match is stringified.
        assert_eq!(recs[1].title, "");
        assert_eq!(recs[1].poster, None);
        assert_eq!(recs[1].overview, None);
        assert_eq!(recs[1].match_label.as_deref(), Some("88.1"));

        // Empty poster string counts as absent.
        assert_eq!(recs[2].poster, None);
    }
}
