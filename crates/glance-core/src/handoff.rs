//! Selection → overlay handoff contract.
//!
//! The controller loads the overlay with two query parameters: `q`
//! (URL-encoded selected text, required) and `mode` (`short` | `long`,
//! optional, defaults to `long`).

use std::str::FromStr;

use url::Url;
use url::form_urlencoded;

use crate::error::{GlanceError, Result};
use crate::session::Mode;

pub const QUERY_PARAM: &str = "q";
pub const MODE_PARAM: &str = "mode";

/// Load parameters of one overlay instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayRequest {
    pub question: String,
    pub mode: Mode,
}

impl OverlayRequest {
    pub fn new(question: impl Into<String>, mode: Mode) -> Self {
        Self {
            question: question.into(),
            mode,
        }
    }

    /// Encodes the request as a query string (without the leading `?`).
    pub fn to_query(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair(QUERY_PARAM, &self.question)
            .append_pair(MODE_PARAM, &self.mode.to_string())
            .finish()
    }

    /// Returns `base` with this request as its query.
    pub fn to_url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        url.set_query(Some(&self.to_query()));
        url
    }

    /// Parses a query string (with or without the leading `?`).
    ///
    /// A missing or blank `q` is rejected. An absent `mode` defaults to
    /// `long`; an unrecognised one also falls back to `long`.
    pub fn from_query(query: &str) -> Result<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut question = None;
        let mut mode = None;

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                QUERY_PARAM => question = Some(value.into_owned()),
                MODE_PARAM => mode = Some(value.into_owned()),
                _ => {}
            }
        }

        let question = question
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| GlanceError::invalid_handoff("missing `q` parameter"))?;

        let mode = match mode.as_deref() {
            None => Mode::default(),
            Some(raw) => Mode::from_str(raw).unwrap_or_else(|_| {
                tracing::warn!(mode = raw, "Unknown overlay mode, falling back to long");
                Mode::default()
            }),
        };

        Ok(Self { question, mode })
    }

    /// Parses the query part of a full overlay URL.
    pub fn from_url(url: &Url) -> Result<Self> {
        Self::from_query(url.query().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_encodes_text_and_mode() {
        let request = OverlayRequest::new("Na < 135 & confusion?", Mode::Short);
        let query = request.to_query();
        assert!(query.starts_with("q=Na+%3C+135+%26+confusion%3F"));
        assert!(query.ends_with("mode=short"));
        assert_eq!(OverlayRequest::from_query(&query).unwrap(), request);
    }

    #[test]
    fn test_mode_defaults_to_long() {
        let request = OverlayRequest::from_query("?q=hyponatremia").unwrap();
        assert_eq!(request.mode, Mode::Long);
        assert_eq!(request.question, "hyponatremia");
    }

    #[test]
    fn test_unknown_mode_falls_back_to_long() {
        let request = OverlayRequest::from_query("q=sepsis&mode=verbose").unwrap();
        assert_eq!(request.mode, Mode::Long);
    }

    #[test]
    fn test_missing_question_is_rejected() {
        let err = OverlayRequest::from_query("mode=short").unwrap_err();
        assert!(matches!(err, GlanceError::InvalidHandoff(_)));
        assert!(OverlayRequest::from_query("q=%20%20").is_err());
    }

    #[test]
    fn test_url_round_trip_keeps_base() {
        let base = Url::parse("chrome-extension://abc/chat.html").unwrap();
        let url = OverlayRequest::new("SIADH", Mode::Long).to_url(&base);
        assert_eq!(url.path(), "/chat.html");
        assert_eq!(
            OverlayRequest::from_url(&url).unwrap(),
            OverlayRequest::new("SIADH", Mode::Long)
        );
    }
}
