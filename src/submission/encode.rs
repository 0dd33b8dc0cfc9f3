//! URL component encoding for game titles

use super::SubmissionError;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything except ASCII letters, digits and `-_.~` is escaped.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a title so it can be used as a single query value.
pub fn encode_title(title: &str) -> String {
    utf8_percent_encode(title, COMPONENT).to_string()
}

/// Reverse of [`encode_title`].
pub fn decode_title(value: &str) -> Result<String, SubmissionError> {
    Ok(percent_decode_str(value).decode_utf8()?.into_owned())
}

/// Pull the decoded `game` value out of a query string or a full URL.
///
/// Returns `Ok(None)` when the parameter is absent. A bare `game` key with no
/// `=` counts as an empty title.
pub fn extract_game_param(url_or_query: &str) -> Result<Option<String>, SubmissionError> {
    let query = match url_or_query.split_once('?') {
        Some((_, rest)) => rest,
        None => url_or_query,
    };
    let query = query.split('#').next().unwrap_or_default();

    for pair in query.split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key == super::GAME_PARAM {
            return decode_title(value).map(Some);
        }
    }

    Ok(None)
}
