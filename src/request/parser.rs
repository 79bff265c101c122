//! Query string and form parsing utilities.

use std::borrow::Cow;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::entities;
use crate::types::{set_param, ParamList};

/// Characters `urlencode` leaves alone: ASCII alphanumerics and `-_.`.
const FORM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// Form decode: `+` becomes a space, then percent-decoding.
#[inline]
pub fn form_decode(s: &str) -> String {
    let s: Cow<'_, str> = if s.contains('+') {
        Cow::Owned(s.replace('+', " "))
    } else {
        Cow::Borrowed(s)
    };

    if s.contains('%') {
        percent_encoding::percent_decode_str(&s)
            .decode_utf8_lossy()
            .into_owned()
    } else {
        s.into_owned()
    }
}

/// Form encode like PHP `urlencode` (space as `+`, upper-case hex).
#[inline]
pub fn form_encode(s: &str) -> String {
    utf8_percent_encode(s, FORM_ENCODE_SET)
        .to_string()
        .replace("%20", "+")
}

/// Normalize a decoded key: leading spaces dropped, `.` and ` ` become `_`.
fn normalize_key(key: &str) -> String {
    key.trim_start_matches(' ')
        .chars()
        .map(|c| if c == '.' || c == ' ' { '_' } else { c })
        .collect()
}

/// Parse a query string or urlencoded body into key-value pairs.
///
/// Repeated keys keep their first position and take the last value.
/// Bracketed array keys (`a[]`) are kept verbatim.
pub fn parse_query_string(query: &str) -> ParamList {
    let pair_count = query.matches('&').count() + 1;
    let mut params = Vec::with_capacity(pair_count.min(16));

    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }

        let (key, value) = match pair.find('=') {
            Some(pos) => (&pair[..pos], &pair[pos + 1..]),
            None => (pair, ""),
        };

        let key = normalize_key(&form_decode(key));
        if !key.is_empty() {
            set_param(&mut params, key, form_decode(value));
        }
    }

    params
}

/// Serialize parameters as a canonical `key=value&...` string.
pub fn build_query_string(params: &[(String, String)]) -> String {
    let mut out = String::with_capacity(params.len() * 16);
    for (i, (key, value)) in params.iter().enumerate() {
        if i > 0 {
            out.push('&');
        }
        out.push_str(&form_encode(key));
        out.push('=');
        out.push_str(&form_encode(value));
    }
    out
}

/// Cookies are never parsed from the client request.
#[inline]
pub fn parse_cookies(_cookie_header: Option<&str>) -> ParamList {
    ParamList::new()
}

/// Decode HTML 4.01 named and numeric entities (quotes included) the way
/// `html_entity_decode` does.
///
/// Unknown or unterminated entities are copied through untouched.
pub fn decode_html_entities(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest
            .find(';')
            .filter(|&semi| semi > 1 && semi <= 10)
            .and_then(|semi| entity_char(&rest[1..semi]).map(|c| (c, semi)));

        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    Cow::Owned(out)
}

fn entity_char(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code).filter(|c| *c != '\0');
    }

    entities::lookup(name)
}
