//! Request body decoding into a [`Value`] payload.
//!
//! The media type of the `Content-Type` header picks the decoder:
//!
//! | Media type                          | Payload                                  |
//! |-------------------------------------|------------------------------------------|
//! | `application/json`                  | parsed JSON tree, `Null` if malformed    |
//! | `multipart/form-data`               | Object of text fields, first value wins  |
//! | `application/x-www-form-urlencoded` | Object of fields, first value wins       |
//! | anything else, or no header         | the raw body as a `String`               |
//!
//! An empty body follows the same table: `Null` for JSON, an empty Object for
//! the form types and an empty `String` otherwise.

use tracing::debug;

use crate::value::{Object, Value};

const JSON: &str = "application/json";
const MULTIPART: &str = "multipart/form-data";
const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Decode `body` according to `content_type`.
pub fn decode_body(body: &[u8], content_type: Option<&str>) -> Value {
    let content_type = content_type.unwrap_or_default();
    let media_type = media_type(content_type);

    if media_type.eq_ignore_ascii_case(JSON) {
        decode_json(body)
    } else if media_type.eq_ignore_ascii_case(MULTIPART) {
        match extract_boundary(content_type) {
            Some(boundary) => decode_multipart(body, &boundary),
            None => {
                debug!(content_type = %content_type, "Multipart body without boundary");
                Value::Object(Object::new())
            }
        }
    } else if media_type.eq_ignore_ascii_case(FORM_URLENCODED) {
        decode_form(body)
    } else {
        Value::String(String::from_utf8_lossy(body).into_owned())
    }
}

/// The part of a `Content-Type` value before any `;` parameters.
fn media_type(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or_default().trim()
}

fn decode_json(body: &[u8]) -> Value {
    if body.is_empty() {
        return Value::Null;
    }
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(json) => Value::from(json),
        Err(err) => {
            debug!(error = %err, body_size_bytes = body.len(), "JSON body parse failed");
            Value::Null
        }
    }
}

fn decode_form(body: &[u8]) -> Value {
    let mut fields = Object::new();
    for (key, value) in url::form_urlencoded::parse(body) {
        fields
            .entry(key.into_owned())
            .or_insert_with(|| Value::String(value.into_owned()));
    }
    Value::Object(fields)
}

/// Boundary parameter of a multipart `Content-Type`, quotes removed.
pub(crate) fn extract_boundary(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.trim().split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("boundary"))
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|boundary| !boundary.is_empty())
}

fn decode_multipart(body: &[u8], boundary: &str) -> Value {
    let delimiter = format!("--{boundary}");
    let mut fields = Object::new();

    for part in split_parts(body, delimiter.as_bytes()) {
        let Some((headers, content)) = split_headers_body(part) else {
            continue;
        };
        let disposition = ContentDisposition::parse(headers);
        let Some(name) = disposition.name else {
            continue;
        };
        if disposition.filename.is_some() {
            debug!(field = %name, "Skipping multipart file part");
            continue;
        }
        fields
            .entry(name)
            .or_insert_with(|| Value::String(String::from_utf8_lossy(content).into_owned()));
    }

    Value::Object(fields)
}

/// Parts between consecutive delimiters; stops at the closing `--boundary--`.
fn split_parts<'a>(body: &'a [u8], delimiter: &[u8]) -> Vec<&'a [u8]> {
    let mut parts = Vec::new();

    let Some(start) = find_bytes(body, delimiter) else {
        return parts;
    };
    let mut remaining = &body[start + delimiter.len()..];

    loop {
        if remaining.starts_with(b"--") {
            break;
        }
        remaining = skip_crlf(remaining);
        match find_bytes(remaining, delimiter) {
            Some(pos) => {
                parts.push(strip_trailing_crlf(&remaining[..pos]));
                remaining = &remaining[pos + delimiter.len()..];
            }
            None => {
                // Unterminated body: keep what is there
                let part = strip_trailing_crlf(remaining);
                if !part.is_empty() {
                    parts.push(part);
                }
                break;
            }
        }
    }

    parts
}

fn split_headers_body(part: &[u8]) -> Option<(&[u8], &[u8])> {
    const SEPARATOR: &[u8] = b"\r\n\r\n";
    find_bytes(part, SEPARATOR).map(|pos| (&part[..pos], &part[pos + SEPARATOR.len()..]))
}

#[derive(Debug, Default, PartialEq)]
struct ContentDisposition {
    name: Option<String>,
    filename: Option<String>,
}

impl ContentDisposition {
    fn parse(headers: &[u8]) -> Self {
        let headers = String::from_utf8_lossy(headers);
        let mut disposition = Self::default();

        for line in headers.split("\r\n") {
            let Some((header, value)) = line.split_once(':') else {
                continue;
            };
            if !header.trim().eq_ignore_ascii_case("content-disposition") {
                continue;
            }
            for param in value.split(';').skip(1) {
                let Some((key, val)) = param.trim().split_once('=') else {
                    continue;
                };
                let val = val.trim().trim_matches('"').to_string();
                match key.trim().to_ascii_lowercase().as_str() {
                    "name" => disposition.name = Some(val),
                    "filename" => disposition.filename = Some(val),
                    _ => {}
                }
            }
        }

        disposition
    }
}

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn skip_crlf(data: &[u8]) -> &[u8] {
    data.strip_prefix(b"\r\n").unwrap_or(data)
}

fn strip_trailing_crlf(data: &[u8]) -> &[u8] {
    data.strip_suffix(b"\r\n").unwrap_or(data)
}
