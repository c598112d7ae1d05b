//! Strict JSON decoding and the response envelope.
//!
//! [`decode_json`] is stricter than `serde_json::from_slice`:
//! - exactly one JSON value per body (trailing data is rejected)
//! - unknown object keys are rejected unless explicitly allowed
//! - parser failures are mapped onto [`ToolkitError`] kinds instead of
//!   leaking raw `serde_json` messages

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::error::Category;

use crate::{ToolkitError, ToolkitResult};

/// Standard `{error, message, data}` wrapper for JSON responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonResponse<T = serde_json::Value> {
    pub error: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> JsonResponse<T> {
    /// Successful response carrying `data`
    pub fn success<S: Into<String>>(message: S, data: T) -> Self {
        Self {
            error: false,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Successful response without a payload
    pub fn message<S: Into<String>>(message: S) -> Self {
        Self {
            error: false,
            message: message.into(),
            data: None,
        }
    }

    /// Error response without a payload
    pub fn failure<S: Into<String>>(message: S) -> Self {
        Self {
            error: true,
            message: message.into(),
            data: None,
        }
    }
}

/// Decodes exactly one JSON value from `body` into `T`.
///
/// With `allow_unknown_fields == false`, any object key that `T` ignores fails
/// with [`ToolkitError::UnknownField`] naming its path (`outer.inner`).
///
/// Keys routed through a `#[serde(flatten)]` field are buffered by serde and
/// never reported as ignored, so unknown keys next to a flattened struct are
/// accepted. Types that need strict checking there can flatten into a
/// catch-all `serde_json::Map` and inspect it.
pub fn decode_json<T>(body: &[u8], allow_unknown_fields: bool) -> ToolkitResult<T>
where
    T: DeserializeOwned,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ToolkitError::EmptyBody);
    }

    let mut de = serde_json::Deserializer::from_slice(body);
    let mut unknown: Option<String> = None;
    let mut record_unknown = |path: serde_ignored::Path<'_>| {
        if unknown.is_none() {
            unknown = Some(path.to_string());
        }
    };

    let value: T = serde_path_to_error::deserialize(serde_ignored::Deserializer::new(
        &mut de,
        &mut record_unknown,
    ))
    .map_err(|err| classify(body, err))?;

    if let Some(field) = unknown {
        if !allow_unknown_fields {
            return Err(ToolkitError::UnknownField { field });
        }
    }

    de.end().map_err(|_| ToolkitError::MultipleValues)?;

    Ok(value)
}

fn classify(body: &[u8], err: serde_path_to_error::Error<serde_json::Error>) -> ToolkitError {
    let path = err.path().to_string();
    let inner = err.into_inner();
    let offset = byte_offset(body, inner.line(), inner.column());

    match inner.classify() {
        Category::Eof => ToolkitError::UnexpectedEof,
        Category::Syntax | Category::Io => ToolkitError::MalformedJson { offset },
        Category::Data => {
            let message = inner.to_string();
            if message.starts_with("unknown field") {
                let field = backticked(&message).unwrap_or(path);
                return ToolkitError::UnknownField { field };
            }

            let field = if path.is_empty() || path == "." {
                None
            } else {
                Some(path)
            };
            ToolkitError::TypeMismatchJson { field, offset }
        }
    }
}

/// Converts serde_json's 1-based line/column into a byte offset into `body`.
fn byte_offset(body: &[u8], line: usize, column: usize) -> usize {
    let line_start: usize = body
        .split(|b| *b == b'\n')
        .take(line.saturating_sub(1))
        .map(|l| l.len() + 1)
        .sum();
    (line_start + column).min(body.len())
}

/// First `` `quoted` `` token in a serde message.
fn backticked(message: &str) -> Option<String> {
    let start = message.find('`')? + 1;
    let len = message[start..].find('`')?;
    Some(message[start..start + len].to_string())
}
