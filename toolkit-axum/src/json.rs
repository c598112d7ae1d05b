use std::fmt;

use axum::{
    body::{Body, Bytes},
    extract::{FromRef, FromRequest, Request},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::Response,
};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use serde::de::DeserializeOwned;
use serde::Serialize;
use toolkit_core::{decode_json, JsonResponse, ToolkitError, ToolkitResult, ToolsConfig};

use crate::ToolkitAxumError;

const JSON_SUBJECT: &str = "body";

/// Reads the request body as exactly one JSON value of type `T`.
///
/// The body is capped at `config.limits().max_json_size` and unknown object
/// keys are rejected unless `config.allow_unknown_json_fields` is set. Keys
/// captured by a `#[serde(flatten)]` field are not checked; see
/// [`toolkit_core::decode_json`].
pub async fn read_json<T>(config: &ToolsConfig, request: Request) -> ToolkitResult<T>
where
    T: DeserializeOwned,
{
    let limit = config.limits().max_json_size;
    let body = read_limited(request.into_body(), limit).await?;
    decode_json(&body, config.allow_unknown_json_fields)
}

async fn read_limited(body: Body, limit: u64) -> ToolkitResult<Bytes> {
    let cap = usize::try_from(limit).unwrap_or(usize::MAX);
    match Limited::new(body, cap).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
            Err(ToolkitError::too_large(JSON_SUBJECT, limit))
        }
        Err(err) => Err(std::io::Error::other(err).into()),
    }
}

/// Serializes `payload` as the response body with `Content-Type: application/json`.
pub fn write_json<T>(status: StatusCode, payload: &T) -> ToolkitResult<Response>
where
    T: Serialize + ?Sized,
{
    write_json_with_headers(status, payload, HeaderMap::new())
}

/// Like [`write_json`], adding `headers` to the response.
///
/// A header named in `headers` replaces every value of that header;
/// `Content-Type` is always `application/json`.
pub fn write_json_with_headers<T>(
    status: StatusCode,
    payload: &T,
    headers: HeaderMap,
) -> ToolkitResult<Response>
where
    T: Serialize + ?Sized,
{
    let body = serde_json::to_vec(payload)?;

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;

    let target = response.headers_mut();
    for name in headers.keys() {
        target.remove(name);
    }
    for (name, value) in headers.iter() {
        target.append(name.clone(), value.clone());
    }
    target.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Ok(response)
}

/// Sends `err` as a `400 Bad Request` error envelope.
pub fn error_json<E>(err: &E) -> ToolkitResult<Response>
where
    E: fmt::Display + ?Sized,
{
    error_json_with_status(err, StatusCode::BAD_REQUEST)
}

/// Sends `err` as an error envelope with the given status.
pub fn error_json_with_status<E>(err: &E, status: StatusCode) -> ToolkitResult<Response>
where
    E: fmt::Display + ?Sized,
{
    let payload: JsonResponse = JsonResponse::failure(err.to_string());
    write_json(status, &payload)
}

/// JSON body extractor with the strict [`read_json`] rules.
///
/// The [`ToolsConfig`] comes from router state, so the state must provide one
/// through `FromRef` (see [`crate::ToolkitState`]). Rejections are sent as
/// error envelopes.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictJson<T>(pub T);

impl<T, S> FromRequest<S> for StrictJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    ToolsConfig: FromRef<S>,
{
    type Rejection = ToolkitAxumError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let config = ToolsConfig::from_ref(state);
        let value = read_json(&config, req).await?;
        Ok(StrictJson(value))
    }
}
