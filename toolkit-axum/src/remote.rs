use axum::http::{header, StatusCode};
use serde::Serialize;
use toolkit_core::{ToolkitError, ToolkitResult};

/// POSTs `payload` as JSON to `uri` with a default `reqwest::Client`.
///
/// See [`push_json_with_client`].
pub async fn push_json<T>(uri: &str, payload: &T) -> ToolkitResult<(reqwest::Response, StatusCode)>
where
    T: Serialize + ?Sized,
{
    push_json_with_client(&reqwest::Client::new(), uri, payload).await
}

/// POSTs `payload` as JSON to `uri` using `client`.
///
/// Single attempt: timeouts and redirects are whatever `client` is configured
/// with. The response body is left unread for the caller.
pub async fn push_json_with_client<T>(
    client: &reqwest::Client,
    uri: &str,
    payload: &T,
) -> ToolkitResult<(reqwest::Response, StatusCode)>
where
    T: Serialize + ?Sized,
{
    let body = serde_json::to_vec(payload)?;

    let response = client
        .post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .send()
        .await
        .map_err(ToolkitError::remote)?;

    let status = response.status();
    tracing::debug!(uri, status = %status, "pushed JSON to remote");

    Ok((response, status))
}
