use std::path::Path;

use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderValue},
    response::Response,
};
use toolkit_core::{ToolkitError, ToolkitResult};
use tower::ServiceExt;
use tower_http::services::ServeFile;

/// Serves the file at `path` as a download named `display_name`.
///
/// Conditional requests, ranges and `Content-Length` are handled by
/// `ServeFile`; missing or unreadable files come back as its 404/500
/// responses. Successful responses carry
/// `Content-Disposition: attachment; filename="<display_name>"`, whatever the
/// file is called on disk.
pub async fn download_static_file(
    request: Request,
    path: impl AsRef<Path>,
    display_name: &str,
) -> ToolkitResult<Response> {
    let disposition = attachment(display_name)?;

    let response = match ServeFile::new(path.as_ref()).oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };

    let mut response = response.map(Body::new);
    if response.status().is_success() {
        response
            .headers_mut()
            .insert(header::CONTENT_DISPOSITION, disposition);
    } else {
        tracing::debug!(
            path = %path.as_ref().display(),
            status = %response.status(),
            "static download not served"
        );
    }

    Ok(response)
}

fn attachment(display_name: &str) -> ToolkitResult<HeaderValue> {
    let mut escaped = String::with_capacity(display_name.len());
    for c in display_name.chars().filter(|c| !c.is_control()) {
        if matches!(c, '"' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    HeaderValue::from_bytes(format!("attachment; filename=\"{escaped}\"").as_bytes()).map_err(|_| {
        ToolkitError::InvalidHeader {
            name: "content-disposition",
        }
    })
}
