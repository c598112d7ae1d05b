//! Multipart upload pipeline.
//!
//! Every file part of a `multipart/form-data` request is sniffed, checked
//! against the configured allow-list, optionally renamed and streamed to disk.
//! Parts are processed in the order the decoder yields them; the first failure
//! stops the whole upload and is returned together with the files already
//! written (nothing is rolled back).

use std::fmt;
use std::path::Path;

use axum::body::Body;
use axum::http::{header, HeaderMap, Request};
use bytes::Bytes;
use tokio::io::AsyncWriteExt;
use toolkit_core::{
    ensure_dir, random_string, ErrorKind, ToolkitError, ToolkitResult, ToolsConfig, UploadOptions,
    UploadedFile,
};

use crate::sniff::{sniff_content_type, SNIFF_LEN};

/// Length of the random stem used for renamed uploads.
pub const RANDOM_NAME_LEN: usize = 25;

const UPLOAD_SUBJECT: &str = "upload";

/// An upload that stopped part-way.
///
/// `uploaded` lists the files persisted before `source` occurred; they stay on
/// disk.
#[derive(Debug)]
pub struct UploadError {
    pub uploaded: Vec<UploadedFile>,
    pub source: ToolkitError,
}

impl UploadError {
    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::error::Error for UploadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

impl From<UploadError> for ToolkitError {
    fn from(e: UploadError) -> Self {
        e.source
    }
}

/// Stores every file part of `request` in `upload_dir`.
///
/// `upload_dir` is created when missing. The request as a whole may not exceed
/// the configured `max_file_size`; text form fields are skipped.
pub async fn upload_files(
    config: &ToolsConfig,
    request: Request<Body>,
    upload_dir: impl AsRef<Path>,
    options: UploadOptions,
) -> Result<Vec<UploadedFile>, UploadError> {
    let mut uploaded = Vec::new();
    match upload(config, request, upload_dir.as_ref(), options, None, &mut uploaded).await {
        Ok(()) => Ok(uploaded),
        Err(source) => Err(UploadError { uploaded, source }),
    }
}

/// Stores the first file part of `request` in `upload_dir`.
///
/// Decoding stops after the first file part: any later parts, files included,
/// are dropped unread and nothing is written for them. A request without any
/// file part fails with [`ToolkitError::NoFileProvided`].
pub async fn upload_one_file(
    config: &ToolsConfig,
    request: Request<Body>,
    upload_dir: impl AsRef<Path>,
    options: UploadOptions,
) -> Result<UploadedFile, UploadError> {
    let mut uploaded = Vec::new();
    if let Err(source) = upload(config, request, upload_dir.as_ref(), options, Some(1), &mut uploaded).await {
        return Err(UploadError { uploaded, source });
    }

    uploaded.pop().ok_or(UploadError {
        uploaded: Vec::new(),
        source: ToolkitError::NoFileProvided,
    })
}

async fn upload(
    config: &ToolsConfig,
    request: Request<Body>,
    upload_dir: &Path,
    options: UploadOptions,
    max_files: Option<usize>,
    uploaded: &mut Vec<UploadedFile>,
) -> ToolkitResult<()> {
    let limit = config.limits().max_file_size;

    ensure_dir(upload_dir).await?;

    if declared_length(request.headers()).is_some_and(|len| len > limit) {
        return Err(ToolkitError::too_large(UPLOAD_SUBJECT, limit));
    }

    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let boundary = multer::parse_boundary(content_type).map_err(|e| multipart_error(e, limit))?;

    let constraints = multer::Constraints::new()
        .size_limit(multer::SizeLimit::new().whole_stream(limit));
    let mut multipart = multer::Multipart::with_constraints(
        request.into_body().into_data_stream(),
        boundary,
        constraints,
    );

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        let Some(original) = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
        else {
            continue;
        };

        let file = store_field(field, original, upload_dir, config, options, limit).await?;
        uploaded.push(file);

        if max_files.is_some_and(|max| uploaded.len() >= max) {
            break;
        }
    }

    Ok(())
}

async fn store_field(
    mut field: multer::Field<'_>,
    original: String,
    upload_dir: &Path,
    config: &ToolsConfig,
    options: UploadOptions,
    limit: u64,
) -> ToolkitResult<UploadedFile> {
    // Buffer just enough chunks to sniff; they are written out first below.
    let mut head: Vec<Bytes> = Vec::new();
    let mut buffered = 0usize;
    while buffered < SNIFF_LEN {
        match field.chunk().await.map_err(|e| multipart_error(e, limit))? {
            Some(chunk) => {
                buffered += chunk.len();
                head.push(chunk);
            }
            None => break,
        }
    }

    let probe: Vec<u8> = head
        .iter()
        .flat_map(|chunk| chunk.iter().copied())
        .take(SNIFF_LEN)
        .collect();
    let content_type = sniff_content_type(&probe);

    if !config.is_file_type_allowed(&content_type) {
        tracing::warn!(
            file = %original,
            content_type = %content_type,
            "rejected upload with a file type outside the allow-list"
        );
        return Err(ToolkitError::TypeNotAllowed { content_type });
    }

    let new_file_name = if options.rename {
        renamed(&original)?
    } else {
        original.clone()
    };

    let path = upload_dir.join(&new_file_name);
    let mut out = tokio::fs::File::create(&path).await?;
    let mut file_size = 0u64;

    for chunk in head {
        out.write_all(&chunk).await?;
        file_size += chunk.len() as u64;
    }
    while let Some(chunk) = field.chunk().await.map_err(|e| multipart_error(e, limit))? {
        out.write_all(&chunk).await?;
        file_size += chunk.len() as u64;
    }
    out.flush().await?;

    tracing::debug!(
        file = %new_file_name,
        original = %original,
        content_type = %content_type,
        size = file_size,
        "stored uploaded file"
    );

    Ok(UploadedFile {
        new_file_name,
        original_file_name: original,
        file_size,
    })
}

/// Random stem plus the original extension, if any.
fn renamed(original: &str) -> ToolkitResult<String> {
    let stem = random_string(RANDOM_NAME_LEN)?;
    Ok(format!("{stem}{}", extension(original)))
}

/// Suffix from the last `.` of the final path element, dot included.
///
/// Unlike [`Path::extension`], dotfiles keep their whole name (`.env`).
fn extension(name: &str) -> &str {
    let base = name.rsplit('/').next().unwrap_or(name);
    base.rfind('.').map_or("", |dot| &base[dot..])
}

fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
}

fn multipart_error(err: multer::Error, limit: u64) -> ToolkitError {
    match err {
        multer::Error::StreamSizeExceeded { .. } | multer::Error::FieldSizeExceeded { .. } => {
            ToolkitError::too_large(UPLOAD_SUBJECT, limit)
        }
        other => ToolkitError::multipart(other.to_string()),
    }
}
