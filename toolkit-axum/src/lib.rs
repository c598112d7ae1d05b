//! toolkit-axum: axum integration for toolkit.
//!
//! HTTP-facing helpers for the chores most backends end up rewriting:
//! multipart uploads with MIME allow-lists, strict JSON bodies, the
//! `{error, message, data}` response envelope, forced-download file serving
//! and pushing JSON to another service.

pub mod download;
pub mod json;
pub mod remote;
pub mod sniff;
pub mod state;
pub mod upload;
mod error;

pub use download::download_static_file;
pub use error::ToolkitAxumError;
pub use json::{error_json, error_json_with_status, read_json, write_json, write_json_with_headers, StrictJson};
pub use remote::{push_json, push_json_with_client};
pub use sniff::sniff_content_type;
pub use state::ToolkitState;
pub use upload::{upload_files, upload_one_file, UploadError};

pub use toolkit_core;
pub use toolkit_core::{
    ErrorKind, JsonResponse, ToolkitError, ToolkitResult, ToolsConfig, UploadOptions, UploadedFile,
};
