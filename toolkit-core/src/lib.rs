//! toolkit-core: transport-agnostic helpers for web backends.
//!
//! Everything in here works on plain values, byte slices and paths. The
//! HTTP-facing pieces (multipart uploads, JSON responses, downloads) live in
//! `toolkit-axum` and build on these.

pub mod config;
pub mod errors;
pub mod fs;
pub mod json;
pub mod random;
pub mod slug;
pub mod types;

pub use config::{Limits, ToolsConfig, DEFAULT_MAX_FILE_SIZE, DEFAULT_MAX_JSON_SIZE};
pub use errors::{ErrorKind, ToolkitError, ToolkitResult};
pub use fs::ensure_dir;
pub use json::{decode_json, JsonResponse};
pub use random::{random_string, RANDOM_STRING_SOURCE};
pub use slug::slugify;
pub use types::{UploadOptions, UploadedFile};
