use std::sync::LazyLock;

use regex::Regex;

use crate::{ToolkitError, ToolkitResult};

/// Any run of characters that cannot appear in a slug.
#[allow(clippy::expect_used)]
static NON_SLUG_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-z0-9]+").expect("slug pattern is valid"));

/// Turns arbitrary text into a lowercase, hyphen-delimited, URL-safe slug.
///
/// Non-ASCII letters are dropped rather than transliterated, so
/// `"hello world こんにちは世界"` becomes `"hello-world"`.
///
/// # Errors
///
/// - [`ToolkitError::EmptyInput`] when `input` is empty
/// - [`ToolkitError::EmptyResult`] when nothing slug-worthy is left
pub fn slugify(input: &str) -> ToolkitResult<String> {
    if input.is_empty() {
        return Err(ToolkitError::EmptyInput);
    }

    let lowered = input.to_lowercase();
    let slug = NON_SLUG_RUN.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');

    if slug.is_empty() {
        return Err(ToolkitError::EmptyResult);
    }

    Ok(slug.to_string())
}
