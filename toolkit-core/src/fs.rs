use std::io::ErrorKind as IoErrorKind;
use std::path::Path;

use crate::ToolkitResult;

/// Creates `path` and any missing parents (mode `0755` on unix).
///
/// Anything already present at `path`, directory or not, is left untouched and
/// counts as success, so repeated calls never fail.
pub async fn ensure_dir(path: impl AsRef<Path>) -> ToolkitResult<()> {
    let path = path.as_ref();

    match tokio::fs::metadata(path).await {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == IoErrorKind::NotFound => {
            let mut builder = tokio::fs::DirBuilder::new();
            builder.recursive(true);
            #[cfg(unix)]
            builder.mode(0o755);

            builder.create(path).await?;
            tracing::debug!(path = %path.display(), "created directory");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
