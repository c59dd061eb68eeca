//! Turns content sources into files the diff tool can open

use crate::error::{DiffError, Result};
use crate::models::{ContentSource, ResolvedPath};
use crate::services::git::BlobFetcher;
use crate::services::temp_files::TempFileScope;

/// Produce a concrete path for `source`.
///
/// Plain files are passed through untouched; everything else is written to
/// a temp file tracked by `scope`. Failures are wrapped with a description
/// of the source.
pub async fn resolve(
    source: &ContentSource,
    scope: &mut TempFileScope,
    fetcher: &dyn BlobFetcher,
) -> Result<ResolvedPath> {
    resolve_inner(source, scope, fetcher)
        .await
        .map_err(|reason| DiffError::Resolution {
            description: source.to_string(),
            reason: Box::new(reason),
        })
}

async fn resolve_inner(
    source: &ContentSource,
    scope: &mut TempFileScope,
    fetcher: &dyn BlobFetcher,
) -> Result<ResolvedPath> {
    let prefix = source.temp_prefix();
    let prefix = prefix.as_deref().unwrap_or_default();

    let resolved = match source {
        ContentSource::OnDiskFile { path } => ResolvedPath::existing(path),
        ContentSource::BufferSnapshot { text, .. } | ContentSource::ClipboardSnapshot { text } => {
            scope.materialize(text.as_bytes(), prefix).await?
        }
        ContentSource::GitRevision { path, revision } => {
            let blob = fetcher.fetch_blob(path, *revision).await?;
            scope.materialize(&blob, prefix).await?
        }
    };

    tracing::debug!("Resolved {} to {}", source, resolved.path.display());
    Ok(resolved)
}
