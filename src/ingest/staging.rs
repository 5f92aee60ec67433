use std::path::{Path, PathBuf};

/// Writes the aggregated text for an origin into the staging directory
///
/// The file is kept for auditing after upload and never read back. Existing
/// files with the same name are overwritten.
pub async fn write_staging_file(
    staging_dir: &Path,
    file_name: &str,
    text: &str,
) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(staging_dir).await?;
    let path = staging_dir.join(file_name);
    tokio::fs::write(&path, text).await?;
    tracing::debug!("Wrote {} bytes to {}", text.len(), path.display());
    Ok(path)
}
