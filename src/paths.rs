use anyhow::{Context, Result};
use std::path::PathBuf;

/// Get the application's data directory following XDG standards
/// On Linux: ~/.local/share/songkey
pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .context("Failed to determine user data directory")?
        .join("songkey");

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

    Ok(data_dir)
}

/// Get the application's log directory
pub fn get_log_dir() -> Result<PathBuf> {
    let log_dir = get_data_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
    Ok(log_dir)
}
