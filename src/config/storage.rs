//! Storage Config

use std::path::PathBuf;

use clap::Args;

/// Local storage settings.
#[derive(Debug, Args)]
pub struct StorageConfig {
    /// Directory holding the persisted cart and session flags
    #[arg(long, env = "KIOSK_STORAGE_DIR", default_value = ".kiosk")]
    pub storage_dir: PathBuf,
}
