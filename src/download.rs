//! Handing entry bytes to whatever saves them.

use anyhow::{Result, bail};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Receives the bytes of an extracted entry with a suggested file name.
#[async_trait]
pub trait DownloadSink: Send + Sync {
    async fn save(&self, suggested_name: &str, bytes: Vec<u8>) -> Result<()>;
}

/// Saves downloads into a directory on disk
pub struct DirectorySink {
    dir: PathBuf,
    overwrite: bool,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            overwrite: false,
        }
    }

    /// Replace existing files instead of refusing
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl DownloadSink for DirectorySink {
    async fn save(&self, suggested_name: &str, bytes: Vec<u8>) -> Result<()> {
        // Only a bare file name may land in the directory
        if suggested_name.is_empty()
            || suggested_name == "."
            || suggested_name == ".."
            || suggested_name.contains(['/', '\\'])
        {
            bail!("Refusing to save under name {:?}", suggested_name);
        }

        fs::create_dir_all(&self.dir).await?;
        let output_path = self.dir.join(suggested_name);
        if !self.overwrite && fs::try_exists(&output_path).await? {
            bail!("{} exists (overwrite disabled)", output_path.display());
        }

        let mut file = fs::File::create(&output_path).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;
        Ok(())
    }
}
