use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::Error;

/// Appends chat lines to `<root>/<channel>/<YYYY-MM-DD>/<YYYY-MM-DD>.txt`.
#[derive(Debug, Clone)]
pub struct ChatLogWriter {
    root: PathBuf,
}

impl ChatLogWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn log_line(&self, channel: &str, user: &str, text: &str) -> Result<PathBuf, Error> {
        self.log_line_at(Local::now(), channel, user, text).await
    }

    pub async fn log_line_at(
        &self,
        at: DateTime<Local>,
        channel: &str,
        user: &str,
        text: &str,
    ) -> Result<PathBuf, Error> {
        let date = at.format("%Y-%m-%d").to_string();
        let dir = self.root.join(channel).join(&date);
        fs::create_dir_all(&dir).await?;

        let path = dir.join(format!("{date}.txt"));
        let line = format!("{} {}: {}\n", at.format("%Y-%m-%d %H:%M:%S"), user, text);

        let mut file = OpenOptions::new().create(true).append(true).open(&path).await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(path)
    }

    /// Creates and returns `<root>/images`.
    pub async fn ensure_images_dir(&self) -> Result<PathBuf, Error> {
        let dir = self.root.join("images");
        fs::create_dir_all(&dir).await?;
        Ok(dir)
    }
}
