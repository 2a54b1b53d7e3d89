// src/core/fs_ops.rs
//! Reading report text from disk or stdin

use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::app_log;

pub struct FsOps;

impl FsOps {
    /// Read a report from `path`, or from stdin when no path (or `-`) is given
    pub async fn read_input(path: Option<&Path>) -> Result<String> {
        match path {
            Some(path) if path != Path::new("-") => Self::read_file_safe(path).await,
            _ => Self::read_to_string(tokio::io::stdin())
                .await
                .context("Failed to read report from stdin"),
        }
    }

    pub async fn read_file_safe(path: &Path) -> Result<String> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        app_log!(debug, "Read {} bytes from {}", content.len(), path.display());
        Ok(content)
    }

    pub async fn read_to_string<R: AsyncRead + Unpin>(mut reader: R) -> Result<String> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .await
            .context("Input is not valid UTF-8")?;
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_to_string_from_reader() {
        let content = FsOps::read_to_string("[1. 종합]\n최종 분류 : [보류]".as_bytes())
            .await
            .unwrap();
        assert!(content.contains("보류"));
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let err = FsOps::read_input(Some(Path::new("/nonexistent/report.txt")))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }
}
