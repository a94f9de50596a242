//! JSON record output. A record's file existing means the record is complete.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use limitless_api::types::{Set, Tournament};
use serde::Serialize;
use tokio::sync::Semaphore;

use crate::error::{ExtractError, Result};

const SETS_DIR: &str = "sets";
const TOURNAMENTS_DIR: &str = "tournaments";

/// Writes sets to `<root>/sets/<code>.json` and tournaments to
/// `<root>/tournaments/<id>.json`.
///
/// Files are written to a temporary sibling and renamed into place, so the
/// final path never holds a partial record.
pub struct RecordWriter {
    root: PathBuf,
    files: Arc<Semaphore>,
}

impl RecordWriter {
    pub fn new(root: impl Into<PathBuf>, files: Arc<Semaphore>) -> Self {
        Self {
            root: root.into(),
            files,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn sets_dir(&self) -> PathBuf {
        self.root.join(SETS_DIR)
    }

    pub fn tournaments_dir(&self) -> PathBuf {
        self.root.join(TOURNAMENTS_DIR)
    }

    pub fn set_path(&self, code: &str) -> PathBuf {
        self.sets_dir().join(format!("{}.json", code))
    }

    pub fn tournament_path(&self, id: &str) -> PathBuf {
        self.tournaments_dir().join(format!("{}.json", id))
    }

    pub async fn set_exists(&self, code: &str) -> bool {
        is_file(&self.set_path(code)).await
    }

    pub async fn tournament_exists(&self, id: &str) -> bool {
        is_file(&self.tournament_path(id)).await
    }

    /// Writes a set. Refuses sets whose cards have not been extracted.
    pub async fn write_set(&self, set: &Set) -> Result<PathBuf> {
        if set.cards.is_none() {
            return Err(ExtractError::IncompleteSet {
                code: set.code.clone(),
            });
        }
        let path = self.set_path(&set.code);
        self.write_json(&path, set).await?;
        Ok(path)
    }

    pub async fn write_tournament(&self, tournament: &Tournament) -> Result<PathBuf> {
        let path = self.tournament_path(&tournament.id);
        self.write_json(&path, tournament).await?;
        Ok(path)
    }

    /// Number of record files currently in a record directory.
    pub fn count_files(dir: &Path) -> usize {
        std::fs::read_dir(dir)
            .map(|entries| {
                entries
                    .filter_map(|entry| entry.ok())
                    .filter(|entry| {
                        let path = entry.path();
                        path.is_file() && path.extension().is_some_and(|ext| ext == "json")
                    })
                    .count()
            })
            .unwrap_or(0)
    }

    async fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let body = serde_json::to_vec_pretty(value)?;
        let write_err = |source: std::io::Error| ExtractError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }

        let tmp = path.with_extension("json.tmp");
        let _permit = self.files.acquire().await.map_err(|e| {
            write_err(std::io::Error::new(std::io::ErrorKind::Other, e))
        })?;
        tokio::fs::write(&tmp, &body).await.map_err(write_err)?;
        tokio::fs::rename(&tmp, path).await.map_err(|e| {
            tracing::error!("Failed to move {} into place: {}", tmp.display(), e);
            write_err(e)
        })?;
        Ok(())
    }
}

async fn is_file(path: &Path) -> bool {
    matches!(tokio::fs::metadata(path).await, Ok(meta) if meta.is_file())
}
