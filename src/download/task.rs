//! Per-resource download unit.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::api::Session;
use crate::config::MarkerPolicy;
use crate::download::report::ReportCollector;
use crate::error::Result;
use crate::fs::{ensure_dir, temp_path_for};
use crate::ledger::{hash_file, Classification, ContentDigest, Ledger};
use crate::resource::ResourceDescriptor;

/// Result of one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Unchanged; nothing written.
    Skipped,
    Downloaded,
    /// Transfer failed; the reason is also in the report.
    Failed(String),
}

/// Shared collaborators for all tasks of a run.
pub struct TaskContext<'a> {
    pub session: &'a dyn Session,
    pub ledger: &'a Ledger,
    pub report: &'a ReportCollector,
    /// Largest single write to disk.
    pub chunk_size: usize,
    pub atomic_writes: bool,
}

/// Download of one resource to one destination.
#[derive(Debug, Clone)]
pub struct DownloadTask {
    pub resource: ResourceDescriptor,
    pub destination: PathBuf,
    pub policy: MarkerPolicy,
}

impl DownloadTask {
    pub fn new(resource: ResourceDescriptor, destination: PathBuf, policy: MarkerPolicy) -> Self {
        Self {
            resource,
            destination,
            policy,
        }
    }

    /// Run the task.
    ///
    /// Transfer failures become [`Outcome::Failed`] and are recorded in the
    /// report; only ledger failures are returned as errors.
    pub async fn execute(&self, ctx: &TaskContext<'_>) -> Result<Outcome> {
        match self.policy {
            MarkerPolicy::Displayed => self.execute_displayed(ctx).await,
            MarkerPolicy::Checksum => self.execute_checksum(ctx).await,
        }
    }

    async fn execute_displayed(&self, ctx: &TaskContext<'_>) -> Result<Outcome> {
        let key = self.resource.key();
        let classification = ctx
            .ledger
            .classify(&key, &self.resource.url, &self.resource.marker, self.resource.kind)
            .await?;

        if classification == Classification::Fresh {
            tracing::debug!("Unchanged: {}", key);
            ctx.report.record_unchanged().await;
            return Ok(Outcome::Skipped);
        }
        self.record_change(ctx, classification, &key).await;

        let result = if ctx.atomic_writes {
            self.transfer_atomic(ctx).await
        } else {
            self.stream_to(ctx, &self.destination).await.map(|_| ())
        };

        match result {
            Ok(()) => {
                tracing::info!("Downloaded: {}", self.destination.display());
                Ok(Outcome::Downloaded)
            }
            Err(e) => Ok(self.fail(ctx, key, e.to_string()).await),
        }
    }

    async fn execute_checksum(&self, ctx: &TaskContext<'_>) -> Result<Outcome> {
        let key = self.resource.key();
        let temp = temp_path_for(&self.destination);

        let digest = match self.stream_to(ctx, &temp).await {
            Ok(digest) => digest,
            Err(e) => {
                remove_quietly(&temp).await;
                return Ok(self.fail(ctx, key, e.to_string()).await);
            }
        };

        let mut classification = match ctx
            .ledger
            .classify(&key, &self.resource.url, &digest, self.resource.kind)
            .await
        {
            Ok(classification) => classification,
            Err(e) => {
                remove_quietly(&temp).await;
                return Err(e);
            }
        };

        if classification == Classification::Unseen && self.local_copy_matches(&digest).await {
            tracing::debug!("Adopted existing file: {}", key);
            classification = Classification::Fresh;
        }

        if classification == Classification::Fresh {
            tracing::debug!("Unchanged content: {}", key);
            remove_quietly(&temp).await;
            ctx.report.record_unchanged().await;
            return Ok(Outcome::Skipped);
        }
        self.record_change(ctx, classification, &key).await;

        if let Err(e) = tokio::fs::rename(&temp, &self.destination).await {
            remove_quietly(&temp).await;
            return Ok(self.fail(ctx, key, e.to_string()).await);
        }

        tracing::info!("Downloaded: {}", self.destination.display());
        Ok(Outcome::Downloaded)
    }

    /// Whether an untracked file already at the destination has `digest`.
    async fn local_copy_matches(&self, digest: &str) -> bool {
        match hash_file(&self.destination).await {
            Ok(local) => local == digest,
            Err(_) => false,
        }
    }

    async fn transfer_atomic(&self, ctx: &TaskContext<'_>) -> Result<()> {
        let temp = temp_path_for(&self.destination);

        let result = match self.stream_to(ctx, &temp).await {
            Ok(_) => tokio::fs::rename(&temp, &self.destination)
                .await
                .map_err(Into::into),
            Err(e) => Err(e),
        };

        if result.is_err() {
            remove_quietly(&temp).await;
        }
        result
    }

    /// Stream the resource body into `path`, returning its MD5 digest.
    async fn stream_to(&self, ctx: &TaskContext<'_>, path: &Path) -> Result<String> {
        if let Some(parent) = path.parent() {
            ensure_dir(parent).await?;
        }

        let mut body = ctx.session.open(&self.resource.url).await?;
        let file = File::create(path).await?;
        let mut writer = BufWriter::with_capacity(ctx.chunk_size, file);
        let mut digest = ContentDigest::new();

        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            for piece in chunk.chunks(ctx.chunk_size.max(1)) {
                writer.write_all(piece).await?;
                digest.update(piece);
            }
        }

        writer.flush().await?;
        Ok(digest.finish())
    }

    async fn record_change(&self, ctx: &TaskContext<'_>, classification: Classification, key: &str) {
        match classification {
            Classification::Unseen => ctx.report.record_new(key.to_string()).await,
            Classification::Stale => ctx.report.record_updated(key.to_string()).await,
            Classification::Fresh => {}
        }
    }

    async fn fail(&self, ctx: &TaskContext<'_>, key: String, reason: String) -> Outcome {
        tracing::warn!("Failed: {}: {}", key, reason);
        ctx.report.record_error(key, reason.clone()).await;
        Outcome::Failed(reason)
    }
}

async fn remove_quietly(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::debug!("Could not remove {}: {}", path.display(), e);
        }
    }
}
