use std::{fs, io::Write, path::Path};

use log::{debug, error, info, trace, warn};
use tempfile::NamedTempFile;

use crate::{
    remote_parent, BlobStore, Config, FailurePolicy, Journal, JournalError, RemoteError, Result,
    YandexDisk,
};

/// Upload attempts made before falling back to delete-and-reupload.
pub const MAX_UPLOAD_ATTEMPTS: u32 = 3;

/// Where a [`RecordStore::write`] ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Confirmed by the remote store
    Remote,
    /// Written to the local file in local-only mode
    Local,
    /// Remote write failed; the local fallback file was written instead
    LocalFallback,
    /// Nothing was persisted
    Failed,
}

impl WriteOutcome {
    /// True iff the write is confirmed in the primary backend.
    pub fn is_durable(self) -> bool {
        matches!(self, WriteOutcome::Remote | WriteOutcome::Local)
    }

    /// True if the journal was stored anywhere at all.
    pub fn is_persisted(self) -> bool {
        self != WriteOutcome::Failed
    }
}

/// Reads and writes the whole journal document.
///
/// There is no cache: every call round-trips to the backend. Remote failures
/// never escape `read`/`write`; they are resolved with the configured
/// [`FailurePolicy`].
pub struct RecordStore<B> {
    /// Application configuration
    config: Config,

    /// Remote backend, present iff a token is configured
    remote: Option<B>,
}

impl RecordStore<YandexDisk> {
    /// Creates a store backed by Yandex Disk when the configuration has a token.
    pub fn from_config(config: Config) -> Self {
        let remote = YandexDisk::from_config(&config);
        Self::new(config, remote)
    }
}

impl<B: BlobStore> RecordStore<B> {
    pub fn new(config: Config, remote: Option<B>) -> Self {
        match &remote {
            Some(_) => info!(
                "Record store using remote path {} (policy: {:?}, local file: {})",
                config.remote_path,
                config.failure_policy,
                config.local_fallback.display()
            ),
            None => info!(
                "Record store in local-only mode: {}",
                config.local_fallback.display()
            ),
        }
        Self { config, remote }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn remote(&self) -> Option<&B> {
        self.remote.as_ref()
    }

    /// Loads the whole journal.
    ///
    /// A missing remote object is an empty journal. On remote failure the
    /// strict policy yields an empty journal and the fallback policy reads the
    /// local file.
    pub async fn read(&self) -> Journal {
        let Some(remote) = &self.remote else {
            return self.read_local();
        };

        match self.read_remote(remote).await {
            Ok(journal) => {
                debug!("Read {} records from remote store", journal.len());
                journal
            }
            Err(e) => match self.config.failure_policy {
                FailurePolicy::Strict => {
                    error!("Remote read failed, returning an empty journal: {}", e);
                    Journal::default()
                }
                FailurePolicy::LocalFallback => {
                    warn!("Remote read failed, reading local fallback: {}", e);
                    self.read_local()
                }
            },
        }
    }

    async fn read_remote(&self, remote: &B) -> std::result::Result<Journal, RemoteError> {
        let path = self.config.remote_path.as_str();
        if !remote.exists(path).await? {
            info!("No remote journal at {} yet", path);
            return Ok(Journal::default());
        }

        let bytes = remote.download(path).await?;
        trace!("Parsing {} bytes of remote journal", bytes.len());
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn read_local(&self) -> Journal {
        match self.try_read_local() {
            Ok(journal) => journal,
            Err(e) => {
                warn!(
                    "Failed to read local journal {}, treating it as empty: {}",
                    self.config.local_fallback.display(),
                    e
                );
                Journal::default()
            }
        }
    }

    fn try_read_local(&self) -> Result<Journal> {
        let path = &self.config.local_fallback;
        if !path.exists() {
            debug!("Local journal {} does not exist yet", path.display());
            return Ok(Journal::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            error!("Failed to open local journal {}: {}", path.display(), e);
            JournalError::Io(e)
        })?;
        let journal: Journal = serde_json::from_str(&content)?;
        debug!("Read {} records from {}", journal.len(), path.display());
        Ok(journal)
    }

    /// Persists the whole journal.
    ///
    /// An empty journal removes the remote object instead of storing `[]`.
    pub async fn write(&self, journal: &Journal) -> WriteOutcome {
        trace!("Serializing journal to JSON");
        let bytes = match serde_json::to_vec_pretty(journal) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Failed to serialize journal: {}", e);
                return WriteOutcome::Failed;
            }
        };

        let Some(remote) = &self.remote else {
            return match self.write_local(&bytes) {
                Ok(()) => WriteOutcome::Local,
                Err(e) => {
                    error!("Failed to write local journal: {}", e);
                    WriteOutcome::Failed
                }
            };
        };

        match self.write_remote(remote, journal, &bytes).await {
            Ok(()) => {
                info!("Saved {} records to remote store", journal.len());
                WriteOutcome::Remote
            }
            Err(e) => match self.config.failure_policy {
                FailurePolicy::Strict => {
                    error!("Remote write failed: {}", e);
                    WriteOutcome::Failed
                }
                FailurePolicy::LocalFallback => {
                    warn!("Remote write failed, saving to local fallback: {}", e);
                    match self.write_local(&bytes) {
                        Ok(()) => WriteOutcome::LocalFallback,
                        Err(e) => {
                            error!("Local fallback write failed too: {}", e);
                            WriteOutcome::Failed
                        }
                    }
                }
            },
        }
    }

    async fn write_remote(
        &self,
        remote: &B,
        journal: &Journal,
        bytes: &[u8],
    ) -> std::result::Result<(), RemoteError> {
        let path = self.config.remote_path.as_str();

        if journal.is_empty() {
            info!("Journal is empty, removing remote object {}", path);
            return remove_if_present(remote, path).await;
        }

        self.ensure_remote_dir(remote).await;

        for attempt in 1..=MAX_UPLOAD_ATTEMPTS {
            match remote.upload(bytes.to_vec(), path, true).await {
                Ok(()) => {
                    debug!("Upload to {} succeeded on attempt {}", path, attempt);
                    return Ok(());
                }
                Err(e) if e.is_conflict() => {
                    warn!(
                        "Upload attempt {}/{} to {} conflicted",
                        attempt, MAX_UPLOAD_ATTEMPTS, path
                    );
                    if attempt < MAX_UPLOAD_ATTEMPTS {
                        tokio::time::sleep(self.config.retry_backoff()).await;
                    }
                }
                Err(e) => return Err(e),
            }
        }

        self.replace_remote(remote, path, bytes).await
    }

    /// Last-writer-wins escape hatch: whatever the conflicting writer stored
    /// is discarded.
    async fn replace_remote(
        &self,
        remote: &B,
        path: &str,
        bytes: &[u8],
    ) -> std::result::Result<(), RemoteError> {
        warn!(
            "Still conflicting after {} attempts; deleting {} and uploading a fresh copy",
            MAX_UPLOAD_ATTEMPTS, path
        );
        remove_if_present(remote, path).await?;
        remote.upload(bytes.to_vec(), path, false).await?;
        info!("Replaced remote object {}", path);
        Ok(())
    }

    /// Creates the remote parent directory. Failures are logged only; the
    /// upload reports the real error if the path is unusable.
    async fn ensure_remote_dir(&self, remote: &B) {
        let Some(dir) = remote_parent(&self.config.remote_path) else {
            return;
        };

        match remote.exists(&dir).await {
            Ok(true) => trace!("Remote directory {} exists", dir),
            Ok(false) => match remote.mkdir(&dir).await {
                Ok(()) => info!("Created remote directory {}", dir),
                Err(e) if e.is_conflict() => debug!("Remote directory {} already exists", dir),
                Err(e) => warn!("Failed to create remote directory {}: {}", dir, e),
            },
            Err(e) => warn!("Failed to check remote directory {}: {}", dir, e),
        }
    }

    /// Writes the local file through a temporary file and an atomic rename.
    fn write_local(&self, bytes: &[u8]) -> Result<()> {
        let file_path = &self.config.local_fallback;
        debug!("Writing local journal: {}", file_path.display());

        let dir = match file_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !dir.exists() {
            debug!("Creating parent directory: {}", dir.display());
            fs::create_dir_all(dir).map_err(|e| {
                error!("Failed to create directory {}: {}", dir.display(), e);
                JournalError::Io(e)
            })?;
        }

        let mut temp_file = NamedTempFile::new_in(dir).map_err(|e| {
            error!("Failed to create temporary file: {}", e);
            JournalError::Io(e)
        })?;
        temp_file.write_all(bytes)?;
        temp_file.flush()?;

        temp_file.persist(file_path).map_err(|e| {
            error!(
                "Failed to persist file {}: {}",
                file_path.display(),
                e.error
            );
            JournalError::Io(e.error)
        })?;

        info!("Local journal saved: {}", file_path.display());
        Ok(())
    }
}

async fn remove_if_present<B: BlobStore>(
    remote: &B,
    path: &str,
) -> std::result::Result<(), RemoteError> {
    match remote.remove(path).await {
        Err(e) if e.is_not_found() => {
            debug!("Remote object {} was already absent", path);
            Ok(())
        }
        other => other,
    }
}
