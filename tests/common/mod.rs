#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    path::Path,
    sync::Mutex,
};

use remedy_journal::{BlobStore, Config, RemoteError};

/// One recorded call against the in-memory disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Exists(String),
    Download(String),
    Upload { path: String, overwrite: bool },
    Remove(String),
    Mkdir(String),
}

#[derive(Default)]
struct State {
    objects: HashMap<String, Vec<u8>>,
    dirs: HashSet<String>,
    calls: Vec<Call>,
    /// Overwriting uploads to reject as conflicts before accepting one
    conflicts_remaining: usize,
    reject_fresh_upload: bool,
    fail_mkdir: bool,
    offline: bool,
}

/// In-memory blob store that records every call and can inject failures.
#[derive(Default)]
pub struct MockDisk {
    state: Mutex<State>,
}

impl MockDisk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(path: &str, bytes: &[u8]) -> Self {
        let disk = Self::new();
        disk.put(path, bytes);
        disk
    }

    pub fn put(&self, path: &str, bytes: &[u8]) {
        let mut state = self.state.lock().unwrap();
        state.objects.insert(path.to_string(), bytes.to_vec());
    }

    pub fn object(&self, path: &str) -> Option<Vec<u8>> {
        self.state.lock().unwrap().objects.get(path).cloned()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn uploads(&self) -> Vec<bool> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Upload { overwrite, .. } => Some(overwrite),
                _ => None,
            })
            .collect()
    }

    pub fn removes(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Remove(_)))
            .count()
    }

    /// True if the disk saw any call that changes state.
    pub fn was_written(&self) -> bool {
        !self.uploads().is_empty() || self.removes() > 0
    }

    pub fn set_conflicts(&self, count: usize) {
        self.state.lock().unwrap().conflicts_remaining = count;
    }

    pub fn set_reject_fresh_upload(&self, reject: bool) {
        self.state.lock().unwrap().reject_fresh_upload = reject;
    }

    pub fn set_fail_mkdir(&self, fail: bool) {
        self.state.lock().unwrap().fail_mkdir = fail;
    }

    pub fn set_offline(&self, offline: bool) {
        self.state.lock().unwrap().offline = offline;
    }
}

fn unavailable(path: &str) -> RemoteError {
    RemoteError::Status {
        status: 503,
        path: path.to_string(),
    }
}

impl BlobStore for MockDisk {
    async fn exists(&self, path: &str) -> Result<bool, RemoteError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Exists(path.to_string()));
        if state.offline {
            return Err(unavailable(path));
        }
        Ok(state.objects.contains_key(path) || state.dirs.contains(path))
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>, RemoteError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Download(path.to_string()));
        if state.offline {
            return Err(unavailable(path));
        }
        state
            .objects
            .get(path)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound {
                path: path.to_string(),
            })
    }

    async fn upload(&self, bytes: Vec<u8>, path: &str, overwrite: bool) -> Result<(), RemoteError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Upload {
            path: path.to_string(),
            overwrite,
        });
        if state.offline {
            return Err(unavailable(path));
        }
        let conflict = RemoteError::Conflict {
            path: path.to_string(),
        };
        if overwrite && state.conflicts_remaining > 0 {
            state.conflicts_remaining -= 1;
            return Err(conflict);
        }
        if !overwrite && (state.reject_fresh_upload || state.objects.contains_key(path)) {
            return Err(conflict);
        }
        state.objects.insert(path.to_string(), bytes);
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<(), RemoteError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Remove(path.to_string()));
        if state.offline {
            return Err(unavailable(path));
        }
        match state.objects.remove(path) {
            Some(_) => Ok(()),
            None => Err(RemoteError::NotFound {
                path: path.to_string(),
            }),
        }
    }

    async fn mkdir(&self, path: &str) -> Result<(), RemoteError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Mkdir(path.to_string()));
        if state.offline || state.fail_mkdir {
            return Err(unavailable(path));
        }
        if !state.dirs.insert(path.to_string()) {
            return Err(RemoteError::Conflict {
                path: path.to_string(),
            });
        }
        Ok(())
    }
}

pub const REMOTE_PATH: &str = "/remedies_journal.json";

/// Configuration with a token, no retry backoff and a local file under `dir`.
pub fn remote_config(dir: &Path) -> Config {
    Config {
        token: Some("test-token".to_string()),
        local_fallback: dir.join("data.json"),
        retry_backoff_ms: 0,
        ..Config::default()
    }
}

/// Local-only configuration with the journal file under `dir`.
pub fn local_config(dir: &Path) -> Config {
    Config {
        local_fallback: dir.join("data.json"),
        retry_backoff_ms: 0,
        ..Config::default()
    }
}
