//! Remote blob storage.
//!
//! [`BlobStore`] is the narrow interface the record store needs from a cloud
//! file-storage account. [`YandexDisk`] implements it over the Yandex Disk
//! REST API.
use log::{debug, trace};
use reqwest::{header::AUTHORIZATION, Client, Response, StatusCode};
use serde::Deserialize;

use crate::{Config, RemoteError};

/// Minimal object-store operations over absolute remote paths.
#[allow(async_fn_in_trait)]
pub trait BlobStore {
    async fn exists(&self, path: &str) -> Result<bool, RemoteError>;

    async fn download(&self, path: &str) -> Result<Vec<u8>, RemoteError>;

    /// Uploads `bytes` to `path`.
    ///
    /// Fails with [`RemoteError::Conflict`] when the store rejects the write
    /// because the object changed, or exists and `overwrite` is false.
    async fn upload(&self, bytes: Vec<u8>, path: &str, overwrite: bool)
        -> Result<(), RemoteError>;

    async fn remove(&self, path: &str) -> Result<(), RemoteError>;

    /// Creates a directory. An already existing directory is a conflict.
    async fn mkdir(&self, path: &str) -> Result<(), RemoteError>;
}

/// Operation link returned by the upload/download endpoints.
#[derive(Debug, Deserialize)]
struct Link {
    href: String,
}

/// Yandex Disk REST API client.
#[derive(Clone)]
pub struct YandexDisk {
    client: Client,
    base_url: String,
    token: String,
}

impl YandexDisk {
    pub fn new(base_url: &str, token: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Builds a client when the configuration carries a token.
    pub fn from_config(config: &Config) -> Option<Self> {
        config
            .token
            .as_ref()
            .map(|token| Self::new(&config.api_url, token.clone()))
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    fn auth(&self) -> String {
        format!("OAuth {}", self.token)
    }

    async fn link(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
        path: &str,
    ) -> Result<Link, RemoteError> {
        let resp = self
            .client
            .get(self.url(endpoint))
            .header(AUTHORIZATION, self.auth())
            .query(query)
            .send()
            .await?;
        let resp = check(resp, path)?;
        Ok(resp.json().await?)
    }
}

/// Maps a non-success response to the matching [`RemoteError`].
fn check(resp: Response, path: &str) -> Result<Response, RemoteError> {
    match status_error(resp.status(), path) {
        None => Ok(resp),
        Some(e) => Err(e),
    }
}

fn status_error(status: StatusCode, path: &str) -> Option<RemoteError> {
    if status.is_success() {
        return None;
    }
    trace!("Remote store answered {} for {}", status, path);
    Some(match status {
        StatusCode::NOT_FOUND => RemoteError::NotFound {
            path: path.to_string(),
        },
        StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED => RemoteError::Conflict {
            path: path.to_string(),
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RemoteError::Unauthorized {
            status: status.as_u16(),
        },
        other => RemoteError::Status {
            status: other.as_u16(),
            path: path.to_string(),
        },
    })
}

/// Result of an existence check: a missing resource is `false`, not an error.
fn presence(status: StatusCode, path: &str) -> Result<bool, RemoteError> {
    match status_error(status, path) {
        None => Ok(true),
        Some(RemoteError::NotFound { .. }) => Ok(false),
        Some(e) => Err(e),
    }
}

impl BlobStore for YandexDisk {
    async fn exists(&self, path: &str) -> Result<bool, RemoteError> {
        debug!("Checking remote object: {}", path);
        let resp = self
            .client
            .get(self.url("resources"))
            .header(AUTHORIZATION, self.auth())
            .query(&[("path", path), ("fields", "path")])
            .send()
            .await?;
        presence(resp.status(), path)
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>, RemoteError> {
        debug!("Downloading remote object: {}", path);
        let link = self
            .link("resources/download", &[("path", path)], path)
            .await?;
        let resp = self.client.get(&link.href).send().await?;
        let bytes = check(resp, path)?.bytes().await?;
        trace!("Downloaded {} bytes from {}", bytes.len(), path);
        Ok(bytes.to_vec())
    }

    async fn upload(
        &self,
        bytes: Vec<u8>,
        path: &str,
        overwrite: bool,
    ) -> Result<(), RemoteError> {
        debug!("Uploading {} bytes to {} (overwrite={})", bytes.len(), path, overwrite);
        let overwrite = if overwrite { "true" } else { "false" };
        let link = self
            .link(
                "resources/upload",
                &[("path", path), ("overwrite", overwrite)],
                path,
            )
            .await?;
        let resp = self.client.put(&link.href).body(bytes).send().await?;
        check(resp, path)?;
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<(), RemoteError> {
        debug!("Removing remote object: {}", path);
        let resp = self
            .client
            .delete(self.url("resources"))
            .header(AUTHORIZATION, self.auth())
            .query(&[("path", path), ("permanently", "true")])
            .send()
            .await?;
        check(resp, path)?;
        Ok(())
    }

    async fn mkdir(&self, path: &str) -> Result<(), RemoteError> {
        debug!("Creating remote directory: {}", path);
        let resp = self
            .client
            .put(self.url("resources"))
            .header(AUTHORIZATION, self.auth())
            .query(&[("path", path)])
            .send()
            .await?;
        check(resp, path)?;
        Ok(())
    }
}

/// Parent directory of a remote path, or `None` for objects at the root.
pub fn remote_parent(path: &str) -> Option<String> {
    let (dir, _) = path.rsplit_once('/')?;
    let dir = dir.trim_start_matches('/');
    if dir.is_empty() {
        None
    } else {
        Some(format!("/{}", dir))
    }
}
