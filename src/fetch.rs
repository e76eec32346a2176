//! Remote image downloading.
//!
//! [`Fetcher`] is the seam between the rewrite pipeline and the network:
//! production uses [`HttpFetcher`] (blocking `reqwest`), tests use a mock that
//! serves canned bytes. Any non-success status is an error carrying the URL and
//! status code. There is no retry, so one broken image ends the migration.

use crate::config::HttpConfig;
use crate::layout::{CollisionError, ensure_vacant};
use reqwest::blocking::Client;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Can't download image {url} ; Status code {status}")]
    Status { url: String, status: u16 },
    #[error("Can't download image {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Collision(#[from] CollisionError),
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fetch a remote resource into memory.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Blocking HTTP GET fetcher.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(FetchError::Client)?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().map_err(transport)?;
        Ok(bytes.to_vec())
    }
}

/// Download `url` and save the body verbatim at `dest`.
///
/// The collision check runs after a successful fetch and before the write;
/// `origin` is the reference reported if `dest` is already taken.
pub fn download_asset(
    fetcher: &impl Fetcher,
    url: &str,
    origin: &str,
    dest: &Path,
) -> Result<u64, DownloadError> {
    let body = fetcher.fetch(url)?;
    ensure_vacant(dest, origin)?;
    std::fs::write(dest, &body).map_err(|source| DownloadError::Write {
        path: dest.to_path_buf(),
        source,
    })?;
    Ok(body.len() as u64)
}
