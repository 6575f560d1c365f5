//! Fetches purchased and preview files from remote storage.

use reqwest::{header::CONTENT_TYPE, Client, StatusCode, Url};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::StorageConfig;

#[derive(Debug, Error)]
pub enum FileFetchError {
    #[error("Invalid file URL: {0}")]
    InvalidUrl(String),

    #[error("Host not allowed: {0}")]
    HostNotAllowed(String),

    #[error("Remote returned {0}")]
    Status(StatusCode),

    #[error("File exceeds {0} bytes")]
    TooLarge(usize),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl FileFetchError {
    /// Whether the remote reported the file as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FileFetchError::Status(StatusCode::NOT_FOUND))
    }
}

/// Bytes of a fetched file and the content type the remote reported.
#[derive(Debug, Clone)]
pub struct FetchedFile {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

#[derive(Clone)]
pub struct FileFetcher {
    client: Client,
    max_bytes: usize,
    allowed_hosts: Vec<String>,
}

impl FileFetcher {
    pub fn new(config: &StorageConfig) -> Result<Self, FileFetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            max_bytes: config.max_file_bytes,
            allowed_hosts: config
                .allowed_hosts
                .iter()
                .map(|h| h.trim().to_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
        })
    }

    /// Whether `url` points at a host the preview proxy may read from.
    ///
    /// An empty allow-list permits any http(s) host. Subdomains of an
    /// allowed host are accepted.
    pub fn is_allowed(&self, url: &Url) -> bool {
        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }
        let Some(host) = url.host_str() else {
            return false;
        };
        if self.allowed_hosts.is_empty() {
            return true;
        }
        let host = host.to_lowercase();
        self.allowed_hosts
            .iter()
            .any(|allowed| host == *allowed || host.ends_with(&format!(".{}", allowed)))
    }

    /// Fetches a file without host restrictions. Used for catalogue file URLs.
    pub async fn fetch(&self, url: &str) -> Result<FetchedFile, FileFetchError> {
        let url = parse_url(url)?;
        self.fetch_url(url).await
    }

    /// Fetches a file only if its host is on the allow-list.
    pub async fn fetch_allowed(&self, url: &str) -> Result<FetchedFile, FileFetchError> {
        let url = parse_url(url)?;
        if !self.is_allowed(&url) {
            return Err(FileFetchError::HostNotAllowed(
                url.host_str().unwrap_or_default().to_string(),
            ));
        }
        self.fetch_url(url).await
    }

    async fn fetch_url(&self, url: Url) -> Result<FetchedFile, FileFetchError> {
        debug!(url = %url, "Fetching remote file");

        let mut response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FileFetchError::Status(status));
        }

        if let Some(length) = response.content_length() {
            if length > self.max_bytes as u64 {
                return Err(FileFetchError::TooLarge(self.max_bytes));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if bytes.len() + chunk.len() > self.max_bytes {
                return Err(FileFetchError::TooLarge(self.max_bytes));
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(FetchedFile {
            bytes,
            content_type,
        })
    }
}

fn parse_url(url: &str) -> Result<Url, FileFetchError> {
    let parsed = Url::parse(url.trim()).map_err(|e| FileFetchError::InvalidUrl(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(FileFetchError::InvalidUrl(format!(
            "unsupported scheme {}",
            parsed.scheme()
        )));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(hosts: &[&str]) -> FileFetcher {
        FileFetcher::new(&StorageConfig {
            allowed_hosts: hosts.iter().map(|h| h.to_string()).collect(),
            ..StorageConfig::default()
        })
        .unwrap()
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_empty_allow_list_accepts_any_http_host() {
        let fetcher = fetcher(&[]);
        assert!(fetcher.is_allowed(&url("https://cdn.example.com/a.pdf")));
        assert!(!fetcher.is_allowed(&url("file:///etc/passwd")));
    }

    #[test]
    fn test_allow_list_matches_host_and_subdomains() {
        let fetcher = fetcher(&["Storage.Example.com"]);
        assert!(fetcher.is_allowed(&url("https://storage.example.com/a.pdf")));
        assert!(fetcher.is_allowed(&url("https://eu.storage.example.com/a.pdf")));
        assert!(!fetcher.is_allowed(&url("https://evilstorage.example.com/a.pdf")));
        assert!(!fetcher.is_allowed(&url("https://other.com/a.pdf")));
    }

    #[test]
    fn test_parse_url_rejects_non_http() {
        assert!(matches!(parse_url("ftp://x/a.pdf"), Err(FileFetchError::InvalidUrl(_))));
        assert!(matches!(parse_url("not a url"), Err(FileFetchError::InvalidUrl(_))));
        assert!(parse_url(" https://x.com/a.pdf ").is_ok());
    }

    #[tokio::test]
    async fn test_fetch_allowed_rejects_unlisted_host() {
        let result = fetcher(&["storage.example.com"])
            .fetch_allowed("https://other.com/a.pdf")
            .await;
        assert!(matches!(result, Err(FileFetchError::HostNotAllowed(h)) if h == "other.com"));
    }

    #[test]
    fn test_is_not_found() {
        assert!(FileFetchError::Status(StatusCode::NOT_FOUND).is_not_found());
        assert!(!FileFetchError::Status(StatusCode::FORBIDDEN).is_not_found());
    }
}
