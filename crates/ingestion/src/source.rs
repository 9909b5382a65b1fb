//! Local and HTTP feature sources.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tile_common::FeatureCollection;
use tokio::fs;
use tracing::{debug, info, instrument};

use crate::error::{IngestionError, Result};

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[async_trait]
pub trait FeatureSource: Send + Sync {
    /// Fetch and parse the whole collection.
    async fn load(&self) -> Result<FeatureCollection>;

    /// Short human-readable description for logs.
    fn describe(&self) -> String;
}

/// Where the feature collection comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    Local {
        path: PathBuf,
    },
    Http {
        url: String,
        /// Query parameters in order; keys may repeat.
        #[serde(default)]
        query: Vec<(String, String)>,
        /// Save the raw response body here after a successful parse.
        #[serde(default)]
        cache_path: Option<PathBuf>,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Build the source selected by `config`.
pub fn source_from_config(config: &SourceConfig) -> Result<Box<dyn FeatureSource>> {
    match config {
        SourceConfig::Local { path } => Ok(Box::new(LocalFileSource::new(path))),
        SourceConfig::Http {
            url,
            query,
            cache_path,
            timeout_secs,
        } => {
            let mut source = HttpSource::new(url, Duration::from_secs(*timeout_secs))?
                .with_query(query.iter().cloned());
            if let Some(path) = cache_path {
                source = source.with_cache_path(path);
            }
            Ok(Box::new(source))
        }
    }
}

/// A GeoJSON FeatureCollection stored on disk.
#[derive(Debug, Clone)]
pub struct LocalFileSource {
    path: PathBuf,
}

impl LocalFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FeatureSource for LocalFileSource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<FeatureCollection> {
        let bytes = fs::read(&self.path)
            .await
            .map_err(|source| IngestionError::FileRead {
                path: self.path.clone(),
                source,
            })?;

        let collection = FeatureCollection::from_slice(&bytes)?;
        info!(
            features = collection.len(),
            size = bytes.len(),
            "Loaded feature collection from file"
        );
        Ok(collection)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// A feature collection fetched with a single HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    url: String,
    query: Vec<(String, String)>,
    cache_path: Option<PathBuf>,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let url = url.into();
        if url.is_empty() {
            return Err(IngestionError::InvalidConfig(
                "HTTP source URL is empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            url,
            query: Vec::new(),
            cache_path: None,
        })
    }

    pub fn with_query<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = Some(path.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    async fn write_cache(&self, path: &Path, body: &[u8]) -> Result<()> {
        let cache_err = |source| IngestionError::CacheWrite {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(cache_err)?;
        }
        fs::write(path, body).await.map_err(cache_err)?;

        info!(path = %path.display(), size = body.len(), "Cached feature collection");
        Ok(())
    }
}

#[async_trait]
impl FeatureSource for HttpSource {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn load(&self) -> Result<FeatureCollection> {
        debug!(params = self.query.len(), "Requesting feature collection");

        let response = self.client.get(&self.url).query(&self.query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(IngestionError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let collection = FeatureCollection::from_slice(&body)?;
        info!(
            features = collection.len(),
            size = body.len(),
            "Fetched feature collection"
        );

        if let Some(path) = &self.cache_path {
            self.write_cache(path, &body).await?;
        }

        Ok(collection)
    }

    fn describe(&self) -> String {
        format!("GET {}", self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_config_from_yaml_shape() {
        let json = r#"{
            "type": "http",
            "url": "https://example.org/sections",
            "query": [["layer", "101"], ["layer", "102"], ["source", "cache"]]
        }"#;
        let config: SourceConfig = serde_json::from_str(json).unwrap();
        match &config {
            SourceConfig::Http {
                query,
                cache_path,
                timeout_secs,
                ..
            } => {
                assert_eq!(query.len(), 3);
                assert_eq!(query[1], ("layer".to_string(), "102".to_string()));
                assert!(cache_path.is_none());
                assert_eq!(*timeout_secs, DEFAULT_TIMEOUT_SECS);
            }
            other => panic!("unexpected config {:?}", other),
        }

        let source = source_from_config(&config).unwrap();
        assert_eq!(source.describe(), "GET https://example.org/sections");
    }

    #[test]
    fn test_local_config() {
        let config: SourceConfig =
            serde_json::from_str(r#"{"type": "local", "path": "data/rfc.geojson"}"#).unwrap();
        assert_eq!(
            config,
            SourceConfig::Local {
                path: PathBuf::from("data/rfc.geojson")
            }
        );
        assert_eq!(
            source_from_config(&config).unwrap().describe(),
            "file data/rfc.geojson"
        );
    }

    #[test]
    fn test_empty_url_rejected() {
        assert!(matches!(
            HttpSource::new("", Duration::from_secs(1)),
            Err(IngestionError::InvalidConfig(_))
        ));
    }
}
