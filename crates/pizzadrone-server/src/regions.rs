//! Region data source: the central area and no-fly zones served by the
//! delivery data service.
//!
//! Every polygon is validated when it is acquired, so the planner never sees
//! a degenerate region.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use pizzadrone_core::{GeometryError, NamedRegion};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::backoff::Backoff;
use crate::cache::CacheEntry;
use crate::config::Config;

const RETRY_BASE: Duration = Duration::from_millis(250);
const RETRY_MAX: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned {status}")]
    Status { url: String, status: StatusCode },

    #[error("malformed region data from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error(transparent)]
    Invalid(#[from] GeometryError),
}

impl SourceError {
    /// Transport failures and server errors are worth another attempt;
    /// bad data is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            SourceError::Request { .. } => true,
            SourceError::Status { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}

/// A validated set of regions as fetched at one point in time.
#[derive(Debug, Clone, Serialize)]
pub struct RegionSnapshot {
    pub central_area: NamedRegion,
    pub no_fly_zones: Vec<NamedRegion>,
    pub fetched_at: DateTime<Utc>,
    #[serde(skip)]
    acquired: Instant,
}

impl RegionSnapshot {
    pub fn new(
        central_area: NamedRegion,
        no_fly_zones: Vec<NamedRegion>,
    ) -> Result<Self, GeometryError> {
        validate_acquired(&central_area)?;
        for zone in &no_fly_zones {
            validate_acquired(zone)?;
        }
        Ok(Self {
            central_area,
            no_fly_zones,
            fetched_at: Utc::now(),
            acquired: Instant::now(),
        })
    }
}

impl CacheEntry for RegionSnapshot {
    fn fetched_at(&self) -> Instant {
        self.acquired
    }
}

fn validate_acquired(region: &NamedRegion) -> Result<(), GeometryError> {
    if let Some(vertex) = region.vertices.iter().find(|vertex| !vertex.is_valid()) {
        return Err(GeometryError::InvalidPolygon {
            name: region.name.clone(),
            reason: format!("vertex ({}, {}) is out of range", vertex.lng, vertex.lat),
        });
    }
    region.validate()
}

/// HTTP client for the region endpoints.
#[derive(Debug, Clone)]
pub struct RegionClient {
    client: Client,
    base_url: String,
    retries: u32,
}

impl RegionClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration, retries: u32) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SourceError::Client)?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            retries,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        Self::new(
            config.data_url.clone(),
            config.fetch_timeout(),
            config.fetch_retries,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch and validate both region sets, retrying transient failures.
    pub async fn fetch_snapshot(&self) -> Result<RegionSnapshot, SourceError> {
        let mut backoff = Backoff::new(RETRY_BASE, RETRY_MAX);
        loop {
            match self.fetch_once().await {
                Ok(snapshot) => {
                    tracing::debug!(
                        no_fly_zones = snapshot.no_fly_zones.len(),
                        "Fetched region data from {}",
                        self.base_url
                    );
                    return Ok(snapshot);
                }
                Err(err) if err.is_retryable() && backoff.failures() < self.retries => {
                    let delay = backoff.fail();
                    tracing::warn!(
                        "Region fetch failed: {} (attempt {}, retrying in {:?})",
                        err,
                        backoff.failures(),
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn fetch_once(&self) -> Result<RegionSnapshot, SourceError> {
        let central_area: NamedRegion = self.get_json("centralArea").await?;
        let no_fly_zones: Vec<NamedRegion> = self.get_json("noFlyZones").await?;
        Ok(RegionSnapshot::new(central_area, no_fly_zones)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, SourceError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| SourceError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status { url, status });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| SourceError::Decode { url, source })
    }
}
