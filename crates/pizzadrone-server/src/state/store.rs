//! In-memory state store using DashMap.

use dashmap::DashMap;
use pizzadrone_core::FlightRules;

use crate::cache::{prune_cache, CacheEntry};
use crate::config::Config;
use crate::regions::{RegionClient, RegionSnapshot, SourceError};

const MAX_CACHED_SOURCES: usize = 4;

/// Application state shared by every handler.
pub struct AppState {
    config: Config,
    rules: FlightRules,
    source: RegionClient,
    /// Validated region snapshots keyed by data service base URL
    regions: DashMap<String, RegionSnapshot>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, SourceError> {
        let source = RegionClient::from_config(&config)?;
        Ok(Self {
            rules: config.flight_rules(),
            config,
            source,
            regions: DashMap::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn rules(&self) -> &FlightRules {
        &self.rules
    }

    /// The cached snapshot if it is still fresh, fetching a new one otherwise.
    pub async fn current_regions(&self) -> Result<RegionSnapshot, SourceError> {
        let ttl = self.config.region_ttl();
        prune_cache(&self.regions, MAX_CACHED_SOURCES, ttl);

        if let Some(snapshot) = self.regions.get(self.source.base_url()) {
            if snapshot.is_fresh(ttl) {
                return Ok(snapshot.clone());
            }
        }

        self.refresh_regions().await
    }

    /// Fetch regions from the data service and replace the cached snapshot.
    pub async fn refresh_regions(&self) -> Result<RegionSnapshot, SourceError> {
        let snapshot = self.source.fetch_snapshot().await?;
        if snapshot.central_area.name != self.rules.central_region_name {
            tracing::warn!(
                "Central area is named '{}', expected '{}'",
                snapshot.central_area.name,
                self.rules.central_region_name
            );
        }
        self.store_regions(snapshot.clone());
        Ok(snapshot)
    }

    pub fn store_regions(&self, snapshot: RegionSnapshot) {
        self.regions
            .insert(self.source.base_url().to_string(), snapshot);
    }

    /// Age of the cached snapshot, if any.
    pub fn regions_age(&self) -> Option<std::time::Duration> {
        self.regions
            .get(self.source.base_url())
            .map(|snapshot| snapshot.fetched_at().elapsed())
    }
}
