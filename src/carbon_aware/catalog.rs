//! Region catalog
//!
//! A [`RegionCatalog`] is an immutable, validated snapshot of candidate
//! regions. Catalog order is significant: it decides ties during selection.

use crate::carbon_aware::types::Region;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Validated, read-only set of candidate regions
#[derive(Clone, Debug)]
pub struct RegionCatalog {
    regions: Arc<[Region]>,
}

impl Default for RegionCatalog {
    fn default() -> Self {
        Self {
            regions: Arc::from(Vec::new()),
        }
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    regions: Vec<Region>,
}

impl RegionCatalog {
    /// Build a catalog, rejecting malformed regions and duplicate ids
    pub fn new(regions: Vec<Region>) -> Result<Self> {
        let mut seen = HashSet::new();
        for region in &regions {
            region.validate()?;
            if !seen.insert(region.id.as_str()) {
                return Err(Error::validation(format!(
                    "duplicate region id {:?} in catalog",
                    region.id
                )));
            }
        }
        Ok(Self {
            regions: regions.into(),
        })
    }

    /// The stock twelve-region catalog
    pub fn builtin() -> Self {
        let regions = BUILTIN_REGIONS
            .iter()
            .map(
                |&(id, name, location, carbon_intensity, cost, latency, availability)| Region {
                    id: id.to_string(),
                    name: name.to_string(),
                    location: location.to_string(),
                    carbon_intensity,
                    cost,
                    latency,
                    availability,
                },
            )
            .collect::<Vec<_>>();
        Self {
            regions: regions.into(),
        }
    }

    /// Parse a catalog from `[[regions]]` TOML tables
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(text)?;
        Self::new(file.regions)
    }

    /// Load a catalog file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Failed to read catalog {}: {}", path.display(), e))
        })?;
        let catalog = Self::from_toml_str(&text)?;
        info!(
            "Loaded {} regions from catalog {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn get(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Dashboard statistics over the catalog
    pub fn overview(&self, carbon_ceiling: f64) -> CatalogOverview {
        if self.regions.is_empty() {
            return CatalogOverview::default();
        }

        let total: f64 = self.regions.iter().map(|r| r.carbon_intensity).sum();
        let average_intensity = (total / self.regions.len() as f64).round();
        let green_score = ((1.0 - average_intensity / carbon_ceiling) * 100.0).round();

        let mut greenest = &self.regions[0];
        for region in self.regions.iter().skip(1) {
            if region.carbon_intensity < greenest.carbon_intensity {
                greenest = region;
            }
        }

        CatalogOverview {
            regions_count: self.regions.len(),
            average_intensity,
            green_score,
            greenest_region: Some(greenest.clone()),
        }
    }
}

/// Catalog-wide statistics for dashboards
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogOverview {
    pub regions_count: usize,
    /// Mean carbon intensity, rounded to whole gCO2/kWh
    pub average_intensity: f64,
    pub green_score: f64,
    pub greenest_region: Option<Region>,
}

/// Supplier of catalog snapshots.
///
/// Implementations backed by storage or the network may suspend here; the
/// scheduler itself only ever sees the returned snapshot.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn snapshot(&self) -> Result<RegionCatalog>;
}

/// In-process catalog that always hands out the same snapshot
#[derive(Clone, Debug)]
pub struct StaticCatalog {
    catalog: RegionCatalog,
}

impl StaticCatalog {
    pub fn new(catalog: RegionCatalog) -> Self {
        Self { catalog }
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::new(RegionCatalog::builtin())
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn snapshot(&self) -> Result<RegionCatalog> {
        Ok(self.catalog.clone())
    }
}

type RegionRow = (&'static str, &'static str, &'static str, f64, f64, f64, f64);

// id, name, location, gCO2/kWh, cost/h, latency ms, availability %
const BUILTIN_REGIONS: &[RegionRow] = &[
    ("us-west-renewable", "US West (Renewable)", "Oregon, USA", 35.0, 0.12, 45.0, 99.9),
    ("eu-north-hydro", "EU North (Hydro)", "Stockholm, Sweden", 15.0, 0.10, 85.0, 99.95),
    ("asia-pacific-solar", "Asia Pacific (Solar)", "Singapore", 120.0, 0.15, 120.0, 99.8),
    ("us-east-standard", "US East (Standard)", "Virginia, USA", 380.0, 0.08, 30.0, 99.95),
    ("eu-west-wind", "EU West (Wind)", "Dublin, Ireland", 280.0, 0.11, 70.0, 99.9),
    ("canada-hydro", "Canada (Hydro)", "Quebec, Canada", 20.0, 0.09, 55.0, 99.92),
    ("brazil-renewable", "Brazil (Renewable Mix)", "São Paulo, Brazil", 95.0, 0.13, 140.0, 99.7),
    ("australia-solar", "Australia (Solar)", "Sydney, Australia", 110.0, 0.14, 180.0, 99.85),
    ("norway-hydro", "Norway (Hydro)", "Oslo, Norway", 12.0, 0.11, 90.0, 99.96),
    ("india-mixed", "India (Mixed)", "Mumbai, India", 320.0, 0.07, 165.0, 99.6),
    ("japan-renewable", "Japan (Renewable)", "Tokyo, Japan", 150.0, 0.16, 135.0, 99.9),
    ("germany-wind", "Germany (Wind)", "Frankfurt, Germany", 180.0, 0.12, 65.0, 99.88),
];
