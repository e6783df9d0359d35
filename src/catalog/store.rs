// src/catalog/store.rs

//! Read-only, key-addressed stores for pools and campaigns.
//!
//! Both catalogs are populated once from a validated [`CatalogFile`] and are
//! immutable afterwards, with one sanctioned exception:
//! [`PoolCatalog::apply_prestaged`] patches probe-discovered remote
//! locations into the pool definitions. That call must complete, in full,
//! before any planning read begins; `run()` enforces this ordering
//! sequentially.

use std::collections::BTreeMap;

use tracing::info;

use crate::catalog::model::CatalogFile;
use crate::catalog::validate::validate_catalog;
use crate::errors::{McdagError, Result};

/// Definition of an LHE pool.
#[derive(Debug, Clone)]
pub struct PoolDefinition {
    pub name: String,
    pub process: String,
    pub description: String,
    pub min_pt_conia: f64,
    pub min_pt_bonia: f64,
    pub min_pt_q: f64,
    /// Pre-staged remote location; `None` means the pool must be generated.
    pub remote_path: Option<String>,
}

impl PoolDefinition {
    /// Whether sufficient files already exist remotely for this pool.
    pub fn is_prestaged(&self) -> bool {
        self.remote_path.is_some()
    }
}

/// Definition of a physics campaign.
#[derive(Debug, Clone)]
pub struct CampaignDefinition {
    pub name: String,
    /// Category tag (`JJP` / `JUP`).
    pub analysis: String,
    /// Ordered pool references; duplicates are legal.
    pub inputs: Vec<String>,
    /// Shower mode per input, parallel to `inputs`.
    pub modes: Vec<String>,
    pub description: String,
    pub deprecated: bool,
}

impl CampaignDefinition {
    /// Number of event sources mixed per processing job.
    pub fn n_sources(&self) -> usize {
        self.inputs.len()
    }

    /// How many times `pool` occurs in this campaign's inputs.
    pub fn usage_count(&self, pool: &str) -> usize {
        self.inputs.iter().filter(|p| p.as_str() == pool).count()
    }
}

/// Key-addressed store of pool definitions.
#[derive(Debug, Clone)]
pub struct PoolCatalog {
    pools: BTreeMap<String, PoolDefinition>,
}

impl PoolCatalog {
    /// Lookup by name; absent names are a configuration error.
    pub fn get(&self, name: &str) -> Result<&PoolDefinition> {
        self.pools
            .get(name)
            .ok_or_else(|| McdagError::PoolNotFound(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PoolDefinition> {
        self.pools.values()
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// The single sanctioned catalog mutation: annotate pools with remote
    /// locations discovered by the storage probe. Pools absent from `found`
    /// keep whatever `remote_path` the catalog declared.
    pub fn apply_prestaged(&mut self, found: &BTreeMap<String, String>) {
        for (name, remote_path) in found.iter() {
            if let Some(pool) = self.pools.get_mut(name) {
                info!(pool = %name, path = %remote_path, "using pre-staged files");
                pool.remote_path = Some(remote_path.clone());
            }
        }
    }
}

/// Key-addressed store of campaign definitions.
#[derive(Debug, Clone)]
pub struct CampaignCatalog {
    campaigns: BTreeMap<String, CampaignDefinition>,
}

impl CampaignCatalog {
    /// Lookup by name; absent names are a configuration error.
    pub fn get(&self, name: &str) -> Result<&CampaignDefinition> {
        self.campaigns
            .get(name)
            .ok_or_else(|| McdagError::CampaignNotFound(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CampaignDefinition> {
        self.campaigns.values()
    }

    /// Resolve a CLI campaign selector:
    /// - an exact campaign name,
    /// - `ALL` for every campaign,
    /// - `<CATEGORY>_ALL` for every campaign whose category tag matches.
    pub fn select(&self, selector: &str) -> Result<Vec<&CampaignDefinition>> {
        if let Some(campaign) = self.campaigns.get(selector) {
            return Ok(vec![campaign]);
        }

        if selector == "ALL" {
            return Ok(self.campaigns.values().collect());
        }

        if let Some(category) = selector.strip_suffix("_ALL") {
            let matches: Vec<&CampaignDefinition> = self
                .campaigns
                .values()
                .filter(|c| c.analysis == category)
                .collect();
            if !matches.is_empty() {
                return Ok(matches);
            }
        }

        Err(McdagError::CampaignNotFound(selector.to_string()))
    }

    /// All category tags present in the catalog, deduplicated and sorted.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> =
            self.campaigns.values().map(|c| c.analysis.as_str()).collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }
}

/// Both stores, built together from one catalog file.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub pools: PoolCatalog,
    pub campaigns: CampaignCatalog,
}

impl Catalog {
    /// Validate a raw [`CatalogFile`] and build the read-only stores.
    pub fn from_file(file: CatalogFile) -> Result<Self> {
        validate_catalog(&file)?;

        let pools = file
            .pool
            .into_iter()
            .map(|(name, cfg)| {
                let def = PoolDefinition {
                    name: name.clone(),
                    process: cfg.process,
                    description: cfg.description,
                    min_pt_conia: cfg.min_pt_conia,
                    min_pt_bonia: cfg.min_pt_bonia,
                    min_pt_q: cfg.min_pt_q,
                    remote_path: cfg.remote_path,
                };
                (name, def)
            })
            .collect();

        let campaigns = file
            .campaign
            .into_iter()
            .map(|(name, cfg)| {
                let def = CampaignDefinition {
                    name: name.clone(),
                    analysis: cfg.analysis,
                    inputs: cfg.inputs,
                    modes: cfg.modes,
                    description: cfg.description,
                    deprecated: cfg.deprecated,
                };
                (name, def)
            })
            .collect();

        Ok(Self {
            pools: PoolCatalog { pools },
            campaigns: CampaignCatalog { campaigns },
        })
    }
}
