// src/catalog/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level catalog as read from a TOML file.
///
/// ```toml
/// [pool.pool_gg]
/// process = "g g > g g"
/// description = "gg -> gg (QCD dijet)"
///
/// [campaign.JJP_DPS2]
/// analysis = "JJP"
/// inputs = ["pool_2jpsi", "pool_gg"]
/// modes = ["normal", "phi"]
/// description = "JJP DPS Type-2: 2J/psi mixed with gg->gg (normal + phi)"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogFile {
    /// All LHE pools from `[pool.<name>]`, keyed by pool name.
    #[serde(default)]
    pub pool: BTreeMap<String, PoolConfig>,

    /// All campaigns from `[campaign.<name>]`, keyed by campaign name.
    #[serde(default)]
    pub campaign: BTreeMap<String, CampaignConfig>,
}

/// `[pool.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PoolConfig {
    /// Generator process descriptor (HELAC-Onia syntax).
    pub process: String,

    /// Human-readable description.
    #[serde(default)]
    pub description: String,

    /// Minimum pT for charmonium states.
    #[serde(default = "default_min_pt_conia")]
    pub min_pt_conia: f64,

    /// Minimum pT for bottomonium states.
    #[serde(default = "default_min_pt_bonia")]
    pub min_pt_bonia: f64,

    /// Minimum pT for light quarks/gluons.
    #[serde(default = "default_min_pt_q")]
    pub min_pt_q: f64,

    /// Pre-staged remote location. Absent means the pool must be generated
    /// (unless the storage probe discovers sufficient files later).
    #[serde(default)]
    pub remote_path: Option<String>,
}

fn default_min_pt_conia() -> f64 {
    6.0
}

fn default_min_pt_bonia() -> f64 {
    4.0
}

fn default_min_pt_q() -> f64 {
    4.0
}

/// `[campaign.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct CampaignConfig {
    /// Category tag, e.g. `JJP` or `JUP`. Drives `<CATEGORY>_ALL` selection.
    pub analysis: String,

    /// Ordered pool references. A pool may appear more than once, e.g. to
    /// model multi-source scattering; each occurrence consumes its own
    /// resource units.
    pub inputs: Vec<String>,

    /// Per-input shower mode tags (`normal` / `phi`), parallel to `inputs`.
    pub modes: Vec<String>,

    /// Human-readable description.
    #[serde(default)]
    pub description: String,

    /// Deprecated campaigns still plan, but with a warning.
    #[serde(default)]
    pub deprecated: bool,
}
