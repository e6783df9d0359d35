// src/errors.rs

//! Crate-wide error type.
//!
//! Configuration problems (unknown names, malformed campaign definitions)
//! abort planning for the offending campaign only; IO and TOML errors are
//! fatal. Probe failures are deliberately *not* represented here: the
//! storage probe degrades to "regenerate" instead of returning errors
//! (see the `probe` module).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum McdagError {
    #[error("unknown pool '{0}'")]
    PoolNotFound(String),

    #[error("unknown campaign '{0}'")]
    CampaignNotFound(String),

    #[error("campaign '{campaign}' references unknown pool '{pool}'")]
    UnknownPoolRef { campaign: String, pool: String },

    #[error("campaign '{campaign}': modes count ({modes}) must match inputs count ({inputs})")]
    ModeCountMismatch {
        campaign: String,
        modes: usize,
        inputs: usize,
    },

    #[error("catalog must contain at least one [{0}.<name>] section")]
    EmptyCatalog(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, McdagError>;
